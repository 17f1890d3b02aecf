//! Player data models.

use crate::validation::{FromBody, Lower, TextRule, Validator};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A roster member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub id: i64,
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub fecha_nacimiento: NaiveDate,
    pub categoria: String,
    pub posicion: Option<String>,
    pub numero_uniforme: Option<i32>,
    pub altura: Option<Decimal>,
    pub peso: Option<Decimal>,
    /// Cleared when the guardian is deleted
    pub tutor_id: Option<i64>,
    pub tutor_secundario_id: Option<i64>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub escuela: Option<String>,
    pub grado_escolar: Option<String>,
    pub alergias: Option<String>,
    pub condiciones_medicas: Option<String>,
    pub notas: Option<String>,
    pub activo: bool,
    pub fecha_ingreso: Option<NaiveDate>,
    pub fecha_creacion: DateTime<Utc>,
    pub ultima_actualizacion: DateTime<Utc>,
}

/// Validated create/replace payload for a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInput {
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub fecha_nacimiento: NaiveDate,
    pub categoria: String,
    pub posicion: Option<String>,
    pub numero_uniforme: Option<i32>,
    pub altura: Option<Decimal>,
    pub peso: Option<Decimal>,
    pub tutor_id: i64,
    pub tutor_secundario_id: Option<i64>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub escuela: Option<String>,
    pub grado_escolar: Option<String>,
    pub alergias: Option<String>,
    pub condiciones_medicas: Option<String>,
    pub notas: Option<String>,
    pub activo: bool,
    pub fecha_ingreso: Option<NaiveDate>,
}

/// Largest height or weight a `NUMERIC(5, 2)` column holds.
fn max_measure() -> Decimal {
    Decimal::new(99_999, 2)
}

impl FromBody for PlayerInput {
    fn collect(v: &mut Validator<'_>) -> Self {
        let nombre = v.required_text(
            "nombre",
            TextRule {
                min: 2,
                max: 100,
                missing: "El nombre es obligatorio.",
                length: "El nombre debe tener entre 2 y 100 caracteres.",
            },
        );
        let apellido_paterno = v.required_text(
            "apellido_paterno",
            TextRule {
                min: 2,
                max: 50,
                missing: "El apellido paterno es obligatorio.",
                length: "El apellido paterno debe tener entre 2 y 50 caracteres.",
            },
        );
        let apellido_materno = v.optional_text(
            "apellido_materno",
            50,
            "El apellido materno no puede exceder los 50 caracteres.",
        );
        let fecha_nacimiento = v.required_date(
            "fecha_nacimiento",
            "La fecha de nacimiento debe ser una fecha válida (YYYY-MM-DD).",
        );
        let categoria = v.required_text(
            "categoria",
            TextRule {
                min: 1,
                max: 50,
                missing: "La categoría es obligatoria.",
                length: "La categoría no puede exceder los 50 caracteres.",
            },
        );
        let posicion = v.optional_text(
            "posicion",
            50,
            "La posición no puede exceder los 50 caracteres.",
        );
        let numero_uniforme = v.optional_int(
            "numero_uniforme",
            0,
            "El número de uniforme debe ser un entero no negativo.",
        );
        let altura = v.optional_decimal(
            "altura",
            Lower::NonNegative,
            max_measure(),
            "La altura debe ser un número decimal positivo.",
        );
        let peso = v.optional_decimal(
            "peso",
            Lower::NonNegative,
            max_measure(),
            "El peso debe ser un número decimal positivo.",
        );
        let tutor_id = v.required_id(
            "tutor_id",
            "El ID del tutor principal es obligatorio.",
            "El ID del tutor principal debe ser un número entero positivo.",
        );
        let tutor_secundario_id = v.optional_id(
            "tutor_secundario_id",
            "El ID del tutor secundario debe ser un número entero positivo.",
        );
        let telefono = v.optional_bounded_text(
            "telefono",
            TextRule {
                min: 7,
                max: 20,
                missing: "",
                length: "El teléfono debe tener entre 7 y 20 caracteres.",
            },
        );
        let email = v.optional_email(
            "email",
            "Debe ser un formato de email válido.",
            "El email no puede exceder los 100 caracteres.",
        );
        let direccion = v.optional_text(
            "direccion",
            500,
            "La dirección no puede exceder los 500 caracteres.",
        );
        let escuela = v.optional_text(
            "escuela",
            100,
            "La escuela no puede exceder los 100 caracteres.",
        );
        let grado_escolar = v.optional_text(
            "grado_escolar",
            50,
            "El grado escolar no puede exceder los 50 caracteres.",
        );
        let alergias = v.optional_text(
            "alergias",
            1000,
            "Las alergias no pueden exceder los 1000 caracteres.",
        );
        let condiciones_medicas = v.optional_text(
            "condiciones_medicas",
            1000,
            "Las condiciones médicas no pueden exceder los 1000 caracteres.",
        );
        let notas = v.optional_text(
            "notas",
            1000,
            "Las notas no pueden exceder los 1000 caracteres.",
        );
        let activo = v
            .optional_bool("activo", "El campo activo debe ser verdadero o falso.")
            .unwrap_or(true);
        let fecha_ingreso = v.optional_date(
            "fecha_ingreso",
            "La fecha de ingreso debe ser una fecha válida (YYYY-MM-DD).",
        );

        Self {
            nombre,
            apellido_paterno,
            apellido_materno,
            fecha_nacimiento,
            categoria,
            posicion,
            numero_uniforme,
            altura,
            peso,
            tutor_id,
            tutor_secundario_id,
            telefono,
            email,
            direccion,
            escuela,
            grado_escolar,
            alergias,
            condiciones_medicas,
            notas,
            activo,
            fecha_ingreso,
        }
    }
}

/// Optional notes attached to a player/tournament assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentInput {
    pub notas: Option<String>,
}

impl FromBody for AssignmentInput {
    fn collect(v: &mut Validator<'_>) -> Self {
        Self {
            notas: v.optional_text(
                "notas",
                1000,
                "Las notas no pueden exceder los 1000 caracteres.",
            ),
        }
    }
}
