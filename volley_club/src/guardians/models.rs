//! Guardian data models.

use crate::validation::{FromBody, TextRule, Validator, coerce};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A responsible adult linked to one or more players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Guardian {
    pub id: i64,
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub telefono: String,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub ocupacion: Option<String>,
    pub notas: Option<String>,
    pub activo: bool,
    pub fecha_creacion: DateTime<Utc>,
    pub ultima_actualizacion: DateTime<Utc>,
}

/// Validated create/replace payload for a guardian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianInput {
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub telefono: String,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub ocupacion: Option<String>,
    pub notas: Option<String>,
    pub activo: bool,
}

/// Message for a malformed guardian id in the path.
pub const GUARDIAN_ID_MESSAGE: &str = "El ID del tutor debe ser un número entero positivo.";

impl FromBody for GuardianInput {
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

        let telefono = v.required_text(
            "telefono",
            TextRule {
                min: 7,
                max: 20,
                missing: "El teléfono es obligatorio.",
                length: "El teléfono debe tener entre 7 y 20 caracteres.",
            },
        );
        if !v.has_error("telefono") {
            v.check("telefono", coerce::is_phone(&telefono), "Formato de teléfono inválido.");
        }

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
        let ocupacion = v.optional_text(
            "ocupacion",
            100,
            "La ocupación no puede exceder los 100 caracteres.",
        );
        let notas = v.optional_text(
            "notas",
            1000,
            "Las notas no pueden exceder los 1000 caracteres.",
        );
        let activo = v
            .optional_bool("activo", "El campo activo debe ser verdadero o falso.")
            .unwrap_or(true);

        Self {
            nombre,
            apellido_paterno,
            apellido_materno,
            telefono,
            email,
            direccion,
            ocupacion,
            notas,
            activo,
        }
    }
}
