//! Tournament data models.

use crate::validation::{FromBody, Lower, TextRule, Validator};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A dated competitive event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tournament {
    pub id: i64,
    pub nombre: String,
    pub ubicacion: Option<String>,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub descripcion: Option<String>,
    pub organizador: Option<String>,
    pub costo: Option<Decimal>,
    pub notas: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub ultima_actualizacion: DateTime<Utc>,
}

/// Player summary shown on a tournament roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RosterEntry {
    pub id: i64,
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub categoria: String,
}

/// Validated create/replace payload for a tournament.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentInput {
    pub nombre: String,
    pub ubicacion: Option<String>,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub descripcion: Option<String>,
    pub organizador: Option<String>,
    pub costo: Option<Decimal>,
    pub notas: Option<String>,
}

pub const END_BEFORE_START: &str = "La fecha de fin no puede ser anterior a la fecha de inicio.";

/// Largest amount a `NUMERIC(10, 2)` column holds.
pub(crate) fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

impl FromBody for TournamentInput {
    fn collect(v: &mut Validator<'_>) -> Self {
        let nombre = v.required_text(
            "nombre",
            TextRule {
                min: 3,
                max: 100,
                missing: "El nombre del torneo es obligatorio.",
                length: "El nombre debe tener entre 3 y 100 caracteres.",
            },
        );
        let ubicacion = v.optional_text(
            "ubicacion",
            100,
            "La ubicación no puede exceder los 100 caracteres.",
        );
        let fecha_inicio = v.required_date(
            "fecha_inicio",
            "La fecha de inicio debe ser una fecha válida (YYYY-MM-DD).",
        );
        let fecha_fin = v.required_date(
            "fecha_fin",
            "La fecha de fin debe ser una fecha válida (YYYY-MM-DD).",
        );
        // Only comparable when both dates parsed.
        if !v.has_error("fecha_inicio") && !v.has_error("fecha_fin") {
            v.check("fecha_fin", fecha_fin >= fecha_inicio, END_BEFORE_START);
        }
        let descripcion = v.optional_text(
            "descripcion",
            1000,
            "La descripción no puede exceder los 1000 caracteres.",
        );
        let organizador = v.optional_text(
            "organizador",
            100,
            "El organizador no puede exceder los 100 caracteres.",
        );
        let costo = v.optional_decimal(
            "costo",
            Lower::NonNegative,
            max_amount(),
            "El costo debe ser un número no negativo.",
        );
        let notas = v.optional_text(
            "notas",
            1000,
            "Las notas no pueden exceder los 1000 caracteres.",
        );

        Self {
            nombre,
            ubicacion,
            fecha_inicio,
            fecha_fin,
            descripcion,
            organizador,
            costo,
            notas,
        }
    }
}
