//! Payment data models and list filters.

use crate::tournaments::models::max_amount;
use crate::validation::{FromBody, Lower, TextRule, Validator, coerce};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Payment lifecycle status, stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pendiente,
    Pagado,
    Cancelado,
}

impl PaymentStatus {
    /// Case-insensitive parse.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "pendiente" => Some(Self::Pendiente),
            "pagado" => Some(Self::Pagado),
            "cancelado" => Some(Self::Cancelado),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Pagado => "pagado",
            Self::Cancelado => "cancelado",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted payment methods. Matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Efectivo,
    Transferencia,
    TarjetaCredito,
    TarjetaDebito,
    Cheque,
    Otro,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        Self::Efectivo,
        Self::Transferencia,
        Self::TarjetaCredito,
        Self::TarjetaDebito,
        Self::Cheque,
        Self::Otro,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.as_str() == raw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Efectivo => "Efectivo",
            Self::Transferencia => "Transferencia",
            Self::TarjetaCredito => "Tarjeta de crédito",
            Self::TarjetaDebito => "Tarjeta de débito",
            Self::Cheque => "Cheque",
            Self::Otro => "Otro",
        }
    }
}

/// A payment as read back, with the owning player's name joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: i64,
    pub jugadora_id: i64,
    pub tutor_id: Option<i64>,
    pub concepto: String,
    pub monto: Decimal,
    pub fecha_pago: NaiveDate,
    pub metodo_pago: Option<String>,
    pub referencia: Option<String>,
    pub estado: String,
    pub comprobante: Option<String>,
    pub notas: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub ultima_actualizacion: DateTime<Utc>,
    pub jugadora_nombre: String,
    pub jugadora_apellido: String,
}

/// Validated create/replace payload for a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInput {
    pub jugadora_id: i64,
    pub tutor_id: Option<i64>,
    pub concepto: String,
    pub monto: Decimal,
    pub fecha_pago: NaiveDate,
    pub metodo_pago: Option<PaymentMethod>,
    pub referencia: Option<String>,
    pub estado: PaymentStatus,
    pub comprobante: Option<String>,
    pub notas: Option<String>,
}

impl FromBody for PaymentInput {
    fn collect(v: &mut Validator<'_>) -> Self {
        let jugadora_id = v.required_id(
            "jugadora_id",
            "El ID de la jugadora es obligatorio.",
            "El ID de la jugadora debe ser un número entero positivo.",
        );
        let tutor_id = v.optional_id(
            "tutor_id",
            "El ID del tutor debe ser un número entero positivo.",
        );
        let concepto = v.required_text(
            "concepto",
            TextRule {
                min: 3,
                max: 100,
                missing: "El concepto es obligatorio.",
                length: "El concepto debe tener entre 3 y 100 caracteres.",
            },
        );
        let monto = v.required_decimal(
            "monto",
            "El monto es obligatorio.",
            Lower::Positive,
            max_amount(),
            "El monto debe ser un número positivo.",
        );
        let fecha_pago = v.required_date(
            "fecha_pago",
            "La fecha de pago debe ser una fecha válida (YYYY-MM-DD).",
        );

        let metodo_pago = if v.raw_str("metodo_pago").is_some_and(|s| s.trim().chars().count() > 50) {
            v.reject(
                "metodo_pago",
                "El método de pago no puede exceder los 50 caracteres.",
            );
            None
        } else {
            v.optional_choice("metodo_pago", "Método de pago inválido.", PaymentMethod::parse)
        };

        let referencia = v.optional_text(
            "referencia",
            100,
            "La referencia no puede exceder los 100 caracteres.",
        );
        let estado = v
            .required_choice(
                "estado",
                "El estado es obligatorio.",
                "Estado inválido. Usar: pendiente, pagado, cancelado.",
                PaymentStatus::parse,
            )
            .unwrap_or(PaymentStatus::Pendiente);
        let comprobante = v.optional_url(
            "comprobante",
            255,
            "La ruta del comprobante no puede exceder los 255 caracteres.",
            "El comprobante debe ser una URL válida (si se proporciona como URL).",
        );
        let notas = v.optional_text(
            "notas",
            1000,
            "Las notas no pueden exceder los 1000 caracteres.",
        );

        Self {
            jugadora_id,
            tutor_id,
            concepto,
            monto,
            fecha_pago,
            metodo_pago,
            referencia,
            estado,
            comprobante,
            notas,
        }
    }
}

/// Optional predicates for listing payments.
///
/// Built leniently from query parameters: a value that does not parse is
/// dropped instead of rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    pub jugadora_id: Option<i64>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub estado: Option<PaymentStatus>,
}

impl PaymentFilter {
    /// Read `jugadoraId`, `fechaInicio`, `fechaFin` and `estado`.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let date = |key: &str| {
            params
                .get(key)
                .and_then(|raw| coerce::date(&Value::String(raw.clone())))
        };

        Self {
            jugadora_id: params.get("jugadoraId").and_then(|raw| coerce::positive_id(raw.trim())),
            fecha_inicio: date("fechaInicio"),
            fecha_fin: date("fechaFin"),
            estado: params.get("estado").and_then(|raw| PaymentStatus::parse(raw)),
        }
    }
}
