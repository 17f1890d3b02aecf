//! Request validation.
//!
//! A [`Validator`] walks an untrusted JSON body field by field. Every rule
//! coerces its field into a typed value, records at most one [`FieldError`]
//! and always returns something usable, so a payload type can be assembled
//! unconditionally and the collected errors are reported together by
//! [`Validator::finish`]. Nothing here touches the database.

pub mod coerce;

use crate::errors::{ClubError, ClubResult, FieldError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use validator::{ValidateEmail, ValidateUrl};

/// Length bounds and messages for a required text field.
#[derive(Debug, Clone, Copy)]
pub struct TextRule {
    pub min: usize,
    pub max: usize,
    pub missing: &'static str,
    pub length: &'static str,
}

/// Lower bound for a decimal field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lower {
    /// Zero allowed
    NonNegative,
    /// Strictly greater than zero
    Positive,
}

/// Collects field violations while coercing a request body.
pub struct Validator<'a> {
    body: Option<&'a Map<String, Value>>,
    errors: Vec<FieldError>,
}

impl<'a> Validator<'a> {
    /// Start validating a request body.
    ///
    /// A body that is not a JSON object behaves as an empty object, so every
    /// required field is reported missing.
    pub fn new(body: &'a Value) -> Self {
        Self {
            body: body.as_object(),
            errors: Vec::new(),
        }
    }

    /// Validator for requests that only carry path parameters.
    pub fn empty() -> Validator<'static> {
        Validator {
            body: None,
            errors: Vec::new(),
        }
    }

    /// Field value, treating JSON `null` as absent.
    fn raw(&self, field: &str) -> Option<&'a Value> {
        self.body
            .and_then(|body| body.get(field))
            .filter(|value| !value.is_null())
    }

    /// Untrimmed string value of a field.
    pub fn raw_str(&self, field: &str) -> Option<&'a str> {
        self.raw(field).and_then(Value::as_str)
    }

    /// Field value for optional rules where falsy values (`""`, `0`, `false`)
    /// also mean absent.
    fn present(&self, field: &str) -> Option<&'a Value> {
        self.raw(field).filter(|value| match value {
            Value::String(s) => !s.trim().is_empty(),
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() != Some(0.0),
            _ => true,
        })
    }

    /// Record a violation unless the field already has one.
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        if !self.has_error(field) {
            self.errors.push(FieldError::new(field, message));
        }
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Cross-field constraint: reject `field` when `holds` is false.
    pub fn check(&mut self, field: &str, holds: bool, message: &str) {
        if !holds {
            self.reject(field, message);
        }
    }

    /// Positive integer path parameter.
    ///
    /// # Arguments
    ///
    /// * `field` - Parameter name reported in the error
    /// * `raw` - Undecoded path segment
    /// * `message` - Message used when the segment is not a positive integer
    pub fn path_id(&mut self, field: &str, raw: &str, message: &str) -> i64 {
        match coerce::positive_id(raw) {
            Some(id) => id,
            None => {
                self.reject(field, message);
                0
            }
        }
    }

    /// Required trimmed text with length bounds counted in characters.
    pub fn required_text(&mut self, field: &str, rule: TextRule) -> String {
        let text = self.raw(field).and_then(coerce::text).unwrap_or_default();
        if text.is_empty() {
            self.reject(field, rule.missing);
            return text;
        }
        let len = text.chars().count();
        if len < rule.min || len > rule.max {
            self.reject(field, rule.length);
        }
        text
    }

    /// Optional trimmed text; absent, `null` and blank all yield `None`.
    pub fn optional_text(&mut self, field: &str, max: usize, too_long: &str) -> Option<String> {
        let value = self.present(field)?;
        let Some(text) = coerce::text(value) else {
            self.reject(field, too_long);
            return None;
        };
        if text.chars().count() > max {
            self.reject(field, too_long);
        }
        Some(text)
    }

    /// Optional trimmed text with a minimum length as well.
    pub fn optional_bounded_text(&mut self, field: &str, rule: TextRule) -> Option<String> {
        let value = self.present(field)?;
        let text = coerce::text(value).unwrap_or_default();
        let len = text.chars().count();
        if len < rule.min || len > rule.max {
            self.reject(field, rule.length);
        }
        Some(text)
    }

    /// Required positive integer reference to another entity.
    pub fn required_id(&mut self, field: &str, missing: &str, invalid: &str) -> i64 {
        let Some(value) = self.raw(field).filter(|v| v.as_str().is_none_or(|s| !s.trim().is_empty()))
        else {
            self.reject(field, missing);
            return 0;
        };
        match coerce::integer(value).filter(|id| *id > 0) {
            Some(id) => id,
            None => {
                self.reject(field, invalid);
                0
            }
        }
    }

    /// Optional positive integer reference; `null` clears it.
    pub fn optional_id(&mut self, field: &str, invalid: &str) -> Option<i64> {
        let value = self.raw(field)?;
        let id = coerce::integer(value).filter(|id| *id > 0);
        if id.is_none() {
            self.reject(field, invalid);
        }
        id
    }

    /// Optional integer with an inclusive lower bound.
    pub fn optional_int(&mut self, field: &str, min: i32, invalid: &str) -> Option<i32> {
        let value = self.raw(field)?;
        let number = coerce::integer(value)
            .and_then(|n| i32::try_from(n).ok())
            .filter(|n| *n >= min);
        if number.is_none() {
            self.reject(field, invalid);
        }
        number
    }

    fn decimal(&mut self, field: &str, value: &Value, lower: Lower, max: Decimal, invalid: &str) -> Option<Decimal> {
        let number = coerce::decimal(value).filter(|n| {
            let above = match lower {
                Lower::NonNegative => *n >= Decimal::ZERO,
                Lower::Positive => *n > Decimal::ZERO,
            };
            above && *n <= max
        });
        if number.is_none() {
            self.reject(field, invalid);
        }
        number
    }

    /// Required decimal amount.
    ///
    /// # Arguments
    ///
    /// * `lower` - Whether zero is accepted
    /// * `max` - Largest value the column can store
    pub fn required_decimal(
        &mut self,
        field: &str,
        missing: &str,
        lower: Lower,
        max: Decimal,
        invalid: &str,
    ) -> Decimal {
        let Some(value) = self.raw(field).filter(|v| v.as_str().is_none_or(|s| !s.trim().is_empty()))
        else {
            self.reject(field, missing);
            return Decimal::ZERO;
        };
        self.decimal(field, value, lower, max, invalid)
            .unwrap_or(Decimal::ZERO)
    }

    /// Optional decimal; `null` clears it.
    pub fn optional_decimal(&mut self, field: &str, lower: Lower, max: Decimal, invalid: &str) -> Option<Decimal> {
        let value = self.raw(field)?;
        self.decimal(field, value, lower, max, invalid)
    }

    /// Required ISO date.
    pub fn required_date(&mut self, field: &str, invalid: &str) -> NaiveDate {
        match self.raw(field).and_then(coerce::date) {
            Some(date) => date,
            None => {
                self.reject(field, invalid);
                NaiveDate::default()
            }
        }
    }

    /// Optional ISO date; absent, `null` and `""` yield `None`.
    pub fn optional_date(&mut self, field: &str, invalid: &str) -> Option<NaiveDate> {
        let value = self.present(field)?;
        let date = coerce::date(value);
        if date.is_none() {
            self.reject(field, invalid);
        }
        date
    }

    /// Optional flag. Only validated when sent.
    pub fn optional_bool(&mut self, field: &str, invalid: &str) -> Option<bool> {
        let value = self.raw(field)?;
        let flag = coerce::boolean(value);
        if flag.is_none() {
            self.reject(field, invalid);
        }
        flag
    }

    /// Optional email, normalised to lowercase.
    pub fn optional_email(&mut self, field: &str, invalid: &str, too_long: &str) -> Option<String> {
        let value = self.present(field)?;
        let email = value.as_str().map(coerce::normalize_email).unwrap_or_default();
        if !email.validate_email() {
            self.reject(field, invalid);
        } else if email.chars().count() > 100 {
            self.reject(field, too_long);
        }
        Some(email)
    }

    /// Optional absolute http(s) URL.
    pub fn optional_url(&mut self, field: &str, max: usize, too_long: &str, invalid: &str) -> Option<String> {
        let value = self.present(field)?;
        let url = coerce::text(value).unwrap_or_default();
        if url.chars().count() > max {
            self.reject(field, too_long);
        } else {
            let lower = url.to_ascii_lowercase();
            let http = lower.starts_with("http://") || lower.starts_with("https://");
            if !http || !url.validate_url() {
                self.reject(field, invalid);
            }
        }
        Some(url)
    }

    /// Required member of a closed set, after trimming.
    pub fn required_choice<T>(
        &mut self,
        field: &str,
        missing: &str,
        invalid: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let text = self.raw(field).and_then(coerce::text).unwrap_or_default();
        if text.is_empty() {
            self.reject(field, missing);
            return None;
        }
        let choice = parse(&text);
        if choice.is_none() {
            self.reject(field, invalid);
        }
        choice
    }

    /// Optional member of a closed set; absent, `null` and blank yield `None`.
    pub fn optional_choice<T>(
        &mut self,
        field: &str,
        invalid: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<T> {
        let value = self.present(field)?;
        let choice = coerce::text(value).and_then(|text| parse(&text));
        if choice.is_none() {
            self.reject(field, invalid);
        }
        choice
    }

    /// Violations collected so far.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Hand back `value` if no rule rejected its field.
    pub fn finish<T>(self, value: T) -> ClubResult<T> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ClubError::Validation(self.errors))
        }
    }
}

/// A request payload built from a JSON body through a [`Validator`].
pub trait FromBody: Sized {
    /// Apply every field rule, in declaration order.
    fn collect(v: &mut Validator<'_>) -> Self;

    /// Validate a create payload.
    fn from_body(body: &Value) -> ClubResult<Self> {
        let mut v = Validator::new(body);
        let payload = Self::collect(&mut v);
        v.finish(payload)
    }
}

/// Message for a malformed `id` path parameter.
pub const ID_MESSAGE: &str = "El ID (id) debe ser un número entero positivo.";

/// Validate an `id` path parameter on its own.
pub fn validate_id(raw: &str, message: &str) -> ClubResult<i64> {
    let mut v = Validator::empty();
    let id = v.path_id("id", raw, message);
    v.finish(id)
}

/// Validate an update: the path id and the body in one pass.
pub fn validate_update<T: FromBody>(raw_id: &str, message: &str, body: &Value) -> ClubResult<(i64, T)> {
    let mut v = Validator::new(body);
    let id = v.path_id("id", raw_id, message);
    let payload = T::collect(&mut v);
    v.finish((id, payload))
}

/// Validate a player/tournament pair of path parameters together.
pub fn validate_relationship(raw_player: &str, raw_tournament: &str) -> ClubResult<(i64, i64)> {
    let mut v = Validator::empty();
    let player = v.path_id(
        "jugadoraId",
        raw_player,
        "El ID de la jugadora debe ser un número entero positivo.",
    );
    let tournament = v.path_id(
        "torneoId",
        raw_tournament,
        "El ID del torneo debe ser un número entero positivo.",
    );
    v.finish((player, tournament))
}
