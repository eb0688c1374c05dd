//! Column types and best-effort casting

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::value::CellValue;
use crate::error::CastError;

/// ISO date format used by the default [`CellType::Date`] candidate.
pub const ISO_DATE: &str = "%Y-%m-%d";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Semantic type tag of a cell, and the cast that produces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    String,
    Integer,
    Float,
    Bool,
    /// Date parsed with a chrono format string
    Date(Cow<'static, str>),
    DateTime,
}

impl Default for CellType {
    fn default() -> Self {
        CellType::String
    }
}

impl CellType {
    /// Date type using the ISO `YYYY-MM-DD` layout
    pub fn iso_date() -> Self {
        CellType::Date(Cow::Borrowed(ISO_DATE))
    }

    /// Date type with a custom chrono format
    pub fn date(format: impl Into<Cow<'static, str>>) -> Self {
        CellType::Date(format.into())
    }

    /// The natural type of an already decoded value
    pub fn of(value: &CellValue) -> Self {
        match value {
            CellValue::Null | CellValue::String(_) => CellType::String,
            CellValue::Bool(_) => CellType::Bool,
            CellValue::Int(_) => CellType::Integer,
            CellValue::Float(_) => CellType::Float,
            CellValue::Date(_) => CellType::iso_date(),
            CellValue::DateTime(_) => CellType::DateTime,
        }
    }

    /// Candidates tried by type guessing when the caller supplies none
    pub fn guess_candidates() -> Vec<CellType> {
        vec![
            CellType::String,
            CellType::Integer,
            CellType::Float,
            CellType::Bool,
            CellType::iso_date(),
            CellType::DateTime,
        ]
    }

    /// Score a type earns for each matching sample value while guessing
    pub fn guessing_weight(&self) -> u32 {
        match self {
            CellType::String => 1,
            CellType::Integer => 6,
            CellType::Float => 4,
            CellType::Bool => 7,
            CellType::Date(_) | CellType::DateTime => 3,
        }
    }

    /// Whether `value` can be represented by this type
    pub fn test(&self, value: &CellValue) -> bool {
        self.cast(value).is_ok()
    }

    /// Convert `value` into this type.
    ///
    /// `String` never fails. Every other type maps a blank value to `Null`.
    pub fn cast(&self, value: &CellValue) -> Result<CellValue, CastError> {
        if let CellType::String = self {
            return Ok(cast_string(value));
        }

        if value.is_blank() {
            return Ok(CellValue::Null);
        }

        let cast = match self {
            CellType::String => Some(cast_string(value)),
            CellType::Integer => cast_integer(value),
            CellType::Float => cast_float(value),
            CellType::Bool => cast_bool(value),
            CellType::Date(format) => cast_date(value, format),
            CellType::DateTime => cast_datetime(value),
        };

        cast.ok_or_else(|| CastError {
            value: value.clone(),
            target: self.clone(),
        })
    }
}

fn cast_string(value: &CellValue) -> CellValue {
    match value {
        CellValue::Null => CellValue::Null,
        CellValue::String(s) => CellValue::String(s.clone()),
        other => CellValue::String(Cow::Owned(other.display().into_owned())),
    }
}

fn cast_integer(value: &CellValue) -> Option<CellValue> {
    match value {
        CellValue::Int(i) => Some(CellValue::Int(*i)),
        CellValue::Float(f) => {
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Some(CellValue::Int(*f as i64))
            } else {
                None
            }
        }
        CellValue::String(s) => s.trim().parse::<i64>().ok().map(CellValue::Int),
        _ => None,
    }
}

fn cast_float(value: &CellValue) -> Option<CellValue> {
    match value {
        CellValue::Int(i) => Some(CellValue::Float(*i as f64)),
        CellValue::Float(f) => Some(CellValue::Float(*f)),
        CellValue::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(CellValue::Float),
        _ => None,
    }
}

fn cast_bool(value: &CellValue) -> Option<CellValue> {
    match value {
        CellValue::Bool(b) => Some(CellValue::Bool(*b)),
        CellValue::Int(0) => Some(CellValue::Bool(false)),
        CellValue::Int(1) => Some(CellValue::Bool(true)),
        CellValue::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "t" | "y" | "1" => Some(CellValue::Bool(true)),
            "false" | "no" | "f" | "n" | "0" => Some(CellValue::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn cast_date(value: &CellValue, format: &str) -> Option<CellValue> {
    match value {
        CellValue::Date(d) => Some(CellValue::Date(*d)),
        CellValue::DateTime(dt) => Some(CellValue::Date(dt.date())),
        CellValue::String(s) => NaiveDate::parse_from_str(s.trim(), format)
            .ok()
            .map(CellValue::Date),
        _ => None,
    }
}

fn cast_datetime(value: &CellValue) -> Option<CellValue> {
    match value {
        CellValue::DateTime(dt) => Some(CellValue::DateTime(*dt)),
        CellValue::Date(d) => d.and_hms_opt(0, 0, 0).map(CellValue::DateTime),
        CellValue::String(s) => {
            let trimmed = s.trim();
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(CellValue::DateTime)
        }
        _ => None,
    }
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellType::String => write!(f, "string"),
            CellType::Integer => write!(f, "integer"),
            CellType::Float => write!(f, "float"),
            CellType::Bool => write!(f, "bool"),
            CellType::Date(format) => write!(f, "date({})", format),
            CellType::DateTime => write!(f, "datetime"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_always_succeeds() {
        assert_eq!(
            CellType::String.cast(&CellValue::Int(7)),
            Ok(CellValue::from("7"))
        );
        assert_eq!(CellType::String.cast(&CellValue::Null), Ok(CellValue::Null));
        assert_eq!(
            CellType::String.cast(&CellValue::from(" x ")),
            Ok(CellValue::from(" x "))
        );
    }

    #[test]
    fn test_integer_cast() {
        assert_eq!(
            CellType::Integer.cast(&CellValue::from(" 42 ")),
            Ok(CellValue::Int(42))
        );
        assert_eq!(
            CellType::Integer.cast(&CellValue::Float(3.0)),
            Ok(CellValue::Int(3))
        );
        assert!(CellType::Integer.cast(&CellValue::Float(3.5)).is_err());
        assert!(CellType::Integer.cast(&CellValue::from("x")).is_err());
    }

    #[test]
    fn test_blank_casts_to_null() {
        assert_eq!(CellType::Integer.cast(&CellValue::from("")), Ok(CellValue::Null));
        assert_eq!(CellType::Bool.cast(&CellValue::Null), Ok(CellValue::Null));
    }

    #[test]
    fn test_float_cast() {
        assert_eq!(
            CellType::Float.cast(&CellValue::from("3.25")),
            Ok(CellValue::Float(3.25))
        );
        assert_eq!(CellType::Float.cast(&CellValue::Int(2)), Ok(CellValue::Float(2.0)));
        assert!(CellType::Float.cast(&CellValue::from("inf")).is_err());
    }

    #[test]
    fn test_bool_cast() {
        assert_eq!(CellType::Bool.cast(&CellValue::from("Yes")), Ok(CellValue::Bool(true)));
        assert_eq!(CellType::Bool.cast(&CellValue::from("f")), Ok(CellValue::Bool(false)));
        assert!(CellType::Bool.cast(&CellValue::from("maybe")).is_err());
        assert!(CellType::Bool.cast(&CellValue::Int(2)).is_err());
    }

    #[test]
    fn test_date_cast() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            CellType::iso_date().cast(&CellValue::from("2024-02-29")),
            Ok(CellValue::Date(expected))
        );
        assert_eq!(
            CellType::date("%d/%m/%Y").cast(&CellValue::from("29/02/2024")),
            Ok(CellValue::Date(expected))
        );
        assert!(CellType::iso_date().cast(&CellValue::from("29/02/2024")).is_err());
    }

    #[test]
    fn test_datetime_cast() {
        let cast = CellType::DateTime.cast(&CellValue::from("2024-01-02 03:04:05")).unwrap();
        assert_eq!(cast.to_string(), "2024-01-02 03:04:05");
        assert!(CellType::DateTime.cast(&CellValue::from("yesterday")).is_err());
    }

    #[test]
    fn test_cast_error_carries_value() {
        let err = CellType::Integer.cast(&CellValue::from("abc")).unwrap_err();
        assert_eq!(err.value, CellValue::from("abc"));
        assert_eq!(err.target, CellType::Integer);
    }

    #[test]
    fn test_type_of_value() {
        assert_eq!(CellType::of(&CellValue::Int(1)), CellType::Integer);
        assert_eq!(CellType::of(&CellValue::Null), CellType::String);
        assert_eq!(CellType::of(&CellValue::Float(1.5)), CellType::Float);
    }
}
