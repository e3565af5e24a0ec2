use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::core::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionKind {
    Number,
    String,
    Enum,
    Boolean,
    Date,
}

impl RestrictionKind {
    pub const ALL: [RestrictionKind; 5] = [
        Self::Number,
        Self::String,
        Self::Enum,
        Self::Boolean,
        Self::Date,
    ];

    /// Whether the editor shows min/max inputs for this kind.
    pub fn has_bounds(self) -> bool {
        matches!(self, Self::Number | Self::String)
    }
}

/// Typed constraint attached to a leaf. Captured and submitted, never enforced
/// against the document.
///
/// On the wire this is the flat `{ type, min?, max?, validValues }` record the
/// submission endpoint expects; `validValues` is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RestrictionWire", try_from = "RestrictionWire")]
pub enum Restriction {
    Number { min: Option<f64>, max: Option<f64> },
    /// Bounds are on the string's length.
    String {
        min_length: Option<u64>,
        max_length: Option<u64>,
    },
    Enum { valid_values: Vec<String> },
    Boolean,
    Date,
}

impl Restriction {
    pub fn empty(kind: RestrictionKind) -> Self {
        match kind {
            RestrictionKind::Number => Self::Number {
                min: None,
                max: None,
            },
            RestrictionKind::String => Self::String {
                min_length: None,
                max_length: None,
            },
            RestrictionKind::Enum => Self::Enum {
                valid_values: Vec::new(),
            },
            RestrictionKind::Boolean => Self::Boolean,
            RestrictionKind::Date => Self::Date,
        }
    }

    pub fn kind(&self) -> RestrictionKind {
        match self {
            Self::Number { .. } => RestrictionKind::Number,
            Self::String { .. } => RestrictionKind::String,
            Self::Enum { .. } => RestrictionKind::Enum,
            Self::Boolean => RestrictionKind::Boolean,
            Self::Date => RestrictionKind::Date,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::Number {
                min: Some(min),
                max: Some(max),
            } if min > max => Err(AppError::InvalidInput(format!(
                "min {min} is greater than max {max}"
            ))),
            Self::String {
                min_length: Some(min),
                max_length: Some(max),
            } if min > max => Err(AppError::InvalidInput(format!(
                "min length {min} is greater than max length {max}"
            ))),
            Self::Enum { valid_values } if valid_values.is_empty() => Err(AppError::InvalidInput(
                "enum restriction needs at least one valid value".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestrictionWire {
    #[serde(rename = "type")]
    kind: RestrictionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<Number>,
    #[serde(default)]
    valid_values: Vec<String>,
}

impl From<Restriction> for RestrictionWire {
    fn from(value: Restriction) -> Self {
        let kind = value.kind();
        let (min, max, valid_values) = match value {
            Restriction::Number { min, max } => {
                (min.and_then(number_bound), max.and_then(number_bound), vec![])
            }
            Restriction::String {
                min_length,
                max_length,
            } => (min_length.map(Number::from), max_length.map(Number::from), vec![]),
            Restriction::Enum { valid_values } => (None, None, valid_values),
            Restriction::Boolean | Restriction::Date => (None, None, vec![]),
        };
        Self {
            kind,
            min,
            max,
            valid_values,
        }
    }
}

impl TryFrom<RestrictionWire> for Restriction {
    type Error = String;

    fn try_from(wire: RestrictionWire) -> Result<Self, Self::Error> {
        Ok(match wire.kind {
            RestrictionKind::Number => Self::Number {
                min: wire.min.as_ref().and_then(Number::as_f64),
                max: wire.max.as_ref().and_then(Number::as_f64),
            },
            RestrictionKind::String => Self::String {
                min_length: wire.min.as_ref().map(length_bound).transpose()?,
                max_length: wire.max.as_ref().map(length_bound).transpose()?,
            },
            RestrictionKind::Enum => Self::Enum {
                valid_values: wire.valid_values,
            },
            RestrictionKind::Boolean => Self::Boolean,
            RestrictionKind::Date => Self::Date,
        })
    }
}

// Whole numbers go out as integers so `5` stays `5` rather than `5.0`.
fn number_bound(value: f64) -> Option<Number> {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Some(Number::from(value as i64))
    } else {
        Number::from_f64(value)
    }
}

fn length_bound(value: &Number) -> Result<u64, String> {
    value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|raw| *raw >= 0.0 && raw.fract() == 0.0)
                .map(|raw| raw as u64)
        })
        .ok_or_else(|| format!("string length bound must be a non-negative integer, got {value}"))
}
