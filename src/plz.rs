//! Typed postal codes.
//!
//! CSV extracts and boundary files disagree on how a postal code is spelled
//! (`10115`, `"10115"`, `10115.0`). Both sides are parsed into [`Plz`] before
//! any grouping or joining, so comparisons are always integer comparisons.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PipelineError, Result};

/// Largest value a five-digit postal code can take.
pub const MAX_PLZ: u32 = 99_999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Plz(u32);

impl Plz {
    pub fn new(value: u32) -> Option<Self> {
        (value <= MAX_PLZ).then_some(Plz(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Parses a textual postal code.
    ///
    /// Surrounding whitespace is ignored and a zero fractional part
    /// (`"10115.0"`) is accepted, since spreadsheet exports often write
    /// integer columns that way. `location` is only used for the error.
    pub fn parse(raw: &str, location: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let digits = match trimmed.split_once('.') {
            Some((int, frac)) if !frac.is_empty() && frac.bytes().all(|b| b == b'0') => int,
            Some(_) => return Err(key_type(raw, location)),
            None => trimmed,
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(key_type(raw, location));
        }

        digits
            .parse::<u32>()
            .ok()
            .and_then(Plz::new)
            .ok_or_else(|| key_type(raw, location))
    }

    /// Normalizes a JSON property value (number or string) into a postal code.
    pub fn from_json(value: &Value, location: &str) -> Result<Self> {
        match value {
            Value::String(s) => Plz::parse(s, location),
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    u32::try_from(v)
                        .ok()
                        .and_then(Plz::new)
                        .ok_or_else(|| key_type(&n.to_string(), location))
                } else if let Some(f) = n.as_f64() {
                    if f.fract() == 0.0 && f >= 0.0 && f <= MAX_PLZ as f64 {
                        Ok(Plz(f as u32))
                    } else {
                        Err(key_type(&n.to_string(), location))
                    }
                } else {
                    Err(key_type(&n.to_string(), location))
                }
            }
            other => Err(key_type(&other.to_string(), location)),
        }
    }
}

impl fmt::Display for Plz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn key_type(value: &str, location: &str) -> PipelineError {
    PipelineError::KeyType {
        value: value.to_string(),
        location: location.to_string(),
    }
}
