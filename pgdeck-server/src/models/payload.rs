//! Insert payloads
//!
//! A JSON object becomes an ordered list of (column, value) pairs. The
//! parsed map keeps keys sorted, so equivalent payloads always produce
//! the same statement and parameter order.

use super::{ColumnName, ValidationError, Value};

/// Validated column/value pairs for a single-row insert
#[derive(Debug, Clone, PartialEq)]
pub struct InsertPayload {
    pairs: Vec<(ColumnName, Value)>,
}

#[allow(clippy::len_without_is_empty)]
impl InsertPayload {
    /// Build a payload from a decoded JSON body.
    ///
    /// Rejects non-objects, empty objects and keys that are not plain
    /// identifiers.
    pub fn from_json(body: serde_json::Value) -> Result<Self, ValidationError> {
        let serde_json::Value::Object(map) = body else {
            return Err(ValidationError::InvalidFormat {
                field: "request body",
                reason: "must be a JSON object of column to value",
            });
        };

        if map.is_empty() {
            return Err(ValidationError::Empty {
                field: "request body",
            });
        }

        let pairs = map
            .into_iter()
            .map(|(key, value)| Ok((ColumnName::new(&key)?, Value::from(value))))
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(Self { pairs })
    }

    /// Number of columns. Never zero: empty objects are rejected.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnName, &Value)> {
        self.pairs.iter().map(|(c, v)| (c, v))
    }
}
