//! SQL identifier validation
//!
//! Table and column names are interpolated into SQL text, so they must
//! match a plain unquoted identifier: `^[A-Za-z_][A-Za-z0-9_]*$`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Postgres truncates identifiers longer than NAMEDATALEN - 1 bytes.
const MAX_IDENTIFIER_LEN: usize = 63;

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("invalid identifier regex")
});

/// Check a table name against the identifier pattern only.
pub fn is_valid_table_name(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

fn validate(field: &'static str, s: &str) -> Result<(), ValidationError> {
    if s.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if s.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_IDENTIFIER_LEN,
        });
    }

    if !IDENTIFIER_RE.is_match(s) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must start with a letter or underscore and contain only letters, digits and underscores",
        });
    }

    Ok(())
}

/// Validated table name, safe to interpolate into SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// Create a table name, validating identifier format.
    ///
    /// # Example
    /// ```
    /// use pgdeck_server::models::TableName;
    ///
    /// assert!(TableName::new("users").is_ok());
    /// assert!(TableName::new("1users").is_err());
    /// assert!(TableName::new("users; DROP TABLE users").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate("table name", s)?;
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated column name from an insert payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnName(String);

impl ColumnName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        validate("column name", s)?;
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifiers() {
        assert!(is_valid_table_name("users"));
        assert!(is_valid_table_name("_private"));
        assert!(is_valid_table_name("Order_Items2"));
        assert!(is_valid_table_name("a"));
    }

    #[test]
    fn rejects_non_identifiers() {
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("1users"));
        assert!(!is_valid_table_name("users;"));
        assert!(!is_valid_table_name("my table"));
        assert!(!is_valid_table_name("\"users\""));
        assert!(!is_valid_table_name("users'"));
        assert!(!is_valid_table_name("public.users"));
        assert!(!is_valid_table_name("order-items"));
    }

    #[test]
    fn rejects_injection() {
        let err = TableName::new("users; DROP TABLE users").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_empty() {
        let err = TableName::new("").unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "table name" });
    }

    #[test]
    fn max_length() {
        assert!(TableName::new(&"t".repeat(63)).is_ok());

        let err = TableName::new(&"t".repeat(64)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 63, .. }));
    }

    #[test]
    fn column_name_uses_own_field() {
        let err = ColumnName::new("bad column").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidFormat { field: "column name", .. }
        ));
    }
}
