//! Catalog descriptors returned by the introspection endpoints

use serde::Serialize;

/// One column of a relation, in ordinal order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub column_order: i32,
    pub default_value: Option<String>,
}

/// One constraint/column pair from pg_constraint.
///
/// `target_*` are only present for foreign keys. `constraint_type` is the
/// single-letter `contype` code (`p`, `f`, `u`, `c`, `x`, `t`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintDescriptor {
    pub constraint_name: String,
    pub source_table: String,
    pub source_column: Option<String>,
    pub target_table: Option<String>,
    pub target_column: Option<String>,
    pub constraint_type: String,
}
