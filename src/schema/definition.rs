//! Column metadata reported by the schema collaborator.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Storage type of a column, as far as the compiler cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[serde(alias = "integer", alias = "bigint", alias = "smallint", alias = "tinyint")]
    Int,
    #[serde(alias = "double", alias = "decimal", alias = "real")]
    Float,
    #[serde(alias = "varchar", alias = "text", alias = "char")]
    String,
    #[serde(alias = "boolean")]
    Bool,
    Date,
    #[serde(alias = "timestamp")]
    Datetime,
    Json,
    #[default]
    #[serde(other)]
    Other,
}

impl DataType {
    /// Whether relational comparators compare values of this type as dates.
    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::Date | DataType::Datetime)
    }
}

/// Metadata for one column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Ordinal position in the table (1-based)
    #[serde(default)]
    pub position: u32,

    #[serde(default = "default_nullable")]
    pub nullable: bool,

    /// Default value, if the column has one
    #[serde(default)]
    pub default: Option<Value>,

    #[serde(rename = "type", default)]
    pub data_type: DataType,
}

fn default_nullable() -> bool {
    true
}

impl ColumnInfo {
    pub fn new(position: u32, data_type: DataType) -> Self {
        Self {
            position,
            nullable: true,
            default: None,
            data_type,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_info_deserialization() {
        let json = r#"{"position": 2, "nullable": false, "default": "x", "type": "varchar"}"#;
        let info: ColumnInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.position, 2);
        assert!(!info.nullable);
        assert_eq!(info.default, Some(Value::Str("x".into())));
        assert_eq!(info.data_type, DataType::String);
    }

    #[test]
    fn test_column_info_defaults() {
        let info: ColumnInfo = serde_json::from_str("{}").unwrap();
        assert!(info.nullable);
        assert_eq!(info.data_type, DataType::Other);
    }

    #[test]
    fn test_unknown_type_is_other() {
        let info: ColumnInfo = serde_json::from_str(r#"{"type": "geometry"}"#).unwrap();
        assert_eq!(info.data_type, DataType::Other);
    }

    #[test]
    fn test_builder_helpers() {
        let info = ColumnInfo::new(1, DataType::Int).not_null().with_default(0);
        assert!(!info.nullable);
        assert_eq!(info.default, Some(Value::Int(0)));
    }
}
