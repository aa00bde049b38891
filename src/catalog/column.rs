//! Column descriptors handed to a cursor by the query engine's catalog
//!
//! Supported output types:
//! - boolean
//! - bigint: 64-bit signed integer
//! - double: 64-bit floating point
//! - varchar: variable-length text
//! - unsupported: anything else, readable only as a raw value

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::{CatalogError, CatalogResult};

/// Metadata fields every hit carries regardless of projection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntheticField {
    /// Document identifier, `_id`
    Id,
    /// Name of the index holding the document, `_index`
    Index,
}

impl SyntheticField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntheticField::Id => "_id",
            SyntheticField::Index => "_index",
        }
    }
}

/// Where a column's value comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnPath {
    /// Hit metadata
    Synthetic(SyntheticField),
    /// A top-level document key or projected field name.
    ///
    /// Dotted paths are matched literally against top-level keys, they are
    /// not walked into nested objects.
    Document(String),
}

impl ColumnPath {
    /// Classify a raw path string
    pub fn parse(path: &str) -> Self {
        match path {
            "_id" => ColumnPath::Synthetic(SyntheticField::Id),
            "_index" => ColumnPath::Synthetic(SyntheticField::Index),
            other => ColumnPath::Document(other.to_string()),
        }
    }

    /// The key this path is matched against
    pub fn as_str(&self) -> &str {
        match self {
            ColumnPath::Synthetic(field) => field.as_str(),
            ColumnPath::Document(path) => path,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, ColumnPath::Synthetic(_))
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ColumnPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ColumnPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ColumnPath::parse(&raw))
    }
}

/// Mapping category of the document field behind a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    /// Any field the store can return through field projection
    #[default]
    Scalar,
    /// Nested object field; forces full-document retrieval
    Nested,
}

/// Output type declared by the query engine for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    Boolean,
    Bigint,
    Double,
    Varchar,
    Unsupported,
}

impl OutputType {
    pub fn type_name(&self) -> &'static str {
        match self {
            OutputType::Boolean => "boolean",
            OutputType::Bigint => "bigint",
            OutputType::Double => "double",
            OutputType::Varchar => "varchar",
            OutputType::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// One output column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name as the engine knows it
    pub name: String,
    /// Document key or metadata field holding the value
    pub path: ColumnPath,
    /// Document field category
    #[serde(default)]
    pub category: FieldCategory,
    /// Declared output type
    pub output_type: OutputType,
}

impl ColumnDescriptor {
    /// Create a scalar column whose name is its path
    pub fn scalar(path: &str, output_type: OutputType) -> Self {
        Self {
            name: path.to_string(),
            path: ColumnPath::parse(path),
            category: FieldCategory::Scalar,
            output_type,
        }
    }

    /// Create a nested-object column whose name is its path
    pub fn nested(path: &str, output_type: OutputType) -> Self {
        Self {
            category: FieldCategory::Nested,
            ..Self::scalar(path, output_type)
        }
    }

    pub fn is_nested(&self) -> bool {
        self.category == FieldCategory::Nested
    }
}

/// The ordered column list for one cursor.
///
/// Paths are unique, so a path identifies exactly one output position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<ColumnDescriptor>,
    document_positions: HashMap<String, usize>,
    synthetic_positions: HashMap<SyntheticField, usize>,
}

impl ColumnSet {
    /// Validate and index a column list
    pub fn new(columns: Vec<ColumnDescriptor>) -> CatalogResult<Self> {
        if columns.is_empty() {
            return Err(CatalogError::EmptyColumnList);
        }

        let mut document_positions = HashMap::with_capacity(columns.len());
        let mut synthetic_positions = HashMap::new();

        for (position, column) in columns.iter().enumerate() {
            let duplicate = match &column.path {
                ColumnPath::Document(path) => {
                    document_positions.insert(path.clone(), position).is_some()
                }
                ColumnPath::Synthetic(field) => {
                    synthetic_positions.insert(*field, position).is_some()
                }
            };
            if duplicate {
                return Err(CatalogError::DuplicateColumnPath(column.path.to_string()));
            }
        }

        Ok(Self {
            columns,
            document_positions,
            synthetic_positions,
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter()
    }

    /// Output position of the column reading document key `key`
    pub fn document_position(&self, key: &str) -> Option<usize> {
        self.document_positions.get(key).copied()
    }

    /// Output position of the column reading hit metadata `field`
    pub fn synthetic_position(&self, field: SyntheticField) -> Option<usize> {
        self.synthetic_positions.get(&field).copied()
    }

    /// Whether any column is a nested-object field
    pub fn has_nested(&self) -> bool {
        self.columns.iter().any(ColumnDescriptor::is_nested)
    }

    /// Document paths in column order, synthetic columns excluded
    pub fn document_paths(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter_map(|c| match &c.path {
                ColumnPath::Document(path) => Some(path.as_str()),
                ColumnPath::Synthetic(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_parse_recognizes_metadata() {
        assert_eq!(ColumnPath::parse("_id"), ColumnPath::Synthetic(SyntheticField::Id));
        assert_eq!(ColumnPath::parse("_index"), ColumnPath::Synthetic(SyntheticField::Index));
        assert_eq!(ColumnPath::parse("user.name"), ColumnPath::Document("user.name".into()));
    }

    #[test]
    fn test_descriptor_deserializes() {
        let column: ColumnDescriptor = serde_json::from_value(json!({
            "name": "tags",
            "path": "tags",
            "category": "nested",
            "output_type": "varchar"
        }))
        .unwrap();

        assert!(column.is_nested());
        assert_eq!(column.output_type, OutputType::Varchar);
        assert_eq!(column.path, ColumnPath::Document("tags".into()));
    }

    #[test]
    fn test_category_defaults_to_scalar() {
        let column: ColumnDescriptor = serde_json::from_value(json!({
            "name": "id",
            "path": "_id",
            "output_type": "varchar"
        }))
        .unwrap();

        assert_eq!(column.category, FieldCategory::Scalar);
        assert!(column.path.is_synthetic());
    }

    #[test]
    fn test_column_set_rejects_duplicate_paths() {
        let result = ColumnSet::new(vec![
            ColumnDescriptor::scalar("age", OutputType::Bigint),
            ColumnDescriptor::scalar("age", OutputType::Double),
        ]);

        assert!(matches!(result, Err(CatalogError::DuplicateColumnPath(p)) if p == "age"));
    }

    #[test]
    fn test_column_set_rejects_empty_list() {
        assert!(matches!(ColumnSet::new(vec![]), Err(CatalogError::EmptyColumnList)));
    }

    #[test]
    fn test_positions_and_document_paths() {
        let set = ColumnSet::new(vec![
            ColumnDescriptor::scalar("_id", OutputType::Varchar),
            ColumnDescriptor::scalar("name", OutputType::Varchar),
            ColumnDescriptor::scalar("_index", OutputType::Varchar),
            ColumnDescriptor::scalar("age", OutputType::Bigint),
        ])
        .unwrap();

        assert_eq!(set.synthetic_position(SyntheticField::Id), Some(0));
        assert_eq!(set.synthetic_position(SyntheticField::Index), Some(2));
        assert_eq!(set.document_position("age"), Some(3));
        assert_eq!(set.document_position("missing"), None);
        assert_eq!(set.document_position("_id"), None);
        assert_eq!(set.document_paths(), vec!["name", "age"]);
        assert!(!set.has_nested());
    }
}
