//! Hit-to-row projection
//!
//! A row has one slot per column, in column order. Metadata columns are
//! filled first, then the hit's values are matched by key:
//! - fields mode: keys of the projected `fields` map
//! - source mode: top-level keys of the document body only
//!
//! Keys matching no column are dropped. Values are stored as returned;
//! coercion happens when the caller reads them.

use crate::catalog::{ColumnSet, SyntheticField};
use crate::client::{ProjectionMode, RawHit};

use super::value::FieldValue;

/// One projected row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<FieldValue>,
}

impl Row {
    /// A row of `width` absent values
    pub fn absent(width: usize) -> Self {
        Self {
            values: vec![FieldValue::Absent; width],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&FieldValue> {
        self.values.get(position)
    }

    pub fn is_null(&self, position: usize) -> bool {
        self.get(position).map_or(true, FieldValue::is_absent)
    }

    fn set(&mut self, position: usize, value: FieldValue) {
        if let Some(slot) = self.values.get_mut(position) {
            *slot = value;
        }
    }
}

/// Projects hits onto a fixed column list
#[derive(Debug, Clone)]
pub struct RowProjector {
    columns: ColumnSet,
    mode: ProjectionMode,
}

impl RowProjector {
    pub fn new(columns: ColumnSet, mode: ProjectionMode) -> Self {
        Self { columns, mode }
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn project(&self, hit: RawHit) -> Row {
        let mut row = Row::absent(self.columns.len());

        if let Some(position) = self.columns.synthetic_position(SyntheticField::Id) {
            row.set(position, FieldValue::Text(hit.id));
        }
        if let Some(position) = self.columns.synthetic_position(SyntheticField::Index) {
            row.set(position, FieldValue::Text(hit.index));
        }

        let entries = match self.mode {
            ProjectionMode::Fields => hit.fields,
            ProjectionMode::Source => hit.source.unwrap_or_default(),
        };

        for (key, value) in entries {
            if let Some(position) = self.columns.document_position(&key) {
                row.set(position, FieldValue::from_json(value));
            }
        }

        row
    }
}
