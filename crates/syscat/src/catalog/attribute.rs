//! Attribute model for discovered system objects.

use serde::{Deserialize, Serialize};

use crate::session::{ColumnMeta, DataKind};

/// A typed column of a discovered system object.
///
/// Built once from probed result-set metadata; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,

    /// Ordinal position (1-based, result order).
    pub ordinal: u32,

    /// Declared type name.
    pub type_name: String,

    /// Full type name including modifiers.
    pub full_type_name: String,

    /// Engine-specific numeric type code.
    pub type_code: i32,

    /// Engine-independent data kind.
    pub data_kind: DataKind,

    /// Numeric scale, if any.
    pub scale: Option<i32>,

    /// Numeric precision, if any.
    pub precision: Option<i32>,

    /// Maximum length (-1 for unbounded).
    pub max_length: i64,

    /// Engine-specific type modifier bitmask.
    pub type_modifiers: u64,
}

impl Attribute {
    /// System object columns are engine-maintained.
    pub fn is_auto_generated(&self) -> bool {
        true
    }

    /// System object columns have no user-facing optionality.
    pub fn is_required(&self) -> bool {
        true
    }

    /// System object columns never declare a default value.
    pub fn default_value(&self) -> Option<&str> {
        None
    }
}

impl From<&ColumnMeta> for Attribute {
    fn from(meta: &ColumnMeta) -> Self {
        Self {
            name: meta.name.clone(),
            ordinal: meta.ordinal,
            type_name: meta.type_name.clone(),
            full_type_name: meta.full_type_name.clone(),
            type_code: meta.type_code,
            data_kind: meta.data_kind,
            scale: meta.scale,
            precision: meta.precision,
            max_length: meta.max_length,
            type_modifiers: meta.type_modifiers,
        }
    }
}

/// Convert probed column metadata into attributes, one-to-one with the
/// source column order. No reordering, no filtering.
pub fn map_attributes(meta: &[ColumnMeta]) -> Vec<Attribute> {
    meta.iter().map(Attribute::from).collect()
}

/// An intrinsic column not present in declared metadata (e.g., an implicit
/// row identifier), computed by engine-specific logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PseudoAttribute {
    /// Pseudo-column name.
    pub name: String,

    /// Declared type name.
    pub type_name: String,

    /// Engine-independent data kind.
    pub data_kind: DataKind,
}
