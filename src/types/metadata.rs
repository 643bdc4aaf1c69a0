//! Column metadata reported by the driver.

/// Driver-reported metadata for one result column.
///
/// Immutable for the lifetime of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name (or alias).
    pub name: String,
    /// MySQL field type number (`enum_field_types`).
    pub type_tag: u8,
    /// Declared column length in bytes.
    pub length: u32,
}

impl ColumnDescriptor {
    /// Create a new column descriptor.
    pub fn new(name: impl Into<String>, type_tag: u8, length: u32) -> Self {
        Self {
            name: name.into(),
            type_tag,
            length,
        }
    }
}
