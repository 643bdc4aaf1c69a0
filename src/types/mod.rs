//! Column metadata, casters and packed row types.

mod caster;
mod field_type;
mod layout;
mod metadata;
mod payload;
mod row;

pub use caster::{resolve_columns, FieldCaster};
pub use field_type::FieldType;
pub use layout::{ColumnSlot, RowLayout};
pub use metadata::ColumnDescriptor;
pub use payload::{Outcome, ResultPayload, ResultStatus};
pub use row::{ColumnIter, RowBuffer};
