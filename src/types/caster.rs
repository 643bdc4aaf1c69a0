//! Per-column casters from text cells to fixed-width binary.
//!
//! One `FieldCaster` is resolved per column when a result set is stored and
//! reused for every row. Each caster has a constant output width and writes
//! exactly that many bytes into the slot it is given.
//!
//! | MySQL type | Width | Rule |
//! |------------|-------|------|
//! | LONG | 4 | `atoi` |
//! | LONGLONG | 8 | unsigned stream extraction |
//! | SHORT | 2 | `atoi`, truncated |
//! | TINY | 1 | `atoi`, truncated |
//! | STRING / VAR_STRING | declared length | raw copy, zero padded |

use crate::decode::{parse_decimal, parse_unsigned_stream};
use crate::error::{Error, Result};

use super::field_type::FieldType;
use super::metadata::ColumnDescriptor;

/// Conversion strategy for one result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCaster {
    /// 32-bit integer (MySQL LONG / INT).
    Long,
    /// 64-bit integer (MySQL LONGLONG / BIGINT).
    LongLong,
    /// 16-bit integer (MySQL SHORT / SMALLINT).
    Short,
    /// 8-bit integer (MySQL TINY / TINYINT).
    Tiny,
    /// Fixed-length string (MySQL STRING / CHAR).
    String { declared_len: u32 },
    /// Variable-length string (MySQL VAR_STRING / VARCHAR).
    VarString { declared_len: u32 },
}

impl FieldCaster {
    /// Resolve the caster for a column.
    ///
    /// Any type outside the supported set returns `Error::UnsupportedType`;
    /// the caller must abort the whole result set since the row stride
    /// cannot be computed without every width.
    pub fn resolve(column: &ColumnDescriptor) -> Result<Self> {
        let field_type = match FieldType::from_raw(column.type_tag) {
            Ok(field_type) => field_type,
            Err(e) => {
                tracing::warn!(
                    column = %column.name,
                    type_num = column.type_tag,
                    "unknown field type"
                );
                return Err(e);
            }
        };

        let caster = match field_type {
            FieldType::Long => FieldCaster::Long,
            FieldType::LongLong => FieldCaster::LongLong,
            FieldType::Short => FieldCaster::Short,
            FieldType::Tiny => FieldCaster::Tiny,
            FieldType::String => FieldCaster::String {
                declared_len: column.length,
            },
            FieldType::VarString => FieldCaster::VarString {
                declared_len: column.length,
            },
            other => {
                tracing::warn!(
                    column = %column.name,
                    field_type = %other,
                    "unsupported field type"
                );
                return Err(Error::UnsupportedType {
                    type_num: column.type_tag,
                });
            }
        };
        Ok(caster)
    }

    /// Byte width of the converted value.
    pub fn output_width(&self) -> usize {
        match self {
            FieldCaster::Long => std::mem::size_of::<u32>(),
            FieldCaster::LongLong => std::mem::size_of::<u64>(),
            FieldCaster::Short => std::mem::size_of::<u16>(),
            FieldCaster::Tiny => std::mem::size_of::<u8>(),
            FieldCaster::String { declared_len } | FieldCaster::VarString { declared_len } => {
                *declared_len as usize
            }
        }
    }

    /// Convert one text cell into `dest`.
    ///
    /// `dest` must be exactly `output_width()` bytes. A NULL cell or a string
    /// longer than the declared length fails without touching `dest`.
    pub fn cast(&self, text: Option<&[u8]>, dest: &mut [u8]) -> Result<()> {
        let width = self.output_width();
        if dest.len() != width {
            return Err(Error::buffer_too_small(width, dest.len()));
        }

        let text = text.ok_or_else(|| Error::type_conversion("NULL value"))?;

        match self {
            FieldCaster::Long => {
                dest.copy_from_slice(&(parse_decimal(text) as u32).to_ne_bytes());
            }
            FieldCaster::LongLong => {
                dest.copy_from_slice(&parse_unsigned_stream(text).to_ne_bytes());
            }
            FieldCaster::Short => {
                dest.copy_from_slice(&(parse_decimal(text) as u16).to_ne_bytes());
            }
            FieldCaster::Tiny => {
                dest.copy_from_slice(&(parse_decimal(text) as u8).to_ne_bytes());
            }
            FieldCaster::String { .. } | FieldCaster::VarString { .. } => {
                if text.len() > width {
                    return Err(Error::type_conversion(format!(
                        "{} bytes exceed declared length {}",
                        text.len(),
                        width
                    )));
                }
                dest[..text.len()].copy_from_slice(text);
                dest[text.len()..].fill(0);
            }
        }
        Ok(())
    }
}

/// Resolve one caster per column, in column order.
///
/// Fails on the first unsupported column.
pub fn resolve_columns(columns: &[ColumnDescriptor]) -> Result<Vec<FieldCaster>> {
    columns.iter().map(FieldCaster::resolve).collect()
}
