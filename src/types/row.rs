//! Packed binary row produced by the row materializer.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::{Error, Result};

use super::layout::{ColumnSlot, RowLayout};

/// One materialized row.
///
/// The data block is exactly `layout.stride()` bytes. Columns whose cell
/// could not be converted stay zero-filled and are listed in
/// `unconverted_columns()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBuffer {
    /// Packed column bytes.
    data: Bytes,
    /// Shared layout (reference counted).
    layout: Arc<RowLayout>,
    /// Indices of columns left zero-filled after a failed cast.
    unconverted: Vec<usize>,
}

impl RowBuffer {
    /// Create a row from its packed bytes and shared layout.
    pub fn new(data: Bytes, layout: Arc<RowLayout>, unconverted: Vec<usize>) -> Self {
        debug_assert_eq!(data.len(), layout.stride());
        Self {
            data,
            layout,
            unconverted,
        }
    }

    /// Raw packed bytes of the whole row.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Row stride in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the row holds no bytes (zero columns).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Layout shared with the other rows of the result set.
    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    /// Columns that were left zero-filled because their cell failed to convert.
    pub fn unconverted_columns(&self) -> &[usize] {
        &self.unconverted
    }

    /// Check if any column failed to convert.
    pub fn is_partial(&self) -> bool {
        !self.unconverted.is_empty()
    }

    /// Bytes of the column at `index`.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.layout
            .slot(index)
            .and_then(|slot| self.data.get(slot.range()))
    }

    /// Get a 32-bit integer column.
    pub fn get_i32(&self, index: usize) -> Result<i32> {
        Ok(i32::from_ne_bytes(self.fixed(index)?))
    }

    /// Get a 64-bit integer column.
    pub fn get_i64(&self, index: usize) -> Result<i64> {
        Ok(i64::from_ne_bytes(self.fixed(index)?))
    }

    /// Get a 64-bit unsigned integer column.
    pub fn get_u64(&self, index: usize) -> Result<u64> {
        Ok(u64::from_ne_bytes(self.fixed(index)?))
    }

    /// Get a 16-bit integer column.
    pub fn get_i16(&self, index: usize) -> Result<i16> {
        Ok(i16::from_ne_bytes(self.fixed(index)?))
    }

    /// Get an 8-bit integer column.
    pub fn get_i8(&self, index: usize) -> Result<i8> {
        Ok(i8::from_ne_bytes(self.fixed(index)?))
    }

    /// Get a string column with its zero padding stripped.
    pub fn get_str(&self, index: usize) -> Result<&str> {
        let bytes = self.column(index)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        std::str::from_utf8(&bytes[..end])
            .map_err(|e| Error::type_conversion(format!("column {}: {}", index, e)))
    }

    fn column(&self, index: usize) -> Result<&[u8]> {
        self.get(index).ok_or(Error::ColumnIndexOutOfBounds {
            index,
            count: self.layout.len(),
        })
    }

    fn fixed<const N: usize>(&self, index: usize) -> Result<[u8; N]> {
        let bytes = self.column(index)?;
        bytes.try_into().map_err(|_| {
            Error::type_conversion(format!(
                "column {} is {} bytes wide, expected {}",
                index,
                bytes.len(),
                N
            ))
        })
    }
}

impl<'a> IntoIterator for &'a RowBuffer {
    type Item = &'a [u8];
    type IntoIter = ColumnIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        ColumnIter {
            data: &self.data,
            slots: self.layout.slots().iter(),
        }
    }
}

/// Iterator over the column byte ranges of a row.
pub struct ColumnIter<'a> {
    data: &'a [u8],
    slots: std::slice::Iter<'a, ColumnSlot>,
}

impl<'a> Iterator for ColumnIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.slots.next()?;
        self.data.get(slot.range())
    }
}
