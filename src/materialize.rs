//! Row materialization: text result sets to packed binary rows.
//!
//! The materializer computes the row layout from the column casters, then
//! for every fetched row allocates a zero-filled block of `stride` bytes and
//! casts each cell into its column slot.
//!
//! A cell that fails to convert leaves its slot zero-filled; the row is
//! still stored and records the column in `RowBuffer::unconverted_columns`.
//! Allocation failure and a row count that differs from the driver's count
//! fail the whole result set.

use std::sync::Arc;

use bytes::Bytes;

use crate::driver::ResultSet;
use crate::error::{Error, Result};
use crate::types::{FieldCaster, RowBuffer, RowLayout};

/// Materialize every remaining row of `result`.
///
/// `casters` must hold one caster per result column, in column order.
pub fn materialize<R: ResultSet>(
    result: &mut R,
    casters: &[FieldCaster],
) -> Result<Vec<RowBuffer>> {
    let layout = Arc::new(RowLayout::new(casters));
    materialize_with_layout(result, casters, &layout)
}

/// Materialize rows against a layout computed from the same casters.
pub(crate) fn materialize_with_layout<R: ResultSet>(
    result: &mut R,
    casters: &[FieldCaster],
    layout: &Arc<RowLayout>,
) -> Result<Vec<RowBuffer>> {
    let stride = layout.stride();

    let mut rows = Vec::new();
    while let Some(cells) = result.fetch_row() {
        let mut block = alloc_row(stride)?;
        let mut unconverted = Vec::new();

        for (index, (caster, slot)) in casters.iter().zip(layout.slots()).enumerate() {
            let dest = block
                .get_mut(slot.range())
                .ok_or_else(|| Error::buffer_too_small(slot.offset + slot.width, stride))?;
            let text = cells.get(index).and_then(|cell| cell.as_deref());

            if let Err(e) = caster.cast(text, dest) {
                tracing::warn!(
                    row = rows.len(),
                    column = index,
                    error = %e,
                    "cell not converted, leaving it zero-filled"
                );
                dest.fill(0);
                unconverted.push(index);
            }
        }

        rows.push(RowBuffer::new(Bytes::from(block), Arc::clone(layout), unconverted));
    }

    let stored = rows.len() as u64;
    let reported = result.num_rows();
    if stored != reported {
        return Err(Error::RowCountMismatch { stored, reported });
    }

    tracing::debug!(rows = stored, stride, "result set materialized");
    Ok(rows)
}

/// Allocate a zero-filled row block, reporting allocation failure as an error.
fn alloc_row(stride: usize) -> Result<Vec<u8>> {
    let mut block = Vec::new();
    block
        .try_reserve_exact(stride)
        .map_err(|_| Error::Allocation { size: stride })?;
    block.resize(stride, 0);
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::constants::*;
    use crate::driver::memory::MemoryResultSet;
    use crate::driver::TextRow;
    use crate::types::{resolve_columns, ColumnDescriptor};

    fn text_row(cells: &[Option<&str>]) -> TextRow {
        cells
            .iter()
            .map(|c| c.map(|s| Bytes::copy_from_slice(s.as_bytes())))
            .collect()
    }

    fn long_and_string() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("id", MYSQL_TYPE_LONG, 11),
            ColumnDescriptor::new("name", MYSQL_TYPE_STRING, 8),
        ]
    }

    #[test]
    fn test_two_column_scenario() {
        let columns = long_and_string();
        let casters = resolve_columns(&columns).unwrap();
        let mut result = MemoryResultSet::new(
            columns,
            vec![
                text_row(&[Some("42"), Some("hello")]),
                text_row(&[Some("7"), Some("world!!")]),
            ],
        );

        let rows = materialize(&mut result, &casters).unwrap();
        assert_eq!(rows.len(), 2);

        let mut first = 42u32.to_ne_bytes().to_vec();
        first.extend_from_slice(b"hello\0\0\0");
        assert_eq!(rows[0].as_bytes(), &first[..]);

        let mut second = 7u32.to_ne_bytes().to_vec();
        second.extend_from_slice(b"world!!\0");
        assert_eq!(rows[1].as_bytes(), &second[..]);

        assert!(rows.iter().all(|r| r.len() == 12));
    }

    #[test]
    fn test_bad_cell_is_zero_filled() {
        let columns = vec![
            ColumnDescriptor::new("a", MYSQL_TYPE_LONG, 11),
            ColumnDescriptor::new("b", MYSQL_TYPE_VAR_STRING, 4),
            ColumnDescriptor::new("c", MYSQL_TYPE_TINY, 4),
        ];
        let casters = resolve_columns(&columns).unwrap();
        let mut result = MemoryResultSet::new(
            columns,
            vec![text_row(&[None, Some("too long"), Some("5")])],
        );

        let rows = materialize(&mut result, &casters).unwrap();
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        assert_eq!(row.get(0), Some(&[0u8; 4][..]));
        assert_eq!(row.get(1), Some(&[0u8; 4][..]));
        assert_eq!(row.get_i8(2).unwrap(), 5);
        assert_eq!(row.unconverted_columns(), &[0, 1]);
        assert!(row.is_partial());
    }

    #[test]
    fn test_short_row_treats_missing_cells_as_null() {
        let columns = long_and_string();
        let casters = resolve_columns(&columns).unwrap();
        let mut result = MemoryResultSet::new(columns, vec![text_row(&[Some("3")])]);

        let rows = materialize(&mut result, &casters).unwrap();
        assert_eq!(rows[0].get_i32(0).unwrap(), 3);
        assert_eq!(rows[0].unconverted_columns(), &[1]);
    }

    #[test]
    fn test_zero_columns() {
        let mut result = MemoryResultSet::new(vec![], vec![vec![], vec![]]);

        let rows = materialize(&mut result, &[]).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(RowBuffer::is_empty));
    }

    #[test]
    fn test_zero_rows() {
        let columns = long_and_string();
        let casters = resolve_columns(&columns).unwrap();
        let mut result = MemoryResultSet::new(columns, vec![]);

        assert!(materialize(&mut result, &casters).unwrap().is_empty());
    }

    #[test]
    fn test_alloc_row_reports_failure() {
        match alloc_row(usize::MAX) {
            Err(Error::Allocation { size }) => assert_eq!(size, usize::MAX),
            Ok(block) => panic!("Expected Allocation error, got {} bytes", block.len()),
            Err(e) => panic!("Expected Allocation error, got {:?}", e),
        }
        assert_eq!(alloc_row(12).unwrap(), vec![0u8; 12]);
    }

    #[test]
    fn test_allocation_failure_fails_whole_result() {
        let columns = vec![ColumnDescriptor::new("blob", MYSQL_TYPE_STRING, 8)];
        let casters = resolve_columns(&columns).unwrap();
        let slots = RowLayout::new(&casters).slots().to_vec();
        let layout = Arc::new(RowLayout::from_parts(slots, usize::MAX));
        let mut result = MemoryResultSet::new(
            columns,
            vec![text_row(&[Some("a")]), text_row(&[Some("b")])],
        );

        match materialize_with_layout(&mut result, &casters, &layout) {
            Err(Error::Allocation { size }) => assert_eq!(size, usize::MAX),
            Ok(rows) => panic!("Expected Allocation error, got {} rows", rows.len()),
            Err(e) => panic!("Expected Allocation error, got {:?}", e),
        }
    }

    #[test]
    fn test_row_count_mismatch() {
        let columns = long_and_string();
        let casters = resolve_columns(&columns).unwrap();
        let mut result = MismatchedResultSet {
            inner: MemoryResultSet::new(columns, vec![text_row(&[Some("1"), Some("a")])]),
            reported: 3,
        };

        match materialize(&mut result, &casters) {
            Err(Error::RowCountMismatch { stored, reported }) => {
                assert_eq!(stored, 1);
                assert_eq!(reported, 3);
            }
            other => panic!("Expected RowCountMismatch, got {:?}", other),
        }
    }

    struct MismatchedResultSet {
        inner: MemoryResultSet,
        reported: u64,
    }

    impl ResultSet for MismatchedResultSet {
        fn columns(&self) -> &[ColumnDescriptor] {
            self.inner.columns()
        }

        fn num_rows(&self) -> u64 {
            self.reported
        }

        fn fetch_row(&mut self) -> Option<TextRow> {
            self.inner.fetch_row()
        }
    }
}
