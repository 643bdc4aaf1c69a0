//! Packed row layout shared by all rows of a result set.

use std::ops::Range;

use super::caster::FieldCaster;

/// Location of one column inside a packed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSlot {
    /// Byte offset from the start of the row.
    pub offset: usize,
    /// Byte width of the column.
    pub width: usize,
}

impl ColumnSlot {
    /// Byte range of this column inside a row.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.width
    }
}

/// Column offsets and total stride of a packed row.
///
/// Offsets are the prefix sums of the caster widths in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    slots: Vec<ColumnSlot>,
    stride: usize,
}

impl RowLayout {
    /// Compute the layout for a list of casters.
    pub fn new(casters: &[FieldCaster]) -> Self {
        let mut slots = Vec::with_capacity(casters.len());
        let mut offset = 0;
        for caster in casters {
            let width = caster.output_width();
            slots.push(ColumnSlot { offset, width });
            offset += width;
        }
        Self {
            slots,
            stride: offset,
        }
    }

    /// Build a layout from precomputed slots and stride.
    #[cfg(test)]
    pub(crate) fn from_parts(slots: Vec<ColumnSlot>, stride: usize) -> Self {
        Self { slots, stride }
    }

    /// Total byte width of one row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Slot of the column at `index`.
    pub fn slot(&self, index: usize) -> Option<ColumnSlot> {
        self.slots.get(index).copied()
    }

    /// All slots in column order.
    pub fn slots(&self) -> &[ColumnSlot] {
        &self.slots
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the layout has no columns.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_sum_offsets() {
        let layout = RowLayout::new(&[
            FieldCaster::Long,
            FieldCaster::String { declared_len: 8 },
            FieldCaster::Tiny,
            FieldCaster::LongLong,
        ]);

        assert_eq!(layout.stride(), 21);
        let offsets: Vec<usize> = layout.slots().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 4, 12, 13]);
        assert_eq!(layout.slot(1).unwrap().range(), 4..12);
        assert_eq!(layout.slot(4), None);
    }

    #[test]
    fn test_empty_layout() {
        let layout = RowLayout::new(&[]);
        assert_eq!(layout.stride(), 0);
        assert!(layout.is_empty());
    }
}
