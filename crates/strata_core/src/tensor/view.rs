use std::ops::Range;

/// A strided, column-major `rows x cols` window into a tensor buffer.
///
/// `rows` runs along the trailing (contiguous) dimension, `cols` along the
/// flattened leading dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DenseView {
    pub offset: usize,
    pub rows: usize,
    pub cols: usize,
    pub stride: usize,
}

impl DenseView {
    /// Restricts the view to rows `range`, i.e. `x[:, range]` on the flattened tensor.
    pub fn slice_rows(self, range: Range<usize>) -> Option<Self> {
        if range.start > range.end || range.end > self.rows {
            return None;
        }

        Some(Self { offset: self.offset.checked_add(range.start)?, rows: range.end - range.start, ..self })
    }

    /// Whether every element of the view lies in a buffer of `size` elements.
    pub fn fits(&self, size: usize) -> bool {
        if self.rows == 0 || self.cols == 0 {
            return true;
        }

        let end = self
            .stride
            .checked_mul(self.cols - 1)
            .and_then(|x| x.checked_add(self.offset))
            .and_then(|x| x.checked_add(self.rows));

        end.is_some_and(|end| end <= size)
    }
}
