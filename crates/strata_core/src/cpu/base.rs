use crate::device::BaseOperations;

use super::{CpuBuffer, CpuError};

impl BaseOperations for CpuBuffer<f32> {
    type BaseError = CpuError;

    fn set_to(&mut self, size: usize, val: f32) -> Result<(), Self::BaseError> {
        if size > self.buf.len() {
            return Err(CpuError);
        }

        for i in self.buf.iter_mut().take(size) {
            *i = val;
        }

        Ok(())
    }

    fn copy_or_add_strided(
        &mut self,
        add: bool,
        rows: usize,
        cols: usize,
        offset: usize,
        stride: usize,
        a: &Self,
        offset_a: usize,
        stride_a: usize,
    ) -> Result<(), Self::BaseError> {
        #[allow(clippy::too_many_arguments)]
        fn internal<const ADD: bool>(
            out: &mut CpuBuffer<f32>,
            rows: usize,
            cols: usize,
            offset: usize,
            stride: usize,
            a: &CpuBuffer<f32>,
            offset_a: usize,
            stride_a: usize,
        ) {
            for c in 0..cols {
                let oidx = offset + stride * c;
                let aidx = offset_a + stride_a * c;
                for r in 0..rows {
                    if ADD {
                        out.buf[oidx + r] += a.buf[aidx + r];
                    } else {
                        out.buf[oidx + r] = a.buf[aidx + r];
                    }
                }
            }
        }

        if rows == 0 || cols == 0 {
            return Ok(());
        }

        let end = |offset: usize, stride: usize| {
            stride.checked_mul(cols - 1)?.checked_add(offset)?.checked_add(rows)
        };

        match (end(offset, stride), end(offset_a, stride_a)) {
            (Some(end), Some(end_a)) if end <= self.buf.len() && end_a <= a.buf.len() => {}
            _ => return Err(CpuError),
        }

        if add {
            internal::<true>(self, rows, cols, offset, stride, a, offset_a, stride_a);
        } else {
            internal::<false>(self, rows, cols, offset, stride, a, offset_a, stride_a);
        }

        Ok(())
    }
}
