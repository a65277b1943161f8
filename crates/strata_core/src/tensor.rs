pub mod rng;
mod view;

use std::sync::Arc;

pub use view::DenseView;

use crate::{
    device::{BaseOperations, Device, DeviceBuffer, OperationError},
    shape::Shape,
};

pub struct DenseTensor<D: Device> {
    pub buf: D::BufferF32,
    shape: Shape,
}

impl<D: Device> DenseTensor<D> {
    pub fn zeroed(device: Arc<D>, shape: Shape) -> Result<Self, D::DeviceError> {
        let mut buf = D::BufferF32::new(device, shape.size())?;
        buf.set_zero()?;
        Ok(Self { buf, shape })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn size(&self) -> usize {
        self.shape.size()
    }

    pub fn zero(&mut self) -> Result<(), OperationError<D::DeviceError>> {
        self.buf.set_to(self.size(), 0.0)?;
        Ok(())
    }

    pub fn load_from_slice(&mut self, values: &[f32]) -> Result<(), OperationError<D::DeviceError>> {
        if values.len() != self.size() {
            return Err(OperationError::MismatchedShapes(format!(
                "cannot load {} values into a tensor of shape {}",
                values.len(),
                self.shape
            )));
        }

        self.buf.load_from_slice(values)?;
        Ok(())
    }

    pub fn get_dense_vals(&self) -> Result<Vec<f32>, OperationError<D::DeviceError>> {
        let mut buf = vec![0.0; self.size()];
        self.buf.write_into_slice(&mut buf, self.size())?;
        Ok(buf)
    }

    pub fn seed_random(
        &mut self,
        mean: f32,
        stdev: f32,
        use_gaussian: bool,
    ) -> Result<(), OperationError<D::DeviceError>> {
        let values = rng::vec_f32(self.size(), mean, stdev, use_gaussian).ok_or_else(|| {
            OperationError::InvalidArgument(format!("cannot sample with mean {mean} and stdev {stdev}"))
        })?;

        self.load_from_slice(&values)
    }

    /// View of the whole tensor as a `last x prod(prefix)` matrix.
    pub fn flatten_all_but_last(&self) -> DenseView {
        let (rows, cols) = self.shape.flattened();
        DenseView { offset: 0, rows, cols, stride: rows }
    }

    /// Copies (or accumulates, if `add`) the block `src_view` of `src` into
    /// the block `dst_view` of `self`.
    pub fn copy_or_add_view(
        &mut self,
        add: bool,
        dst_view: DenseView,
        src: &Self,
        src_view: DenseView,
    ) -> Result<(), OperationError<D::DeviceError>> {
        if dst_view.rows != src_view.rows || dst_view.cols != src_view.cols {
            return Err(OperationError::MismatchedShapes(format!(
                "cannot copy a {} x {} view into a {} x {} view",
                src_view.rows, src_view.cols, dst_view.rows, dst_view.cols
            )));
        }

        if !dst_view.fits(self.size()) || !src_view.fits(src.size()) {
            return Err(OperationError::IndexOutOfBounds);
        }

        self.buf.copy_or_add_strided(
            add,
            dst_view.rows,
            dst_view.cols,
            dst_view.offset,
            dst_view.stride,
            &src.buf,
            src_view.offset,
            src_view.stride,
        )?;

        Ok(())
    }
}
