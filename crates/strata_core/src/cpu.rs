mod base;
mod cmp;

use std::sync::Arc;

use crate::device::{Device, DeviceBuffer};

#[cfg(test)]
crate::layer::tests::make_tests! {
    CpuThread,
    merge_forward,
    merge_backward,
    merge_backward_accumulates,
    merge_batched_shapes,
    merge_zero_width_input,
    merge_wrong_output_width,
    merge_rejects_mismatched_prefix,
    merge_finite_differences,
}

#[derive(Debug, Default)]
pub struct CpuError;

#[derive(Debug, Default)]
pub struct CpuThread;

pub struct CpuBuffer<T> {
    buf: Vec<T>,
    device: Arc<CpuThread>,
}

impl<T: Copy + Default> DeviceBuffer<CpuThread, T> for CpuBuffer<T> {
    type BufferError = CpuError;

    fn device(&self) -> Arc<CpuThread> {
        self.device.clone()
    }

    fn new(device: Arc<CpuThread>, size: usize) -> Result<Self, CpuError> {
        Ok(Self { buf: vec![T::default(); size], device })
    }

    fn size(&self) -> usize {
        self.buf.len()
    }

    fn set_zero(&mut self) -> Result<(), CpuError> {
        for elem in &mut self.buf {
            *elem = T::default();
        }

        Ok(())
    }

    fn load_from_device(&mut self, buf: &Self, num: usize) -> Result<(), CpuError> {
        if num > self.buf.len() || num > buf.buf.len() {
            return Err(CpuError);
        }

        self.buf[..num].copy_from_slice(&buf.buf[..num]);
        Ok(())
    }

    fn load_from_slice(&mut self, buf: &[T]) -> Result<(), CpuError> {
        if buf.len() > self.buf.len() {
            return Err(CpuError);
        }

        self.buf[..buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn write_into_slice(&self, buf: &mut [T], num: usize) -> Result<(), CpuError> {
        if num > self.buf.len() || num > buf.len() {
            return Err(CpuError);
        }

        buf[..num].copy_from_slice(&self.buf[..num]);
        Ok(())
    }
}

impl Device for CpuThread {
    type BufferF32 = CpuBuffer<f32>;

    type DeviceError = CpuError;

    type IdType = ();

    fn new(_id: Self::IdType) -> Result<Self, Self::DeviceError> {
        Ok(Self)
    }

    fn synchronise(&self) -> Result<(), Self::DeviceError> {
        Ok(())
    }

    fn get_last_device_error(&self) -> Result<(), Self::DeviceError> {
        Ok(())
    }
}
