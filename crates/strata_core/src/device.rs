pub mod base;
mod buffer;
mod error;

use std::{fmt::Debug, sync::Arc};

pub use base::BaseOperations;
pub use buffer::DeviceBuffer;
pub use error::{OperationError, OperationResult};

use crate::{cpu::CpuThread, logger};

/// A numeric backend. Layers never touch memory directly, every read and
/// write of a layer buffer goes through the device's buffer type.
pub trait Device: Sized + 'static {
    type IdType;
    type DeviceError: Debug + Default;
    type BufferF32: DeviceBuffer<Self, f32, BufferError = Self::DeviceError>
        + BaseOperations<BaseError = Self::DeviceError>;

    fn new(id: Self::IdType) -> Result<Self, Self::DeviceError>;

    fn synchronise(&self) -> Result<(), Self::DeviceError>;

    fn get_last_device_error(&self) -> Result<(), Self::DeviceError>;

    /// Compares this device's kernels against the CPU reference.
    fn sanity_check(self: Arc<Self>) -> bool {
        println!("{}", logger::ansi("Running Sanity Checks", "34;1"));
        let set_to = CpuThread::compare_set_to(self.clone());
        let strided = CpuThread::compare_copy_or_add_strided(self);
        set_to && strided
    }
}
