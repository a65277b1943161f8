/// Reference CPU implementation of the `Device` API.
pub mod cpu;
/// Contains the `Device`, `DeviceBuffer` and `BaseOperations` APIs.
pub mod device;
/// Contains the `Layer` trait, per-layer buffers and the provided layers.
pub mod layer;
/// Coloured terminal reporting.
pub mod logger;
pub mod shape;
/// Contains `DenseTensor` and strided views into it.
pub mod tensor;

pub use layer::merge::{Merge, MergeLayer};
