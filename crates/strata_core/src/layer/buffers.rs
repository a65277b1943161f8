use std::{collections::BTreeMap, sync::Arc};

use crate::{
    device::{Device, OperationError},
    tensor::DenseTensor,
};

use super::{validate_inputs, Layer, LayerError, LayerStructure, ShapeMap};

pub struct NamedTensors<D: Device> {
    tensors: BTreeMap<String, DenseTensor<D>>,
}

impl<D: Device> Default for NamedTensors<D> {
    fn default() -> Self {
        Self { tensors: BTreeMap::new() }
    }
}

impl<D: Device> NamedTensors<D> {
    fn zeroed(device: &Arc<D>, shapes: &ShapeMap) -> Result<Self, D::DeviceError> {
        let mut tensors = BTreeMap::new();

        for (name, shape) in shapes {
            tensors.insert(name.clone(), DenseTensor::zeroed(device.clone(), shape.clone())?);
        }

        Ok(Self { tensors })
    }

    pub fn get(&self, id: &str) -> Result<&DenseTensor<D>, OperationError<D::DeviceError>> {
        self.tensors.get(id).ok_or_else(|| OperationError::NoBufferWithID(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut DenseTensor<D>, OperationError<D::DeviceError>> {
        self.tensors.get_mut(id).ok_or_else(|| OperationError::NoBufferWithID(id.to_string()))
    }

    /// Replaces (or adds) the tensor stored under `id`, returning the previous one.
    pub fn insert(&mut self, id: impl Into<String>, tensor: DenseTensor<D>) -> Option<DenseTensor<D>> {
        self.tensors.insert(id.into(), tensor)
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DenseTensor<D>)> {
        self.tensors.iter().map(|(name, tensor)| (name.as_str(), tensor))
    }

    pub fn zero(&mut self) -> Result<(), OperationError<D::DeviceError>> {
        self.tensors.values_mut().try_for_each(DenseTensor::zero)
    }
}

/// Every buffer a single layer reads or writes during a forward and
/// backward pass.
pub struct LayerBuffers<D: Device> {
    pub inputs: NamedTensors<D>,
    pub outputs: NamedTensors<D>,
    pub parameters: NamedTensors<D>,
    pub internals: NamedTensors<D>,
    pub input_deltas: NamedTensors<D>,
    pub output_deltas: NamedTensors<D>,
    pub gradients: NamedTensors<D>,
}

impl<D: Device> LayerBuffers<D> {
    /// Validates `in_shapes`, runs [`Layer::setup`] and allocates zeroed
    /// buffers for the resulting structure.
    pub fn for_layer<L: Layer<D> + ?Sized>(
        device: Arc<D>,
        layer: &L,
        in_shapes: &ShapeMap,
    ) -> Result<(LayerStructure, Self), LayerError<D::DeviceError>> {
        validate_inputs(layer.name(), &layer.expected_inputs(), in_shapes)?;
        let structure = layer.setup(in_shapes)?;

        let alloc = |shapes: &ShapeMap| -> Result<NamedTensors<D>, OperationError<D::DeviceError>> {
            Ok(NamedTensors::zeroed(&device, shapes)?)
        };

        let buffers = Self {
            inputs: alloc(in_shapes)?,
            outputs: alloc(&structure.outputs)?,
            parameters: alloc(&structure.parameters)?,
            internals: alloc(&structure.internals)?,
            input_deltas: alloc(in_shapes)?,
            output_deltas: alloc(&structure.outputs)?,
            gradients: alloc(&structure.parameters)?,
        };

        Ok((structure, buffers))
    }
}
