mod buffers;
pub mod check;
mod error;
pub mod merge;
#[cfg(test)]
pub(crate) mod tests;

use std::collections::BTreeMap;

pub use buffers::{LayerBuffers, NamedTensors};
pub use error::{LayerError, LayerValidationError};

use crate::{
    device::{Device, OperationResult},
    shape::{Shape, StructureTemplate},
};

pub type ShapeMap = BTreeMap<String, Shape>;

/// Shapes of every buffer a layer owns, as returned by [`Layer::setup`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerStructure {
    pub outputs: ShapeMap,
    pub parameters: ShapeMap,
    pub internals: ShapeMap,
}

impl LayerStructure {
    pub fn num_parameters(&self) -> usize {
        self.parameters.values().map(Shape::size).sum()
    }
}

pub trait Layer<D: Device> {
    fn name(&self) -> &str;

    fn expected_inputs(&self) -> Vec<(&'static str, StructureTemplate)>;

    /// Infers output, parameter and internal shapes from the input shapes.
    ///
    /// Inputs have already been checked against [`Layer::expected_inputs`].
    fn setup(&self, in_shapes: &ShapeMap) -> Result<LayerStructure, LayerValidationError>;

    fn forward_pass(&self, buffers: &mut LayerBuffers<D>, training_pass: bool) -> OperationResult<D::DeviceError>;

    /// Must accumulate into `input_deltas` and `gradients`, never overwrite them.
    fn backward_pass(&self, buffers: &mut LayerBuffers<D>) -> OperationResult<D::DeviceError>;
}

/// Checks `in_shapes` against the named templates a layer expects.
pub fn validate_inputs(
    name: &str,
    expected: &[(&'static str, StructureTemplate)],
    in_shapes: &ShapeMap,
) -> Result<(), LayerValidationError> {
    for (input, template) in expected {
        let Some(shape) = in_shapes.get(*input) else {
            return Err(LayerValidationError::new(name, format!("missing input '{input}'")));
        };

        if !template.matches(shape) {
            return Err(LayerValidationError::new(
                name,
                format!("input '{input}' has shape {shape} which does not match {template}"),
            ));
        }
    }

    if let Some(input) = in_shapes.keys().find(|key| !expected.iter().any(|(input, _)| *input == key.as_str())) {
        return Err(LayerValidationError::new(name, format!("unexpected input '{input}'")));
    }

    Ok(())
}
