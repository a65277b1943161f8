use crate::{
    device::{Device, OperationError, OperationResult},
    shape::{Shape, StructureTemplate},
    tensor::DenseView,
};

use super::{Layer, LayerBuffers, LayerStructure, LayerValidationError, ShapeMap};

const INPUTS_1: &str = "inputs_1";
const INPUTS_2: &str = "inputs_2";
const DEFAULT: &str = "default";

/// Builder for a [`MergeLayer`].
#[derive(Clone, Debug, Default)]
pub struct Merge {
    name: Option<String>,
}

impl Merge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> MergeLayer {
        MergeLayer { name: self.name.unwrap_or_else(|| "Merge".to_string()) }
    }
}

/// Concatenates `inputs_1` and `inputs_2` along their last dimension.
///
/// Both inputs must agree on every other dimension. The backward pass splits
/// the output deltas at the same boundary and adds each part onto the
/// corresponding input deltas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeLayer {
    name: String,
}

impl MergeLayer {
    fn input_shape<'a>(&self, in_shapes: &'a ShapeMap, input: &str) -> Result<&'a Shape, LayerValidationError> {
        let shape = in_shapes
            .get(input)
            .ok_or_else(|| LayerValidationError::new(&self.name, format!("missing input '{input}'")))?;

        if shape.rank() == 0 {
            return Err(LayerValidationError::new(
                &self.name,
                format!("input '{input}' must have at least one dimension"),
            ));
        }

        Ok(shape)
    }
}

/// Splits `view` into rows `[0, size_1)` and `[size_1, rows)`.
fn split_rows<D: Device>(
    view: DenseView,
    size_1: usize,
) -> Result<(DenseView, DenseView), OperationError<D::DeviceError>> {
    let first = view.slice_rows(0..size_1).ok_or(OperationError::IndexOutOfBounds)?;
    let second = view.slice_rows(size_1..view.rows).ok_or(OperationError::IndexOutOfBounds)?;
    Ok((first, second))
}

impl<D: Device> Layer<D> for MergeLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn expected_inputs(&self) -> Vec<(&'static str, StructureTemplate)> {
        vec![(INPUTS_1, StructureTemplate::Any), (INPUTS_2, StructureTemplate::Any)]
    }

    fn setup(&self, in_shapes: &ShapeMap) -> Result<LayerStructure, LayerValidationError> {
        let shape_1 = self.input_shape(in_shapes, INPUTS_1)?;
        let shape_2 = self.input_shape(in_shapes, INPUTS_2)?;

        if shape_1.prefix() != shape_2.prefix() {
            return Err(LayerValidationError::new(
                &self.name,
                format!(
                    "The shapes of {INPUTS_1} and {INPUTS_2} may only differ in the last dimension but got {shape_1} and {shape_2}"
                ),
            ));
        }

        let combined_size = shape_1.last().unwrap_or(0) + shape_2.last().unwrap_or(0);

        let mut structure = LayerStructure::default();
        structure.outputs.insert(DEFAULT.to_string(), shape_1.with_last(combined_size));

        Ok(structure)
    }

    fn forward_pass(&self, buffers: &mut LayerBuffers<D>, _training_pass: bool) -> OperationResult<D::DeviceError> {
        let inputs_1 = buffers.inputs.get(INPUTS_1)?;
        let inputs_2 = buffers.inputs.get(INPUTS_2)?;
        let outputs = buffers.outputs.get_mut(DEFAULT)?;

        let view_1 = inputs_1.flatten_all_but_last();
        let view_2 = inputs_2.flatten_all_but_last();
        let (out_1, out_2) = split_rows::<D>(outputs.flatten_all_but_last(), view_1.rows)?;

        outputs.copy_or_add_view(false, out_1, inputs_1, view_1)?;
        outputs.copy_or_add_view(false, out_2, inputs_2, view_2)?;

        Ok(())
    }

    fn backward_pass(&self, buffers: &mut LayerBuffers<D>) -> OperationResult<D::DeviceError> {
        let output_deltas = buffers.output_deltas.get(DEFAULT)?;
        let size_1 = buffers.input_deltas.get(INPUTS_1)?.flatten_all_but_last().rows;
        let (out_1, out_2) = split_rows::<D>(output_deltas.flatten_all_but_last(), size_1)?;

        let input_deltas_1 = buffers.input_deltas.get_mut(INPUTS_1)?;
        let view_1 = input_deltas_1.flatten_all_but_last();
        input_deltas_1.copy_or_add_view(true, view_1, output_deltas, out_1)?;

        let input_deltas_2 = buffers.input_deltas.get_mut(INPUTS_2)?;
        let view_2 = input_deltas_2.flatten_all_but_last();
        input_deltas_2.copy_or_add_view(true, view_2, output_deltas, out_2)?;

        Ok(())
    }
}
