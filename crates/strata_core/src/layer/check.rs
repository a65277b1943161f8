//! Numerical checks of a layer's backward pass.
use std::{collections::BTreeMap, sync::Arc};

use crate::device::{Device, OperationError};

use super::{Layer, LayerBuffers, LayerError, ShapeMap};

type CheckResult<T> = Result<BTreeMap<String, f32>, LayerError<T>>;

/// Compares the input deltas computed by `backward_pass` against central
/// finite differences of `L = sum(outputs * output_deltas)`, using random
/// inputs and output deltas.
///
/// Returns the largest absolute deviation seen for each input.
pub fn check_input_deltas<D: Device, L: Layer<D> + ?Sized>(
    device: Arc<D>,
    layer: &L,
    in_shapes: &ShapeMap,
    eps: f32,
) -> CheckResult<D::DeviceError> {
    let (structure, mut buffers) = LayerBuffers::for_layer(device, layer, in_shapes)?;
    seed_inputs_and_deltas(&mut buffers, in_shapes, &structure.outputs)?;

    layer.forward_pass(&mut buffers, true)?;
    buffers.input_deltas.zero()?;
    layer.backward_pass(&mut buffers)?;

    let mut output_deltas = Vec::new();
    for name in structure.outputs.keys() {
        output_deltas.push((name.as_str(), buffers.output_deltas.get(name)?.get_dense_vals()?));
    }

    let mut errors = BTreeMap::new();

    for name in in_shapes.keys() {
        let analytic = buffers.input_deltas.get(name)?.get_dense_vals()?;
        let mut values = buffers.inputs.get(name)?.get_dense_vals()?;
        let mut max_err = 0f32;

        for i in 0..values.len() {
            let orig = values[i];

            values[i] = orig + eps;
            buffers.inputs.get_mut(name)?.load_from_slice(&values)?;
            let plus = loss(layer, &mut buffers, &output_deltas)?;

            values[i] = orig - eps;
            buffers.inputs.get_mut(name)?.load_from_slice(&values)?;
            let minus = loss(layer, &mut buffers, &output_deltas)?;

            values[i] = orig;

            let numeric = ((plus - minus) / (2.0 * f64::from(eps))) as f32;
            max_err = max_err.max((numeric - analytic[i]).abs());
        }

        buffers.inputs.get_mut(name)?.load_from_slice(&values)?;
        errors.insert(name.clone(), max_err);
    }

    Ok(errors)
}

/// Runs `backward_pass` on top of input deltas filled with ones and checks
/// the result equals ones plus the deltas from a fresh backward pass.
///
/// Returns the largest absolute deviation seen for each input.
pub fn check_deltas_accumulate<D: Device, L: Layer<D> + ?Sized>(
    device: Arc<D>,
    layer: &L,
    in_shapes: &ShapeMap,
) -> CheckResult<D::DeviceError> {
    let (structure, mut buffers) = LayerBuffers::for_layer(device, layer, in_shapes)?;
    seed_inputs_and_deltas(&mut buffers, in_shapes, &structure.outputs)?;

    layer.forward_pass(&mut buffers, true)?;
    buffers.input_deltas.zero()?;
    layer.backward_pass(&mut buffers)?;

    let mut fresh = BTreeMap::new();
    for name in in_shapes.keys() {
        let input_deltas = buffers.input_deltas.get_mut(name)?;
        fresh.insert(name.as_str(), input_deltas.get_dense_vals()?);
        input_deltas.load_from_slice(&vec![1.0; input_deltas.size()])?;
    }

    layer.backward_pass(&mut buffers)?;

    let mut errors = BTreeMap::new();

    for (name, fresh) in fresh {
        let accumulated = buffers.input_deltas.get(name)?.get_dense_vals()?;
        let max_err = accumulated.iter().zip(fresh.iter()).map(|(&a, &f)| (a - (1.0 + f)).abs()).fold(0.0, f32::max);
        errors.insert(name.to_string(), max_err);
    }

    Ok(errors)
}

fn seed_inputs_and_deltas<D: Device>(
    buffers: &mut LayerBuffers<D>,
    in_shapes: &ShapeMap,
    out_shapes: &ShapeMap,
) -> Result<(), OperationError<D::DeviceError>> {
    for name in in_shapes.keys() {
        buffers.inputs.get_mut(name)?.seed_random(0.0, 1.0, true)?;
    }

    for name in out_shapes.keys() {
        buffers.output_deltas.get_mut(name)?.seed_random(0.0, 1.0, true)?;
    }

    Ok(())
}

fn loss<D: Device, L: Layer<D> + ?Sized>(
    layer: &L,
    buffers: &mut LayerBuffers<D>,
    output_deltas: &[(&str, Vec<f32>)],
) -> Result<f64, OperationError<D::DeviceError>> {
    layer.forward_pass(buffers, false)?;

    let mut total = 0.0;

    for (name, deltas) in output_deltas {
        let outputs = buffers.outputs.get(name)?.get_dense_vals()?;
        total += outputs.iter().zip(deltas.iter()).map(|(&o, &d)| f64::from(o) * f64::from(d)).sum::<f64>();
    }

    Ok(total)
}
