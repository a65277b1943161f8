use std::sync::Arc;

use crate::{
    device::{Device, OperationError},
    layer::{check, Layer, LayerBuffers, LayerError, ShapeMap},
    shape::Shape,
    tensor::DenseTensor,
    Merge, MergeLayer,
};

macro_rules! make_tests {
    ($dev:expr $(, $id:ident)+ $(,)?) => {
        $(
            #[test]
            fn $id() {
                $crate::layer::tests::$id($dev);
            }
        )+
    };
}

pub(crate) use make_tests;

fn in_shapes(shape_1: &[usize], shape_2: &[usize]) -> ShapeMap {
    let mut shapes = ShapeMap::new();
    shapes.insert("inputs_1".to_string(), Shape::from(shape_1));
    shapes.insert("inputs_2".to_string(), Shape::from(shape_2));
    shapes
}

fn merge_buffers<D: Device>(device: D, shape_1: &[usize], shape_2: &[usize]) -> (MergeLayer, LayerBuffers<D>) {
    let layer = Merge::new().build();
    let (_, buffers) = LayerBuffers::for_layer(Arc::new(device), &layer, &in_shapes(shape_1, shape_2)).unwrap();
    (layer, buffers)
}

fn load<D: Device>(buffers: &mut LayerBuffers<D>, inputs_1: &[f32], inputs_2: &[f32]) {
    buffers.inputs.get_mut("inputs_1").unwrap().load_from_slice(inputs_1).unwrap();
    buffers.inputs.get_mut("inputs_2").unwrap().load_from_slice(inputs_2).unwrap();
}

pub fn merge_forward<D: Device>(device: D) {
    let (layer, mut buffers) = merge_buffers(device, &[2, 2], &[2, 1]);
    load(&mut buffers, &[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0]);

    layer.forward_pass(&mut buffers, true).unwrap();

    let output = buffers.outputs.get("default").unwrap();
    assert_eq!(output.shape(), &Shape::from([2, 3]));
    assert_eq!(output.get_dense_vals().unwrap(), [1.0, 2.0, 5.0, 3.0, 4.0, 6.0]);

    // inference and training passes agree
    layer.forward_pass(&mut buffers, false).unwrap();
    let output = buffers.outputs.get("default").unwrap();
    assert_eq!(output.get_dense_vals().unwrap(), [1.0, 2.0, 5.0, 3.0, 4.0, 6.0]);
}

pub fn merge_backward<D: Device>(device: D) {
    let (layer, mut buffers) = merge_buffers(device, &[2, 2], &[2, 1]);
    load(&mut buffers, &[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0]);
    layer.forward_pass(&mut buffers, true).unwrap();

    buffers.output_deltas.get_mut("default").unwrap().load_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    layer.backward_pass(&mut buffers).unwrap();

    let deltas_1 = buffers.input_deltas.get("inputs_1").unwrap().get_dense_vals().unwrap();
    let deltas_2 = buffers.input_deltas.get("inputs_2").unwrap().get_dense_vals().unwrap();
    assert_eq!(deltas_1, [1.0, 2.0, 4.0, 5.0]);
    assert_eq!(deltas_2, [3.0, 6.0]);
}

pub fn merge_backward_accumulates<D: Device>(device: D) {
    let (layer, mut buffers) = merge_buffers(device, &[2, 2], &[2, 1]);
    load(&mut buffers, &[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0]);
    layer.forward_pass(&mut buffers, true).unwrap();

    buffers.output_deltas.get_mut("default").unwrap().load_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    buffers.input_deltas.get_mut("inputs_1").unwrap().load_from_slice(&[10.0; 4]).unwrap();
    buffers.input_deltas.get_mut("inputs_2").unwrap().load_from_slice(&[1.0; 2]).unwrap();

    layer.backward_pass(&mut buffers).unwrap();
    layer.backward_pass(&mut buffers).unwrap();

    let deltas_1 = buffers.input_deltas.get("inputs_1").unwrap().get_dense_vals().unwrap();
    let deltas_2 = buffers.input_deltas.get("inputs_2").unwrap().get_dense_vals().unwrap();
    assert_eq!(deltas_1, [12.0, 14.0, 18.0, 20.0]);
    assert_eq!(deltas_2, [7.0, 13.0]);
}

pub fn merge_batched_shapes<D: Device>(device: D) {
    let (layer, mut buffers) = merge_buffers(device, &[2, 3, 2], &[2, 3, 4]);
    buffers.inputs.get_mut("inputs_1").unwrap().seed_random(0.0, 1.0, true).unwrap();
    buffers.inputs.get_mut("inputs_2").unwrap().seed_random(0.0, 1.0, true).unwrap();

    layer.forward_pass(&mut buffers, true).unwrap();

    let inputs_1 = buffers.inputs.get("inputs_1").unwrap().get_dense_vals().unwrap();
    let inputs_2 = buffers.inputs.get("inputs_2").unwrap().get_dense_vals().unwrap();
    let output = buffers.outputs.get("default").unwrap();
    assert_eq!(output.shape(), &Shape::from([2, 3, 6]));

    let output = output.get_dense_vals().unwrap();
    for sample in 0..6 {
        assert_eq!(output[sample * 6..sample * 6 + 2], inputs_1[sample * 2..sample * 2 + 2]);
        assert_eq!(output[sample * 6 + 2..sample * 6 + 6], inputs_2[sample * 4..sample * 4 + 4]);
    }
}

pub fn merge_zero_width_input<D: Device>(device: D) {
    let (layer, mut buffers) = merge_buffers(device, &[3, 0], &[3, 2]);
    load(&mut buffers, &[], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    layer.forward_pass(&mut buffers, true).unwrap();
    let output = buffers.outputs.get("default").unwrap();
    assert_eq!(output.shape(), &Shape::from([3, 2]));
    assert_eq!(output.get_dense_vals().unwrap(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    buffers.output_deltas.get_mut("default").unwrap().load_from_slice(&[6.0, 5.0, 4.0, 3.0, 2.0, 1.0]).unwrap();
    layer.backward_pass(&mut buffers).unwrap();

    let deltas_2 = buffers.input_deltas.get("inputs_2").unwrap().get_dense_vals().unwrap();
    assert_eq!(deltas_2, [6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
    assert!(buffers.input_deltas.get("inputs_1").unwrap().get_dense_vals().unwrap().is_empty());
}

pub fn merge_wrong_output_width<D: Device>(device: D) {
    let device = Arc::new(device);
    let layer = Merge::new().build();
    let (_, mut buffers) = LayerBuffers::for_layer(device.clone(), &layer, &in_shapes(&[2, 2], &[2, 1])).unwrap();
    load(&mut buffers, &[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0]);

    let too_wide = DenseTensor::zeroed(device.clone(), Shape::from([2, 4])).unwrap();
    buffers.outputs.insert("default", too_wide);
    let res = layer.forward_pass(&mut buffers, true);
    assert!(matches!(res, Err(OperationError::MismatchedShapes(_))));

    let too_narrow = DenseTensor::zeroed(device, Shape::from([2, 1])).unwrap();
    buffers.output_deltas.insert("default", too_narrow);
    let res = layer.backward_pass(&mut buffers);
    assert!(matches!(res, Err(OperationError::IndexOutOfBounds)));

    let deltas_1 = buffers.input_deltas.get("inputs_1").unwrap().get_dense_vals().unwrap();
    assert_eq!(deltas_1, [0.0; 4]);
}

pub fn merge_rejects_mismatched_prefix<D: Device>(device: D) {
    let layer = Merge::new().with_name("merge").build();
    let res = LayerBuffers::for_layer(Arc::new(device), &layer, &in_shapes(&[2, 3, 4], &[2, 4, 4]));

    let Err(LayerError::Validation(err)) = res else {
        panic!("mismatched prefixes must fail validation");
    };

    assert_eq!(err.layer, "merge");
    assert!(err.message.starts_with("The shapes of inputs_1 and inputs_2 may only differ in the last dimension"));
}

pub fn merge_finite_differences<D: Device>(device: D) {
    let device = Arc::new(device);
    let layer = Merge::new().build();
    let shapes = in_shapes(&[3, 2, 4], &[3, 2, 5]);

    let errors = check::check_input_deltas(device.clone(), &layer, &shapes, 1e-2).unwrap();
    assert_eq!(errors.len(), 2);
    for (name, err) in errors {
        assert!(err < 1e-2, "{name}: finite difference error {err}");
    }

    let errors = check::check_deltas_accumulate(device, &layer, &shapes).unwrap();
    for (name, err) in errors {
        assert!(err < 1e-5, "{name}: accumulated deltas off by {err}");
    }
}
