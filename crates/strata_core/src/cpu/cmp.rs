use std::sync::Arc;

use crate::{
    device::{BaseOperations, Device, DeviceBuffer},
    logger::display_passed,
    tensor::rng,
};

use super::{CpuBuffer, CpuThread};

impl CpuThread {
    pub fn compare_set_to<D: Device>(device: Arc<D>) -> bool {
        let mut passed = true;

        for (size, val) in [(1, 2.5), (1023, -1.0), (1027, 0.0)] {
            print!("set_to size={size} val={val}... ");
            passed &= display_passed(set_to_equal(device.clone(), size, val));
        }

        passed
    }

    pub fn compare_copy_or_add_strided<D: Device>(device: Arc<D>) -> bool {
        let mut passed = true;

        for add in [false, true] {
            for rows in [1, 7, 64] {
                for cols in [1023, 1027] {
                    print!("copy_or_add_strided add={add} rows={rows} cols={cols}... ");
                    passed &= display_passed(copy_strided_equal(device.clone(), add, rows, cols));
                }
            }
        }

        passed
    }
}

fn set_to_equal<D: Device>(device: Arc<D>, size: usize, val: f32) -> bool {
    let cpu = Arc::new(CpuThread);
    let Some(a) = rng::vec_f32(size + 3, 1.0, 0.5, false) else {
        return false;
    };

    let (Some(mut acpu), Some(mut adev)) = (load(cpu, &a), load(device, &a)) else {
        return false;
    };

    if acpu.set_to(size, val).is_err() || adev.set_to(size, val).is_err() {
        return false;
    }

    approx_equal::<D>(&acpu, &adev, 0.0001).is_none()
}

fn copy_strided_equal<D: Device>(device: Arc<D>, add: bool, rows: usize, cols: usize) -> bool {
    let cpu = Arc::new(CpuThread);
    let (Some(a), Some(c)) = (rng::vec_f32(2 * rows * cols, 1.0, 0.5, false), rng::vec_f32(rows * cols, 1.0, 0.5, false))
    else {
        return false;
    };

    let (Some(acpu), Some(adev)) = (load(cpu.clone(), &a), load(device.clone(), &a)) else {
        return false;
    };

    let (Some(mut ccpu), Some(mut cdev)) = (load(cpu, &c), load(device, &c)) else {
        return false;
    };

    if ccpu.copy_or_add_strided(add, rows, cols, 0, rows, &acpu, rows, 2 * rows).is_err()
        || cdev.copy_or_add_strided(add, rows, cols, 0, rows, &adev, rows, 2 * rows).is_err()
    {
        return false;
    }

    approx_equal::<D>(&ccpu, &cdev, 0.001).is_none()
}

fn approx_equal<D: Device>(a: &CpuBuffer<f32>, b: &D::BufferF32, err: f32) -> Option<usize> {
    let (Some(a), Some(b)) = (write::<CpuThread>(a), write::<D>(b)) else {
        return Some(usize::MAX);
    };

    if a.len() != b.len() {
        return Some(usize::MAX);
    }

    for (i, (&a, &b)) in a.iter().zip(b.iter()).enumerate() {
        if (a - b).abs() > err {
            print!("a={a} b={b} err={} ", (a - b).abs());
            return Some(i);
        }
    }

    None
}

fn load<D: Device>(device: Arc<D>, a: &[f32]) -> Option<D::BufferF32> {
    let mut buf = D::BufferF32::new(device, a.len()).ok()?;
    buf.load_from_slice(a).ok()?;
    Some(buf)
}

fn write<D: Device>(a: &D::BufferF32) -> Option<Vec<f32>> {
    let mut buf = vec![0.0; a.size()];
    a.write_into_slice(&mut buf, a.size()).ok()?;
    Some(buf)
}
