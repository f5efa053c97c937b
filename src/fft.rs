//! # 二维 FFT 工具
//!
//! 基于 `rustfft` 的二维离散傅里叶变换、零频居中和频率轴。
//! 约定与 numpy 一致：正变换不归一化，逆变换除以点数。
//!
//! ## 依赖关系
//! - 被 `plot/array.rs`（傅里叶空间绘图）和 `transfer/probe.rs`（探针构建）使用

use ndarray::{Array2, Axis};
use num_complex::Complex64;
use rustfft::FftPlanner;

fn fft_axis(array: &mut Array2<Complex64>, axis: Axis, inverse: bool) {
    let n = array.len_of(axis);
    if n == 0 {
        return;
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = if inverse {
        planner.plan_fft_inverse(n)
    } else {
        planner.plan_fft_forward(n)
    };

    let mut buffer = vec![Complex64::new(0.0, 0.0); n];
    for mut lane in array.lanes_mut(axis) {
        buffer.iter_mut().zip(lane.iter()).for_each(|(b, v)| *b = *v);
        fft.process(&mut buffer);
        lane.iter_mut().zip(&buffer).for_each(|(v, b)| *v = *b);
    }
}

/// 二维正变换（不归一化）
pub fn fft2(array: &Array2<Complex64>) -> Array2<Complex64> {
    let mut out = array.to_owned();
    fft_axis(&mut out, Axis(1), false);
    fft_axis(&mut out, Axis(0), false);
    out
}

/// 二维逆变换（除以总点数）
pub fn ifft2(array: &Array2<Complex64>) -> Array2<Complex64> {
    let mut out = array.to_owned();
    fft_axis(&mut out, Axis(1), true);
    fft_axis(&mut out, Axis(0), true);
    let norm = out.len().max(1) as f64;
    out.mapv_inplace(|v| v / norm);
    out
}

/// 将零频分量移到数组中心（每个轴循环平移 n/2）
pub fn fftshift<T: Clone>(array: &Array2<T>) -> Array2<T> {
    let (rows, cols) = array.dim();
    let (hr, hc) = (rows / 2, cols / 2);
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        array[[(r + rows - hr) % rows, (c + cols - hc) % cols]].clone()
    })
}

/// FFT 采样频率（同 numpy.fft.fftfreq），单位 1/d
pub fn fftfreq(n: usize, d: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * d);
    (0..n)
        .map(|i| {
            let k = if i < n.div_ceil(2) {
                i as f64
            } else {
                i as f64 - n as f64
            };
            k * scale
        })
        .collect()
}
