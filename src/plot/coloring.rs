//! # 复数场的域着色
//!
//! 将复数映射为颜色：相位决定色相，模决定亮度。
//!
//! ## 映射
//! - 色相 h = (arg z + π) / 2π + 0.5（HLS 转换时取模 1）
//! - 亮度 l = k^|z|，`fade_to_white` 时 l = 1 − k^|z|
//! - 饱和度固定为选项值
//!
//! 转换后对整幅输出做全局最小-最大归一化到 [0, 1]，因此结果依赖于
//! 整个数组，对子区域着色的结果与整体着色的对应部分不同。
//!
//! ## 依赖关系
//! - 被 `plot/waves.rs` 的 `plot_domain_coloring` 使用

use ndarray::{Array3, ArrayView2};
use num_complex::Complex64;
use std::f64::consts::PI;

/// `domain_coloring` 的选项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainColoringOptions {
    /// true: 模大时趋向白色；false: 模大时趋向黑色
    pub fade_to_white: bool,
    pub saturation: f64,
    /// 亮度衰减底数
    pub k: f64,
}

impl Default for DomainColoringOptions {
    fn default() -> Self {
        DomainColoringOptions {
            fade_to_white: false,
            saturation: 1.0,
            k: 0.5,
        }
    }
}

const ONE_THIRD: f64 = 1.0 / 3.0;
const ONE_SIXTH: f64 = 1.0 / 6.0;
const TWO_THIRD: f64 = 2.0 / 3.0;

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < ONE_SIXTH {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < TWO_THIRD {
        m1 + (m2 - m1) * (TWO_THIRD - hue) * 6.0
    } else {
        m1
    }
}

/// HLS → RGB（标准双六棱锥 HLS 模型，h 取模 1）
pub fn hls_to_rgb(h: f64, l: f64, s: f64) -> [f64; 3] {
    if s == 0.0 {
        return [l, l, l];
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    [
        hue_channel(m1, m2, h + ONE_THIRD),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - ONE_THIRD),
    ]
}

/// 域着色，返回 (rows, cols, 3) 的 RGB 数组
pub fn domain_coloring(z: ArrayView2<Complex64>, options: &DomainColoringOptions) -> Array3<f64> {
    let (rows, cols) = z.dim();
    let mut rgb = Array3::<f64>::zeros((rows, cols, 3));

    for ((r, c), value) in z.indexed_iter() {
        let h = (value.arg() + PI) / (2.0 * PI) + 0.5;
        let decay = options.k.powf(value.norm());
        let l = if options.fade_to_white {
            1.0 - decay
        } else {
            decay
        };
        let color = hls_to_rgb(h, l, options.saturation);
        for (channel, v) in color.into_iter().enumerate() {
            rgb[[r, c, channel]] = v;
        }
    }

    let (min, max) = rgb
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let ptp = max - min;

    if ptp > 0.0 {
        rgb.mapv_inplace(|v| (v - min) / ptp);
    } else {
        rgb.mapv_inplace(|v| v.clamp(0.0, 1.0));
    }
    rgb
}
