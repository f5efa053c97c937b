//! # CTF 曲线图
//!
//! 沿空间频率 k 绘制弱相位 CTF 及其各包络分量。
//!
//! ## 曲线规则
//! - `CTF`: 始终绘制
//! - `Aperture`: 光阑半角有限时
//! - `Temporal envelope` / `Spatial envelope` / `Gaussian envelope`: 对应展宽 > 0 时
//! - `Product envelope`: 包络乘积不全为 1 时
//!
//! ## 依赖关系
//! - 被 `commands/ctf.rs` 调用
//! - 使用 `transfer/ctf.rs` 计算各分量

use crate::error::{EmPlotError, Result};
use crate::plot::axes::Axes;
use crate::plot::linspace;
use crate::transfer::{Ctf, CtfComponents};

/// `plot_ctf` 的选项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CtfPlotOptions {
    /// 方位角 (rad)
    pub phi: f64,
    /// 采样点数
    pub n: usize,
}

impl Default for CtfPlotOptions {
    fn default() -> Self {
        CtfPlotOptions { phi: 0.0, n: 1000 }
    }
}

/// numpy.allclose(values, 1.0) 的默认容差
fn all_close_to_one(values: &[f64]) -> bool {
    values.iter().all(|v| (v - 1.0).abs() <= 1e-8 + 1e-5)
}

/// 绘制 CTF 与包络曲线
pub fn plot_ctf(ax: &mut Axes, ctf: &Ctf, max_k: f64, options: &CtfPlotOptions) -> Result<()> {
    if options.n == 0 {
        return Err(EmPlotError::InvalidArgument(
            "at least 1 sampling point is needed".to_string(),
        ));
    }
    if !(max_k >= 0.0) || !max_k.is_finite() {
        return Err(EmPlotError::InvalidArgument(format!(
            "max_k must be finite and non-negative, got {}",
            max_k
        )));
    }

    let wavelength = ctf.wavelength();
    let k = linspace(0.0, max_k, options.n);
    let components: Vec<CtfComponents> = k
        .iter()
        .map(|&k| ctf.components(k * wavelength, options.phi))
        .collect();

    let series = |f: fn(&CtfComponents) -> f64| components.iter().map(f).collect::<Vec<f64>>();

    ax.plot(k.clone(), series(CtfComponents::weak_phase))
        .label("CTF");

    if ctf.semiangle_cutoff.is_finite() {
        ax.plot(k.clone(), series(|c| c.aperture)).label("Aperture");
    }

    if ctf.focal_spread > 0.0 {
        ax.plot(k.clone(), series(|c| c.temporal))
            .label("Temporal envelope");
    }

    if ctf.angular_spread > 0.0 {
        ax.plot(k.clone(), series(|c| c.spatial))
            .label("Spatial envelope");
    }

    if ctf.gaussian_spread > 0.0 {
        ax.plot(k.clone(), series(|c| c.gaussian))
            .label("Gaussian envelope");
    }

    let product = series(CtfComponents::envelope);
    if !all_close_to_one(&product) {
        ax.plot(k, product).label("Product envelope");
    }

    ax.set_xlabel("k [1 / Å]");
    ax.legend();
    Ok(())
}
