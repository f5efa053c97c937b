//! # 衬度传递函数参数
//!
//! `Ctf` 汇总加速电压、光阑、各类展宽和像差系数，是 `plot_ctf` 与
//! `Probe` 的参数来源。
//!
//! ## 依赖关系
//! - 被 `plot/ctf.rs`、`transfer/probe.rs` 使用
//! - 被 `commands/ctf.rs`、`commands/probe.rs` 从命令行参数 / JSON 构造
//! - 使用 `transfer/aberrations.rs`、`transfer/envelopes.rs`

use crate::error::{EmPlotError, Result};
use crate::transfer::aberrations::{self, PolarParameters};
use crate::transfer::envelopes;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// h·c (eV·Å)
const HC: f64 = 12398.419843320026;
/// 电子静止能量 m₀c² (eV)
const ELECTRON_REST_ENERGY: f64 = 510998.95;

/// 相对论电子波长 (Å)
pub fn energy2wavelength(energy: f64) -> f64 {
    HC / (energy * (2.0 * ELECTRON_REST_ENERGY + energy)).sqrt()
}

fn infinite_cutoff() -> f64 {
    f64::INFINITY
}

/// 衬度传递函数参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ctf {
    /// 加速电压 (eV)
    pub energy: f64,

    /// 光阑半角 (mrad)，无穷大表示无光阑
    #[serde(default = "infinite_cutoff", skip_serializing_if = "is_infinite")]
    pub semiangle_cutoff: f64,

    /// 光阑软边宽度 (mrad)
    pub rolloff: f64,

    /// 焦展 (Å)
    pub focal_spread: f64,

    /// 会聚角展 (mrad)
    pub angular_spread: f64,

    /// 高斯展宽 (Å)
    pub gaussian_spread: f64,

    /// 像差系数
    pub parameters: PolarParameters,
}

fn is_infinite(v: &f64) -> bool {
    v.is_infinite()
}

impl Default for Ctf {
    fn default() -> Self {
        Ctf {
            energy: 300e3,
            semiangle_cutoff: f64::INFINITY,
            rolloff: 0.0,
            focal_spread: 0.0,
            angular_spread: 0.0,
            gaussian_spread: 0.0,
            parameters: PolarParameters::default(),
        }
    }
}

/// 单个空间频率处的各分量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CtfComponents {
    pub aberrations: Complex64,
    pub aperture: f64,
    pub temporal: f64,
    pub spatial: f64,
    pub gaussian: f64,
}

impl CtfComponents {
    /// 四个包络的乘积
    pub fn envelope(&self) -> f64 {
        self.aperture * self.temporal * self.spatial * self.gaussian
    }

    /// 弱相位近似下的 CTF: Im(exp(−iχ)) · 包络
    pub fn weak_phase(&self) -> f64 {
        self.aberrations.im * self.envelope()
    }
}

impl Ctf {
    pub fn new(energy: f64) -> Self {
        Ctf {
            energy,
            ..Ctf::default()
        }
    }

    /// 从 JSON 文件读取
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EmPlotError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let ctf: Ctf = serde_json::from_str(&content)?;
        ctf.validate()?;
        Ok(ctf)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.energy > 0.0) || !self.energy.is_finite() {
            return Err(EmPlotError::InvalidArgument(format!(
                "energy must be positive, got {}",
                self.energy
            )));
        }
        if !(self.semiangle_cutoff > 0.0) {
            return Err(EmPlotError::InvalidArgument(format!(
                "semiangle cutoff must be positive, got {}",
                self.semiangle_cutoff
            )));
        }
        for (name, value) in [
            ("rolloff", self.rolloff),
            ("focal spread", self.focal_spread),
            ("angular spread", self.angular_spread),
            ("gaussian spread", self.gaussian_spread),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(EmPlotError::InvalidArgument(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// 电子波长 (Å)
    pub fn wavelength(&self) -> f64 {
        energy2wavelength(self.energy)
    }

    pub fn with_semiangle_cutoff(mut self, cutoff: f64) -> Self {
        self.semiangle_cutoff = cutoff;
        self
    }

    pub fn with_rolloff(mut self, rolloff: f64) -> Self {
        self.rolloff = rolloff;
        self
    }

    pub fn with_focal_spread(mut self, spread: f64) -> Self {
        self.focal_spread = spread;
        self
    }

    pub fn with_angular_spread(mut self, spread: f64) -> Self {
        self.angular_spread = spread;
        self
    }

    pub fn with_gaussian_spread(mut self, spread: f64) -> Self {
        self.gaussian_spread = spread;
        self
    }

    pub fn with_parameter(mut self, name: &str, value: f64) -> Result<Self> {
        self.parameters.set(name, value)?;
        Ok(self)
    }

    /// 在散射角 α (rad)、方位角 φ 处计算各分量
    pub fn components(&self, alpha: f64, phi: f64) -> CtfComponents {
        let wavelength = self.wavelength();
        CtfComponents {
            aberrations: aberrations::polar_aberrations(alpha, phi, wavelength, &self.parameters),
            aperture: envelopes::aperture(alpha, self.semiangle_cutoff, self.rolloff),
            temporal: envelopes::temporal_envelope(alpha, wavelength, self.focal_spread),
            spatial: envelopes::spatial_envelope(
                alpha,
                phi,
                wavelength,
                self.angular_spread,
                &self.parameters,
            ),
            gaussian: envelopes::gaussian_envelope(alpha, wavelength, self.gaussian_spread),
        }
    }

    /// 复数传递函数：相位因子 × 包络
    pub fn evaluate(&self, alpha: f64, phi: f64) -> Complex64 {
        let c = self.components(alpha, phi);
        c.aberrations * c.envelope()
    }
}
