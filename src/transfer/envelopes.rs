//! # 包络函数
//!
//! 部分相干和仪器展宽引起的阻尼因子。
//!
//! ## 函数
//! - `aperture`: 物镜光阑（可带余弦软边）
//! - `temporal_envelope`: 时间相干（焦展）包络
//! - `spatial_envelope`: 空间相干（会聚角展）包络
//! - `gaussian_envelope`: 高斯包络
//!
//! ## 单位
//! - α: 弧度；semiangle_cutoff、rolloff、angular_spread: mrad
//! - focal_spread、gaussian_spread、λ: Å
//!
//! ## 依赖关系
//! - 被 `transfer/ctf.rs` 和 `plot/ctf.rs` 使用
//! - 使用 `transfer/aberrations.rs` 的系数

use crate::transfer::aberrations::{PolarParameters, PolarSymbol};

use std::f64::consts::PI;

/// 光阑函数
pub fn aperture(alpha: f64, semiangle_cutoff: f64, rolloff: f64) -> f64 {
    let cutoff = semiangle_cutoff / 1000.0;

    if rolloff > 0.0 {
        let rolloff = rolloff / 1000.0;
        if alpha > cutoff {
            0.0
        } else if alpha > cutoff - rolloff {
            0.5 * (1.0 + (PI * (alpha - cutoff + rolloff) / rolloff).cos())
        } else {
            1.0
        }
    } else if alpha < cutoff {
        1.0
    } else {
        0.0
    }
}

/// 时间相干包络
pub fn temporal_envelope(alpha: f64, wavelength: f64, focal_spread: f64) -> f64 {
    let x = 0.5 * PI / wavelength * focal_spread * alpha * alpha;
    (-x * x).exp()
}

/// 空间相干包络
pub fn spatial_envelope(
    alpha: f64,
    phi: f64,
    wavelength: f64,
    angular_spread: f64,
    p: &PolarParameters,
) -> f64 {
    use PolarSymbol::*;

    let cos = |m: f64, angle: PolarSymbol| (m * (phi - p[angle])).cos();
    let sin = |m: f64, angle: PolarSymbol| (m * (phi - p[angle])).sin();

    let dchi_dk = 2.0 * PI / wavelength
        * ((p[C12] * cos(2.0, Phi12) + p[C10]) * alpha
            + (p[C23] * cos(3.0, Phi23) + p[C21] * cos(1.0, Phi21)) * alpha.powi(2)
            + (p[C34] * cos(4.0, Phi34) + p[C32] * cos(2.0, Phi32) + p[C30]) * alpha.powi(3)
            + (p[C45] * cos(5.0, Phi45) + p[C43] * cos(3.0, Phi43) + p[C41] * cos(1.0, Phi41))
                * alpha.powi(4)
            + (p[C56] * cos(6.0, Phi56)
                + p[C54] * cos(4.0, Phi54)
                + p[C52] * cos(2.0, Phi52)
                + p[C50])
                * alpha.powi(5));

    let dchi_dphi = -2.0 * PI / wavelength
        * (0.5 * (2.0 * p[C12] * sin(2.0, Phi12)) * alpha
            + (3.0 * p[C23] * sin(3.0, Phi23) + p[C21] * sin(1.0, Phi21)) / 3.0 * alpha.powi(2)
            + (4.0 * p[C34] * sin(4.0, Phi34) + 2.0 * p[C32] * sin(2.0, Phi32)) / 4.0
                * alpha.powi(3)
            + (5.0 * p[C45] * sin(5.0, Phi45)
                + 3.0 * p[C43] * sin(3.0, Phi43)
                + p[C41] * sin(1.0, Phi41))
                / 5.0
                * alpha.powi(4)
            + (6.0 * p[C56] * sin(6.0, Phi56)
                + 4.0 * p[C54] * sin(4.0, Phi54)
                + 2.0 * p[C52] * sin(2.0, Phi52))
                / 6.0
                * alpha.powi(5));

    let spread = angular_spread / 2.0 / 1000.0;
    (-angular_spread.signum() * spread * spread * (dchi_dk * dchi_dk + dchi_dphi * dchi_dphi))
        .exp()
}

/// 高斯包络
pub fn gaussian_envelope(alpha: f64, wavelength: f64, gaussian_spread: f64) -> f64 {
    (-0.5 * gaussian_spread * gaussian_spread * alpha * alpha / (wavelength * wavelength)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAVELENGTH: f64 = 0.0197;

    #[test]
    fn test_hard_aperture() {
        assert_eq!(aperture(0.019, 20.0, 0.0), 1.0);
        assert_eq!(aperture(0.021, 20.0, 0.0), 0.0);
    }

    #[test]
    fn test_soft_aperture_edge() {
        // 软边中点
        let mid = aperture(0.019, 20.0, 2.0);
        assert!((mid - 0.5).abs() < 1e-9);
        assert_eq!(aperture(0.017, 20.0, 2.0), 1.0);
        assert_eq!(aperture(0.0201, 20.0, 2.0), 0.0);
    }

    #[test]
    fn test_infinite_aperture_is_open() {
        assert_eq!(aperture(1.0, f64::INFINITY, 0.0), 1.0);
        assert_eq!(aperture(1.0, f64::INFINITY, 2.0), 1.0);
    }

    #[test]
    fn test_envelopes_are_one_without_spread() {
        let p = PolarParameters::new().with("Cs", 1e6).unwrap();
        assert_eq!(temporal_envelope(0.02, WAVELENGTH, 0.0), 1.0);
        assert_eq!(spatial_envelope(0.02, 0.0, WAVELENGTH, 0.0, &p), 1.0);
        assert_eq!(gaussian_envelope(0.02, WAVELENGTH, 0.0), 1.0);
    }

    #[test]
    fn test_envelopes_decay() {
        let p = PolarParameters::new().with("defocus", 100.0).unwrap();
        let t1 = temporal_envelope(0.005, WAVELENGTH, 30.0);
        let t2 = temporal_envelope(0.01, WAVELENGTH, 30.0);
        assert!(t1 < 1.0 && t2 < t1);

        let s1 = spatial_envelope(0.005, 0.0, WAVELENGTH, 0.5, &p);
        let s2 = spatial_envelope(0.01, 0.0, WAVELENGTH, 0.5, &p);
        assert!(s1 < 1.0 && s2 < s1);

        let g1 = gaussian_envelope(0.005, WAVELENGTH, 0.5);
        let g2 = gaussian_envelope(0.01, WAVELENGTH, 0.5);
        assert!(g1 < 1.0 && g2 < g1);
    }

    #[test]
    fn test_temporal_envelope_value() {
        let alpha = 0.01;
        let x = 0.5 * PI / WAVELENGTH * 20.0 * alpha * alpha;
        let expected = (-x * x).exp();
        assert!((temporal_envelope(alpha, WAVELENGTH, 20.0) - expected).abs() < 1e-12);
    }
}
