//! # 极坐标像差系数
//!
//! 以 Krivanek 记号 (Cnm, phinm) 存储像差系数，并计算像差函数 χ 与相位因子。
//!
//! ## 公式
//! χ(α, φ) = 2π/λ · Σ 1/(n+1) · αⁿ⁺¹ · Σₘ Cnm · cos(m(φ − φnm))
//! 相位因子 = exp(−iχ)
//!
//! ## 单位
//! - Cnm: Å
//! - phinm: 弧度
//! - α: 弧度
//!
//! ## 依赖关系
//! - 被 `transfer/ctf.rs`、`transfer/envelopes.rs` 使用

use crate::error::{EmPlotError, Result};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// 像差系数符号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PolarSymbol {
    C10,
    C12,
    Phi12,
    C21,
    Phi21,
    C23,
    Phi23,
    C30,
    C32,
    Phi32,
    C34,
    Phi34,
    C41,
    Phi41,
    C43,
    Phi43,
    C45,
    Phi45,
    C50,
    C52,
    Phi52,
    C54,
    Phi54,
    C56,
    Phi56,
}

impl PolarSymbol {
    pub const ALL: [PolarSymbol; 25] = [
        PolarSymbol::C10,
        PolarSymbol::C12,
        PolarSymbol::Phi12,
        PolarSymbol::C21,
        PolarSymbol::Phi21,
        PolarSymbol::C23,
        PolarSymbol::Phi23,
        PolarSymbol::C30,
        PolarSymbol::C32,
        PolarSymbol::Phi32,
        PolarSymbol::C34,
        PolarSymbol::Phi34,
        PolarSymbol::C41,
        PolarSymbol::Phi41,
        PolarSymbol::C43,
        PolarSymbol::Phi43,
        PolarSymbol::C45,
        PolarSymbol::Phi45,
        PolarSymbol::C50,
        PolarSymbol::C52,
        PolarSymbol::Phi52,
        PolarSymbol::C54,
        PolarSymbol::Phi54,
        PolarSymbol::C56,
        PolarSymbol::Phi56,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolarSymbol::C10 => "C10",
            PolarSymbol::C12 => "C12",
            PolarSymbol::Phi12 => "phi12",
            PolarSymbol::C21 => "C21",
            PolarSymbol::Phi21 => "phi21",
            PolarSymbol::C23 => "C23",
            PolarSymbol::Phi23 => "phi23",
            PolarSymbol::C30 => "C30",
            PolarSymbol::C32 => "C32",
            PolarSymbol::Phi32 => "phi32",
            PolarSymbol::C34 => "C34",
            PolarSymbol::Phi34 => "phi34",
            PolarSymbol::C41 => "C41",
            PolarSymbol::Phi41 => "phi41",
            PolarSymbol::C43 => "C43",
            PolarSymbol::Phi43 => "phi43",
            PolarSymbol::C45 => "C45",
            PolarSymbol::Phi45 => "phi45",
            PolarSymbol::C50 => "C50",
            PolarSymbol::C52 => "C52",
            PolarSymbol::Phi52 => "phi52",
            PolarSymbol::C54 => "C54",
            PolarSymbol::Phi54 => "phi54",
            PolarSymbol::C56 => "C56",
            PolarSymbol::Phi56 => "phi56",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for PolarSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolarSymbol {
    type Err = EmPlotError;

    fn from_str(s: &str) -> Result<Self> {
        PolarSymbol::ALL
            .iter()
            .find(|sym| sym.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| EmPlotError::InvalidArgument(format!("unknown aberration '{}'", s)))
    }
}

/// 像差系数集合，全部默认为 0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct PolarParameters {
    values: [f64; 25],
}

impl PolarParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按符号或别名设置系数
    ///
    /// 别名: defocus (= −C10), astigmatism, astigmatism_angle, coma, coma_angle, Cs, C5
    pub fn set(&mut self, name: &str, value: f64) -> Result<()> {
        match name {
            "defocus" => self[PolarSymbol::C10] = -value,
            "astigmatism" => self[PolarSymbol::C12] = value,
            "astigmatism_angle" => self[PolarSymbol::Phi12] = value,
            "coma" => self[PolarSymbol::C21] = value,
            "coma_angle" => self[PolarSymbol::Phi21] = value,
            "Cs" => self[PolarSymbol::C30] = value,
            "C5" => self[PolarSymbol::C50] = value,
            _ => {
                let symbol: PolarSymbol = name.parse()?;
                self[symbol] = value;
            }
        }
        Ok(())
    }

    pub fn with(mut self, name: &str, value: f64) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// 离焦量 (= −C10)
    pub fn defocus(&self) -> f64 {
        -self[PolarSymbol::C10]
    }

    /// 非零系数
    pub fn nonzero(&self) -> impl Iterator<Item = (PolarSymbol, f64)> + '_ {
        PolarSymbol::ALL
            .iter()
            .map(|&s| (s, self[s]))
            .filter(|(_, v)| *v != 0.0)
    }

    fn any_nonzero(&self, symbols: &[PolarSymbol]) -> bool {
        symbols.iter().any(|&s| self[s] != 0.0)
    }
}

impl Index<PolarSymbol> for PolarParameters {
    type Output = f64;

    fn index(&self, symbol: PolarSymbol) -> &f64 {
        &self.values[symbol.index()]
    }
}

impl IndexMut<PolarSymbol> for PolarParameters {
    fn index_mut(&mut self, symbol: PolarSymbol) -> &mut f64 {
        &mut self.values[symbol.index()]
    }
}

impl TryFrom<BTreeMap<String, f64>> for PolarParameters {
    type Error = EmPlotError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self> {
        let mut parameters = PolarParameters::default();
        for (name, value) in map {
            parameters.set(&name, value)?;
        }
        Ok(parameters)
    }
}

impl From<PolarParameters> for BTreeMap<String, f64> {
    fn from(parameters: PolarParameters) -> Self {
        parameters
            .nonzero()
            .map(|(s, v)| (s.as_str().to_string(), v))
            .collect()
    }
}

/// 像差函数 χ(α, φ)（弧度）
pub fn polar_chi(alpha: f64, phi: f64, wavelength: f64, p: &PolarParameters) -> f64 {
    use PolarSymbol::*;

    let alpha2 = alpha * alpha;
    let mut chi = 0.0;

    if p.any_nonzero(&[C10, C12, Phi12]) {
        chi += 0.5 * alpha2 * (p[C10] + p[C12] * (2.0 * (phi - p[Phi12])).cos());
    }

    if p.any_nonzero(&[C21, Phi21, C23, Phi23]) {
        chi += alpha2 * alpha / 3.0
            * (p[C21] * (phi - p[Phi21]).cos() + p[C23] * (3.0 * (phi - p[Phi23])).cos());
    }

    if p.any_nonzero(&[C30, C32, Phi32, C34, Phi34]) {
        chi += 0.25
            * alpha2
            * alpha2
            * (p[C30]
                + p[C32] * (2.0 * (phi - p[Phi32])).cos()
                + p[C34] * (4.0 * (phi - p[Phi34])).cos());
    }

    if p.any_nonzero(&[C41, Phi41, C43, Phi43, C45, Phi45]) {
        chi += 0.2
            * alpha2
            * alpha2
            * alpha
            * (p[C41] * (phi - p[Phi41]).cos()
                + p[C43] * (3.0 * (phi - p[Phi43])).cos()
                + p[C45] * (5.0 * (phi - p[Phi45])).cos());
    }

    if p.any_nonzero(&[C50, C52, Phi52, C54, Phi54, C56, Phi56]) {
        chi += alpha2 * alpha2 * alpha2 / 6.0
            * (p[C50]
                + p[C52] * (2.0 * (phi - p[Phi52])).cos()
                + p[C54] * (4.0 * (phi - p[Phi54])).cos()
                + p[C56] * (6.0 * (phi - p[Phi56])).cos());
    }

    2.0 * PI / wavelength * chi
}

/// 像差相位因子 exp(−iχ)
pub fn polar_aberrations(
    alpha: f64,
    phi: f64,
    wavelength: f64,
    parameters: &PolarParameters,
) -> Complex64 {
    Complex64::from_polar(1.0, -polar_chi(alpha, phi, wavelength, parameters))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAVELENGTH: f64 = 0.0197;

    #[test]
    fn test_symbol_round_trip_by_name() {
        for symbol in PolarSymbol::ALL {
            assert_eq!(symbol.as_str().parse::<PolarSymbol>().unwrap(), symbol);
        }
        assert!("C99".parse::<PolarSymbol>().is_err());
    }

    #[test]
    fn test_aliases() {
        let mut p = PolarParameters::new();
        p.set("defocus", 50.0).unwrap();
        p.set("Cs", 1e5).unwrap();

        assert_eq!(p[PolarSymbol::C10], -50.0);
        assert_eq!(p.defocus(), 50.0);
        assert_eq!(p[PolarSymbol::C30], 1e5);
        assert!(p.set("nonsense", 1.0).is_err());
    }

    #[test]
    fn test_chi_defocus_only() {
        let p = PolarParameters::new().with("C10", 100.0).unwrap();
        let alpha = 0.01;
        let expected = 2.0 * PI / WAVELENGTH * 0.5 * alpha * alpha * 100.0;

        assert!((polar_chi(alpha, 0.3, WAVELENGTH, &p) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_chi_spherical_aberration() {
        let p = PolarParameters::new().with("Cs", 1e7).unwrap();
        let alpha: f64 = 0.02;
        let expected = 2.0 * PI / WAVELENGTH * 0.25 * alpha.powi(4) * 1e7;

        assert!((polar_chi(alpha, 0.0, WAVELENGTH, &p) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_astigmatism_depends_on_azimuth() {
        let p = PolarParameters::new().with("C12", 20.0).unwrap();
        let along = polar_chi(0.01, 0.0, WAVELENGTH, &p);
        let across = polar_chi(0.01, PI / 2.0, WAVELENGTH, &p);

        assert!((along + across).abs() < 1e-9);
    }

    #[test]
    fn test_no_aberrations_is_unit_phase() {
        let p = PolarParameters::new();
        let z = polar_aberrations(0.02, 1.0, WAVELENGTH, &p);

        assert!((z.re - 1.0).abs() < 1e-12);
        assert!(z.im.abs() < 1e-12);
    }

    #[test]
    fn test_serde_map_form() {
        let p: PolarParameters =
            serde_json::from_str(r#"{"C30": 1000.0, "defocus": 20.0}"#).unwrap();
        assert_eq!(p[PolarSymbol::C30], 1000.0);
        assert_eq!(p[PolarSymbol::C10], -20.0);

        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"C10\":-20.0"));
        assert!(!json.contains("phi12"));
    }
}
