//! # 原子结构数据模型
//!
//! 以笛卡尔坐标和原子序数表示的原子结构，供投影绘图使用。
//!
//! ## 依赖关系
//! - 被 `parsers/poscar.rs` 构造
//! - 被 `plot/atoms.rs` 读取并按需复制扩胞
//! - 使用 `models/elements.rs` 计算化学式

use crate::error::{EmPlotError, Result};
use crate::models::elements;

use serde::{Deserialize, Serialize};

/// 晶格参数表示
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格参数 (a, b, c, alpha, beta, gamma) 创建晶格
    /// 角度单位：度
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();

        let c1 = c * cos_beta;
        let c2 = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c3 = (c * c - c1 * c1 - c2 * c2).sqrt();

        Lattice {
            matrix: [
                [a, 0.0, 0.0],
                [b * cos_gamma, b * sin_gamma, 0.0],
                [c1, c2, c3],
            ],
        }
    }

    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 正交盒子
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self {
        Lattice::from_vectors([[a, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, c]])
    }

    /// 获取晶格常数 (a, b, c)
    pub fn lengths(&self) -> [f64; 3] {
        self.matrix.map(|v| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt())
    }

    /// 计算晶格体积
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 分数坐标转笛卡尔坐标 (frac · matrix)
    pub fn to_cartesian(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }
}

/// 原子结构
///
/// `Clone` 即深拷贝；绘图函数只在自己的副本上扩胞。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atoms {
    /// 结构名称
    pub name: String,

    /// 晶胞
    pub lattice: Lattice,

    /// 原子序数
    pub numbers: Vec<usize>,

    /// 笛卡尔坐标 (Å)
    pub positions: Vec<[f64; 3]>,
}

impl Atoms {
    pub fn new(
        name: impl Into<String>,
        lattice: Lattice,
        numbers: Vec<usize>,
        positions: Vec<[f64; 3]>,
    ) -> Result<Self> {
        if numbers.len() != positions.len() {
            return Err(EmPlotError::InvalidArgument(format!(
                "{} atomic numbers but {} positions",
                numbers.len(),
                positions.len()
            )));
        }
        Ok(Atoms {
            name: name.into(),
            lattice,
            numbers,
            positions,
        })
    }

    /// 空结构（仅晶胞）
    pub fn empty(name: impl Into<String>, lattice: Lattice) -> Self {
        Atoms {
            name: name.into(),
            lattice,
            numbers: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// 从分数坐标创建
    pub fn from_fractional(
        name: impl Into<String>,
        lattice: Lattice,
        numbers: Vec<usize>,
        fractional: &[[f64; 3]],
    ) -> Result<Self> {
        let positions = fractional.iter().map(|f| lattice.to_cartesian(*f)).collect();
        Atoms::new(name, lattice, numbers, positions)
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// 原位扩胞
    ///
    /// 依次遍历 (m0, m1, m2)，每个块是完整的原始原子列表平移 m·cell；
    /// 晶胞第 i 行乘以 reps[i]。
    pub fn repeat(&mut self, reps: [usize; 3]) -> Result<()> {
        if reps.contains(&0) {
            return Err(EmPlotError::InvalidArgument(format!(
                "repeat counts must be positive, got {:?}",
                reps
            )));
        }

        let n = self.len();
        let total = reps.iter().product::<usize>();
        let mut numbers = Vec::with_capacity(n * total);
        let mut positions = Vec::with_capacity(n * total);

        for m0 in 0..reps[0] {
            for m1 in 0..reps[1] {
                for m2 in 0..reps[2] {
                    let shift = self
                        .lattice
                        .to_cartesian([m0 as f64, m1 as f64, m2 as f64]);
                    for (z, p) in self.numbers.iter().zip(&self.positions) {
                        numbers.push(*z);
                        positions.push([p[0] + shift[0], p[1] + shift[1], p[2] + shift[2]]);
                    }
                }
            }
        }

        for (row, &r) in self.lattice.matrix.iter_mut().zip(reps.iter()) {
            for v in row.iter_mut() {
                *v *= r as f64;
            }
        }
        self.numbers = numbers;
        self.positions = positions;
        Ok(())
    }

    /// 返回扩胞后的副本
    pub fn repeated(&self, reps: [usize; 3]) -> Result<Self> {
        let mut atoms = self.clone();
        atoms.repeat(reps)?;
        Ok(atoms)
    }

    /// 计算化学式
    pub fn formula(&self) -> String {
        use std::collections::BTreeMap;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for &z in &self.numbers {
            *counts.entry(elements::symbol(z)).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }
}
