//! # 波函数数据模型
//!
//! 定义波函数场的网格元数据、数组容器，以及"已物化 / 延迟构建"两种来源。
//!
//! ## 类型
//! - `Grid`: 实空间尺寸、采样点数、倒空间范围
//! - `FieldArray`: 实数或复数数组（2 维或 3 维堆叠）
//! - `Waves`: 已物化的波函数
//! - `BuildWaves`: 延迟构建接口（如 `transfer::Probe`）
//! - `WaveSource`: 绘图函数接受的统一入口
//!
//! ## 依赖关系
//! - 被 `plot/array.rs`、`plot/waves.rs` 使用
//! - 被 `transfer/probe.rs` 实现

use crate::error::{EmPlotError, Result};

use ndarray::{Array2, Array3, ArrayD};
use num_complex::Complex64;

/// 采样网格
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// 实空间尺寸 (Å)
    pub extent: [f64; 2],
    /// 采样点数
    pub gpts: [usize; 2],
}

impl Grid {
    pub fn new(extent: [f64; 2], gpts: [usize; 2]) -> Result<Self> {
        if gpts.contains(&0) {
            return Err(EmPlotError::InvalidArgument(format!(
                "grid points must be positive, got {:?}",
                gpts
            )));
        }
        if extent.iter().any(|&l| !(l > 0.0) || !l.is_finite()) {
            return Err(EmPlotError::InvalidArgument(format!(
                "grid extent must be positive and finite, got {:?}",
                extent
            )));
        }
        Ok(Grid { extent, gpts })
    }

    /// 实空间采样间隔 (Å)
    pub fn sampling(&self) -> [f64; 2] {
        [
            self.extent[0] / self.gpts[0] as f64,
            self.extent[1] / self.gpts[1] as f64,
        ]
    }

    /// 倒空间范围 [[kx_min, kx_max], [ky_min, ky_max]] (1/Å)
    ///
    /// 即零频居中后 FFT 频率的最小值和最大值。
    pub fn fourier_limits(&self) -> [[f64; 2]; 2] {
        let limits = |n: usize, l: f64| {
            let half = (n / 2) as f64;
            if n % 2 == 0 {
                [-half / l, (half - 1.0) / l]
            } else {
                [-half / l, half / l]
            }
        };
        [
            limits(self.gpts[0], self.extent[0]),
            limits(self.gpts[1], self.extent[1]),
        ]
    }

    /// 展平的倒空间范围 [kx_min, kx_max, ky_min, ky_max]
    pub fn fourier_extent(&self) -> [f64; 4] {
        let [[x0, x1], [y0, y1]] = self.fourier_limits();
        [x0, x1, y0, y1]
    }

    /// 实空间范围 [0, Lx, 0, Ly]
    pub fn real_extent(&self) -> [f64; 4] {
        [0.0, self.extent[0], 0.0, self.extent[1]]
    }
}

/// 波函数数组（实数或复数，2 维或 3 维）
#[derive(Debug, Clone, PartialEq)]
pub enum FieldArray {
    Real(ArrayD<f64>),
    Complex(ArrayD<Complex64>),
}

impl FieldArray {
    pub fn shape(&self) -> &[usize] {
        match self {
            FieldArray::Real(a) => a.shape(),
            FieldArray::Complex(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, FieldArray::Complex(_))
    }
}

impl From<Array2<f64>> for FieldArray {
    fn from(a: Array2<f64>) -> Self {
        FieldArray::Real(a.into_dyn())
    }
}

impl From<Array3<f64>> for FieldArray {
    fn from(a: Array3<f64>) -> Self {
        FieldArray::Real(a.into_dyn())
    }
}

impl From<Array2<Complex64>> for FieldArray {
    fn from(a: Array2<Complex64>) -> Self {
        FieldArray::Complex(a.into_dyn())
    }
}

impl From<Array3<Complex64>> for FieldArray {
    fn from(a: Array3<Complex64>) -> Self {
        FieldArray::Complex(a.into_dyn())
    }
}

/// 已物化的波函数
#[derive(Debug, Clone, PartialEq)]
pub struct Waves {
    array: FieldArray,
    grid: Grid,
}

impl Waves {
    /// 创建波函数；数组必须是 2 维或 3 维，网格点数取最后两维
    pub fn new(array: impl Into<FieldArray>, extent: [f64; 2]) -> Result<Self> {
        let array = array.into();
        let shape = array.shape();
        if shape.len() != 2 && shape.len() != 3 {
            return Err(EmPlotError::InvalidShape(format!(
                "wave array must have 2 or 3 axes, got shape {:?}",
                shape
            )));
        }
        let gpts = [shape[shape.len() - 2], shape[shape.len() - 1]];
        let grid = Grid::new(extent, gpts)?;
        Ok(Waves { array, grid })
    }

    pub fn array(&self) -> &FieldArray {
        &self.array
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn extent(&self) -> [f64; 2] {
        self.grid.extent
    }

    pub fn fourier_limits(&self) -> [[f64; 2]; 2] {
        self.grid.fourier_limits()
    }

    /// 堆叠的切片数；2 维数组为 None
    pub fn stack_len(&self) -> Option<usize> {
        match self.array.ndim() {
            3 => Some(self.array.shape()[0]),
            _ => None,
        }
    }
}

/// 延迟构建的波函数
pub trait BuildWaves {
    /// 构建后数组所在的网格
    fn grid(&self) -> Grid;

    /// 物化数组
    fn build(&self) -> Result<Waves>;
}

/// 绘图函数的波函数来源
#[derive(Clone, Copy)]
pub enum WaveSource<'a> {
    Materialized(&'a Waves),
    Lazy(&'a dyn BuildWaves),
}

impl<'a> WaveSource<'a> {
    pub fn grid(&self) -> Grid {
        match self {
            WaveSource::Materialized(waves) => waves.grid(),
            WaveSource::Lazy(builder) => builder.grid(),
        }
    }
}

impl<'a> From<&'a Waves> for WaveSource<'a> {
    fn from(waves: &'a Waves) -> Self {
        WaveSource::Materialized(waves)
    }
}

impl<'a> From<&'a dyn BuildWaves> for WaveSource<'a> {
    fn from(builder: &'a dyn BuildWaves) -> Self {
        WaveSource::Lazy(builder)
    }
}
