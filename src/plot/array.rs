//! # 波函数数组预处理
//!
//! 把波函数（已物化或延迟构建）整理成可绘制的二维实数组。
//!
//! ## 处理流程
//! 1. 物化：`WaveSource::Lazy` 调用 `build()`
//! 2. 三维堆叠按 `index` 取一个切片
//! 3. 傅里叶空间：fft2 后 fftshift
//! 4. 对数标度：ln(1 + c·a)
//! 5. 复数转换：显式指定时按指定方式，否则复数取强度 |z|²
//!
//! ## 依赖关系
//! - 被 `plot/waves.rs` 使用
//! - 使用 `models/waves.rs`、`fft.rs`

use crate::error::{EmPlotError, Result};
use crate::fft;
use crate::models::{FieldArray, WaveSource, Waves};

use ndarray::{Array2, ArrayD, Axis, Ix2};
use num_complex::Complex64;
use std::borrow::Cow;
use std::str::FromStr;

/// 绘图空间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Space {
    #[default]
    Real,
    Fourier,
}

impl std::fmt::Display for Space {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Space::Real => write!(f, "real"),
            Space::Fourier => write!(f, "fourier"),
        }
    }
}

impl FromStr for Space {
    type Err = EmPlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "real" => Ok(Space::Real),
            "fourier" => Ok(Space::Fourier),
            _ => Err(EmPlotError::InvalidSpace(s.to_string())),
        }
    }
}

/// 数值标度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scale::Linear => write!(f, "linear"),
            Scale::Log => write!(f, "log"),
        }
    }
}

impl FromStr for Scale {
    type Err = EmPlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Scale::Linear),
            "log" => Ok(Scale::Log),
            _ => Err(EmPlotError::InvalidScale(s.to_string())),
        }
    }
}

/// 复数到实数的转换方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexConversion {
    /// |z|²
    Intensity,
    /// |z|
    Amplitude,
    /// arg z
    Phase,
    Real,
    Imag,
}

impl ComplexConversion {
    pub fn apply(&self, z: Complex64) -> f64 {
        match self {
            ComplexConversion::Intensity => z.norm_sqr(),
            ComplexConversion::Amplitude => z.norm(),
            ComplexConversion::Phase => z.arg(),
            ComplexConversion::Real => z.re,
            ComplexConversion::Imag => z.im,
        }
    }
}

impl std::fmt::Display for ComplexConversion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComplexConversion::Intensity => "intensity",
            ComplexConversion::Amplitude => "amplitude",
            ComplexConversion::Phase => "phase",
            ComplexConversion::Real => "real",
            ComplexConversion::Imag => "imag",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ComplexConversion {
    type Err = EmPlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "intensity" => Ok(ComplexConversion::Intensity),
            "amplitude" | "abs" => Ok(ComplexConversion::Amplitude),
            "phase" | "angle" => Ok(ComplexConversion::Phase),
            "real" => Ok(ComplexConversion::Real),
            "imag" => Ok(ComplexConversion::Imag),
            _ => Err(EmPlotError::InvalidConversion(s.to_string())),
        }
    }
}

/// `prepare_array` 的选项
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrepareOptions {
    /// 三维堆叠中的切片下标
    pub index: usize,
    pub space: Space,
    pub scale: Scale,
    /// 对数标度常数 c
    pub logscale_constant: f64,
    pub convert: Option<ComplexConversion>,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        PrepareOptions {
            index: 0,
            space: Space::Real,
            scale: Scale::Linear,
            logscale_constant: 0.1,
            convert: None,
        }
    }
}

/// 单个二维切片
#[derive(Debug, Clone)]
pub(crate) enum Slice {
    Real(Array2<f64>),
    Complex(Array2<Complex64>),
}

impl Slice {
    pub(crate) fn into_complex(self) -> Array2<Complex64> {
        match self {
            Slice::Real(a) => a.mapv(|v| Complex64::new(v, 0.0)),
            Slice::Complex(a) => a,
        }
    }
}

/// 延迟来源在此物化，已物化的直接借用
pub(crate) fn materialize<'a>(source: WaveSource<'a>) -> Result<Cow<'a, Waves>> {
    match source {
        WaveSource::Materialized(waves) => Ok(Cow::Borrowed(waves)),
        WaveSource::Lazy(builder) => Ok(Cow::Owned(builder.build()?)),
    }
}

fn select<T: Clone>(array: &ArrayD<T>, index: usize) -> Result<Array2<T>> {
    let selected = if array.ndim() == 3 {
        let len = array.len_of(Axis(0));
        if index >= len {
            return Err(EmPlotError::IndexOutOfRange { index, len });
        }
        array.index_axis(Axis(0), index).to_owned()
    } else {
        array.to_owned()
    };

    selected
        .into_dimensionality::<Ix2>()
        .map_err(|e| EmPlotError::InvalidShape(e.to_string()))
}

/// 取切片并按需变换到傅里叶空间
pub(crate) fn slice_waves(waves: &Waves, index: usize, space: Space) -> Result<Slice> {
    let slice = match waves.array() {
        FieldArray::Real(a) => Slice::Real(select(a, index)?),
        FieldArray::Complex(a) => Slice::Complex(select(a, index)?),
    };

    Ok(match space {
        Space::Real => slice,
        Space::Fourier => Slice::Complex(fft::fftshift(&fft::fft2(&slice.into_complex()))),
    })
}

/// 对已物化的波函数执行完整预处理
pub(crate) fn prepare_waves(waves: &Waves, options: &PrepareOptions) -> Result<Array2<f64>> {
    let mut slice = slice_waves(waves, options.index, options.space)?;

    if options.scale == Scale::Log {
        let c = options.logscale_constant;
        slice = match slice {
            Slice::Real(a) => Slice::Real(a.mapv(|v| (1.0 + c * v).ln())),
            Slice::Complex(a) => Slice::Complex(a.mapv(|z| (1.0 + z * c).ln())),
        };
    }

    Ok(match (slice, options.convert) {
        (Slice::Real(a), None) => a,
        (Slice::Real(a), Some(conversion)) => {
            a.mapv(|v| conversion.apply(Complex64::new(v, 0.0)))
        }
        (Slice::Complex(a), conversion) => {
            let conversion = conversion.unwrap_or(ComplexConversion::Intensity);
            a.mapv(|z| conversion.apply(z))
        }
    })
}

/// 将波函数整理为可绘制的二维实数组
pub fn prepare_array<'a>(
    source: impl Into<WaveSource<'a>>,
    options: &PrepareOptions,
) -> Result<Array2<f64>> {
    let waves = materialize(source.into())?;
    prepare_waves(&waves, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildWaves, Grid};
    use ndarray::{array, Array3};
    use std::cell::Cell;

    fn complex_field() -> Array2<Complex64> {
        Array2::from_shape_fn((4, 6), |(i, j)| {
            Complex64::new(i as f64 - 1.5, 0.5 * j as f64)
        })
    }

    struct CountingBuilder {
        builds: Cell<usize>,
    }

    impl BuildWaves for CountingBuilder {
        fn grid(&self) -> Grid {
            Grid::new([4.0, 6.0], [4, 6]).unwrap()
        }

        fn build(&self) -> Result<Waves> {
            self.builds.set(self.builds.get() + 1);
            Waves::new(complex_field(), [4.0, 6.0])
        }
    }

    #[test]
    fn test_invalid_space_and_scale_messages() {
        let err = "momentum".parse::<Space>().unwrap_err();
        assert!(err.to_string().contains(r#"space must be "real" or "fourier""#));

        let err = "sqrt".parse::<Scale>().unwrap_err();
        assert!(err.to_string().contains(r#"scale must be "log" or "linear""#));

        assert!("modulus".parse::<ComplexConversion>().is_err());
        assert_eq!("abs".parse::<ComplexConversion>().unwrap(), ComplexConversion::Amplitude);
        assert_eq!("angle".parse::<ComplexConversion>().unwrap(), ComplexConversion::Phase);
    }

    #[test]
    fn test_real_linear_is_identity() {
        let a = array![[1.0, -2.0, 3.0], [4.0, 5.5, -6.0]];
        let waves = Waves::new(a.clone(), [1.0, 1.0]).unwrap();

        let out = prepare_array(&waves, &PrepareOptions::default()).unwrap();
        assert_eq!(out, a);
    }

    #[test]
    fn test_complex_defaults_to_intensity() {
        let z = complex_field();
        let waves = Waves::new(z.clone(), [1.0, 1.0]).unwrap();

        let out = prepare_array(&waves, &PrepareOptions::default()).unwrap();
        for (o, v) in out.iter().zip(z.iter()) {
            assert!((o - v.norm_sqr()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_explicit_conversions() {
        let z = array![[Complex64::new(3.0, 4.0)]];
        let waves = Waves::new(z, [1.0, 1.0]).unwrap();

        let expected = [
            (ComplexConversion::Intensity, 25.0),
            (ComplexConversion::Amplitude, 5.0),
            (ComplexConversion::Phase, 4.0f64.atan2(3.0)),
            (ComplexConversion::Real, 3.0),
            (ComplexConversion::Imag, 4.0),
        ];
        for (conversion, value) in expected {
            let options = PrepareOptions {
                convert: Some(conversion),
                ..Default::default()
            };
            let out = prepare_array(&waves, &options).unwrap();
            assert!((out[[0, 0]] - value).abs() < 1e-12, "{}", conversion);
        }
    }

    #[test]
    fn test_stack_index_matches_slice() {
        let stack = Array3::from_shape_fn((3, 4, 6), |(s, i, j)| {
            Complex64::new(s as f64 + i as f64, j as f64 - s as f64)
        });
        let stacked = Waves::new(stack.clone(), [2.0, 3.0]).unwrap();
        let single =
            Waves::new(stack.index_axis(Axis(0), 2).to_owned(), [2.0, 3.0]).unwrap();

        let options = PrepareOptions {
            index: 2,
            space: Space::Fourier,
            scale: Scale::Log,
            ..Default::default()
        };
        let a = prepare_array(&stacked, &options).unwrap();
        let b = prepare_array(
            &single,
            &PrepareOptions {
                index: 0,
                ..options
            },
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stack_index_out_of_range() {
        let stack = Array3::<f64>::zeros((2, 3, 3));
        let waves = Waves::new(stack, [1.0, 1.0]).unwrap();
        let options = PrepareOptions {
            index: 2,
            ..Default::default()
        };

        assert!(matches!(
            prepare_array(&waves, &options),
            Err(EmPlotError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_fourier_is_shifted_fft() {
        let z = complex_field();
        let waves = Waves::new(z.clone(), [1.0, 1.0]).unwrap();
        let options = PrepareOptions {
            space: Space::Fourier,
            convert: Some(ComplexConversion::Real),
            ..Default::default()
        };

        let out = prepare_array(&waves, &options).unwrap();
        let expected = fft::fftshift(&fft::fft2(&z));
        for (o, e) in out.iter().zip(expected.iter()) {
            assert!((o - e.re).abs() < 1e-10);
        }

        // 零频位于 (rows/2, cols/2)
        let dc: Complex64 = z.iter().sum();
        assert!((out[[2, 3]] - dc.re).abs() < 1e-10);
    }

    #[test]
    fn test_log_scale_real() {
        let a = array![[0.0, 10.0]];
        let waves = Waves::new(a, [1.0, 1.0]).unwrap();
        let options = PrepareOptions {
            scale: Scale::Log,
            logscale_constant: 0.5,
            ..Default::default()
        };

        let out = prepare_array(&waves, &options).unwrap();
        assert_eq!(out[[0, 0]], 0.0);
        assert!((out[[0, 1]] - 6.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_lazy_source_built_once() {
        let builder = CountingBuilder {
            builds: Cell::new(0),
        };
        let source: WaveSource = (&builder as &dyn BuildWaves).into();

        let out = prepare_array(source, &PrepareOptions::default()).unwrap();
        assert_eq!(out.dim(), (4, 6));
        assert_eq!(builder.builds.get(), 1);
    }
}
