//! # 会聚电子探针
//!
//! `Probe` 是延迟构建的波函数：只保存 CTF 与网格，调用 `build()` 时
//! 才在倒空间求值并逆变换得到实空间探针。
//!
//! ## 算法
//! 1. 在 FFT 频率网格上计算 α = |k|·λ, φ = atan2(ky, kx)
//! 2. ψ̃(k) = CTF(α, φ) · exp(−2πi k·r₀)
//! 3. ψ = IFFT2(ψ̃)，归一化使 Σ|ψ|² = 1
//!
//! 一个位置得到 2 维数组，多个位置得到 (N, Nx, Ny) 堆叠。
//!
//! ## 依赖关系
//! - 实现 `models/waves.rs` 的 `BuildWaves`
//! - 使用 `transfer/ctf.rs`、`fft.rs`

use crate::error::{EmPlotError, Result};
use crate::fft;
use crate::models::{BuildWaves, Grid, WaveSource, Waves};
use crate::transfer::Ctf;

use ndarray::{Array2, Array3};
use num_complex::Complex64;
use std::f64::consts::PI;

/// 网格的 kx / ky 频率 (1/Å)
struct Frequencies {
    kx: Vec<f64>,
    ky: Vec<f64>,
}

/// 会聚电子探针
#[derive(Debug, Clone)]
pub struct Probe {
    pub ctf: Ctf,
    pub grid: Grid,
    /// 探针中心 (Å)；为空时放在视场中心
    pub positions: Vec<[f64; 2]>,
}

impl Probe {
    pub fn new(ctf: Ctf, grid: Grid) -> Self {
        Probe {
            ctf,
            grid,
            positions: Vec::new(),
        }
    }

    pub fn with_positions(mut self, positions: Vec<[f64; 2]>) -> Self {
        self.positions = positions;
        self
    }

    /// FFT 频率坐标，每次构建只计算一次
    fn frequencies(&self) -> Frequencies {
        let [nx, ny] = self.grid.gpts;
        let [dx, dy] = self.grid.sampling();
        Frequencies {
            kx: fft::fftfreq(nx, dx),
            ky: fft::fftfreq(ny, dy),
        }
    }

    /// 倒空间中的传递函数
    fn fourier_array(&self, freqs: &Frequencies) -> Array2<Complex64> {
        let (kx, ky) = (&freqs.kx, &freqs.ky);
        let wavelength = self.ctf.wavelength();

        Array2::from_shape_fn((kx.len(), ky.len()), |(i, j)| {
            let k = (kx[i] * kx[i] + ky[j] * ky[j]).sqrt();
            let phi = ky[j].atan2(kx[i]);
            self.ctf.evaluate(k * wavelength, phi)
        })
    }

    fn build_at(
        &self,
        base: &Array2<Complex64>,
        freqs: &Frequencies,
        position: [f64; 2],
    ) -> Result<Array2<Complex64>> {
        let (kx, ky) = (&freqs.kx, &freqs.ky);
        let shifted = Array2::from_shape_fn(base.dim(), |(i, j)| {
            let phase = -2.0 * PI * (kx[i] * position[0] + ky[j] * position[1]);
            base[[i, j]] * Complex64::from_polar(1.0, phase)
        });

        let mut array = fft::ifft2(&shifted);
        let norm = array.iter().map(|v| v.norm_sqr()).sum::<f64>().sqrt();
        if !(norm > 0.0) {
            return Err(EmPlotError::InvalidArgument(
                "probe has no intensity inside the aperture on this grid".to_string(),
            ));
        }
        array.mapv_inplace(|v| v / norm);
        Ok(array)
    }
}

impl BuildWaves for Probe {
    fn grid(&self) -> Grid {
        self.grid
    }

    fn build(&self) -> Result<Waves> {
        self.ctf.validate()?;
        let freqs = self.frequencies();
        let base = self.fourier_array(&freqs);

        match self.positions.as_slice() {
            [] => {
                let center = [self.grid.extent[0] / 2.0, self.grid.extent[1] / 2.0];
                Waves::new(self.build_at(&base, &freqs, center)?, self.grid.extent)
            }
            [position] => {
                Waves::new(self.build_at(&base, &freqs, *position)?, self.grid.extent)
            }
            positions => {
                let [nx, ny] = self.grid.gpts;
                let mut stack = Array3::<Complex64>::zeros((positions.len(), nx, ny));
                for (mut slice, position) in stack.outer_iter_mut().zip(positions) {
                    slice.assign(&self.build_at(&base, &freqs, *position)?);
                }
                Waves::new(stack, self.grid.extent)
            }
        }
    }
}

impl<'a> From<&'a Probe> for WaveSource<'a> {
    fn from(probe: &'a Probe) -> Self {
        WaveSource::Lazy(probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldArray;

    fn probe() -> Probe {
        let ctf = Ctf::new(200e3).with_semiangle_cutoff(20.0);
        let grid = Grid::new([10.0, 10.0], [32, 32]).unwrap();
        Probe::new(ctf, grid)
    }

    #[test]
    fn test_build_single_probe_is_normalized() {
        let waves = probe().build().unwrap();
        let FieldArray::Complex(array) = waves.array() else {
            panic!("probe should be complex");
        };

        assert_eq!(array.shape(), &[32, 32]);
        let total: f64 = array.iter().map(|v| v.norm_sqr()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_probe_peaks_at_position() {
        let waves = probe().with_positions(vec![[2.5, 5.0]]).build().unwrap();
        let FieldArray::Complex(array) = waves.array() else {
            panic!("probe should be complex");
        };

        let (argmax, _) = array
            .indexed_iter()
            .max_by(|a, b| a.1.norm().partial_cmp(&b.1.norm()).unwrap())
            .unwrap();
        // 采样 10/32 Å: 2.5 Å → 8, 5.0 Å → 16
        assert_eq!((argmax[0], argmax[1]), (8, 16));
    }

    #[test]
    fn test_multiple_positions_build_stack() {
        let waves = probe()
            .with_positions(vec![[2.0, 2.0], [5.0, 5.0], [7.0, 3.0]])
            .build()
            .unwrap();

        assert_eq!(waves.stack_len(), Some(3));
        assert_eq!(waves.grid().gpts, [32, 32]);
    }

    #[test]
    fn test_stack_slices_match_single_builds() {
        let positions = vec![[2.0, 2.0], [7.0, 3.0]];
        let stacked = probe().with_positions(positions.clone()).build().unwrap();
        let FieldArray::Complex(stack) = stacked.array() else {
            panic!("probe should be complex");
        };

        for (n, position) in positions.into_iter().enumerate() {
            let single = probe().with_positions(vec![position]).build().unwrap();
            let FieldArray::Complex(single) = single.array() else {
                panic!("probe should be complex");
            };
            let slice = stack.index_axis(ndarray::Axis(0), n);
            for (a, b) in slice.iter().zip(single.iter()) {
                assert!((a - b).norm() < 1e-12);
            }
        }
    }

    #[test]
    fn test_lazy_source_exposes_grid_without_building() {
        let p = probe();
        let source: WaveSource = (&p).into();
        assert_eq!(source.grid().extent, [10.0, 10.0]);
    }
}
