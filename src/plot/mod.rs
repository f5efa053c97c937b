//! # 绘图模块
//!
//! 将原子结构、CTF 和波函数转换为 `Axes` 上的图元，并渲染或导出。
//!
//! ## 子模块
//! - `axes`: 记录式绘图坐标系
//! - `atoms`: 原子结构投影
//! - `ctf`: CTF 曲线
//! - `array`: 波函数数组预处理
//! - `waves`: 剖面图、图像、域着色图
//! - `coloring`: 域着色
//! - `render`: PNG / SVG 渲染
//! - `export`: CSV 导出
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/`、`transfer/`、`fft.rs`

pub mod array;
pub mod atoms;
pub mod axes;
pub mod coloring;
pub mod ctf;
pub mod export;
pub mod render;
pub mod waves;

pub use array::{prepare_array, ComplexConversion, PrepareOptions, Scale, Space};
pub use atoms::{plane_to_axes, plot_atoms, AtomsPlotOptions, Plane};
pub use axes::{Axes, Colormap};
pub use coloring::{domain_coloring, DomainColoringOptions};
pub use ctf::{plot_ctf, CtfPlotOptions};
pub use render::{save_axes, FigureConfig, FigureFormat};
pub use waves::{
    plot_domain_coloring, plot_image, plot_profile, DomainImageOptions, ImageOptions,
    ProfileOptions,
};

/// n 个等间距点，包含两端
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
