//! # 波函数剖面图与图像
//!
//! ## 函数
//! - `plot_profile`: 取中心行绘制一维剖面
//! - `plot_image`: 转置后按 origin=lower 显示二维图像
//! - `plot_domain_coloring`: 复数场的域着色图像
//!
//! 每个函数只物化一次波函数，坐标范围取自物化结果的网格。
//!
//! ## 依赖关系
//! - 被 `commands/probe.rs` 调用
//! - 使用 `plot/array.rs` 的预处理流程和 `plot/coloring.rs`

use crate::error::Result;
use crate::models::{Grid, WaveSource};
use crate::plot::array::{self, PrepareOptions, Space};
use crate::plot::axes::{Axes, Colormap, Image, Origin, Raster};
use crate::plot::coloring::{domain_coloring, DomainColoringOptions};
use crate::plot::linspace;

use plotters::style::RGBColor;

/// `plot_profile` 的选项
#[derive(Debug, Clone, Default)]
pub struct ProfileOptions {
    pub prepare: PrepareOptions,
    pub title: Option<String>,
    /// 图例标签
    pub label: Option<String>,
    pub color: Option<RGBColor>,
}

/// `plot_image` 的选项
#[derive(Debug, Clone, Default)]
pub struct ImageOptions {
    pub prepare: PrepareOptions,
    pub title: Option<String>,
    pub colormap: Colormap,
}

/// `plot_domain_coloring` 的选项
#[derive(Debug, Clone, Default)]
pub struct DomainImageOptions {
    pub index: usize,
    pub space: Space,
    pub coloring: DomainColoringOptions,
    pub title: Option<String>,
}

fn image_extent(grid: &Grid, space: Space) -> [f64; 4] {
    match space {
        Space::Real => grid.real_extent(),
        Space::Fourier => grid.fourier_extent(),
    }
}

fn set_image_labels(ax: &mut Axes, space: Space) {
    match space {
        Space::Real => {
            ax.set_xlabel("x [Å]");
            ax.set_ylabel("y [Å]");
        }
        Space::Fourier => {
            ax.set_xlabel("kx [1 / Å]");
            ax.set_ylabel("ky [1 / Å]");
        }
    }
}

/// 绘制中心行剖面
pub fn plot_profile<'a>(
    ax: &mut Axes,
    source: impl Into<WaveSource<'a>>,
    options: &ProfileOptions,
) -> Result<()> {
    let waves = array::materialize(source.into())?;
    let prepared = array::prepare_waves(&waves, &options.prepare)?;

    let y = prepared.row(prepared.nrows() / 2).to_vec();
    let (x, xlabel) = match options.prepare.space {
        Space::Real => (linspace(0.0, waves.extent()[0], y.len()), "x [Å]"),
        Space::Fourier => {
            let [kx, _] = waves.fourier_limits();
            (linspace(kx[0], kx[1], y.len()), "kx [1 / Å]")
        }
    };

    let line = ax.plot(x, y);
    if let Some(label) = &options.label {
        line.label(label.clone());
    }
    if let Some(color) = options.color {
        line.color(color);
    }

    ax.set_xlabel(xlabel);
    if let Some(title) = &options.title {
        ax.set_title(title.clone());
    }
    Ok(())
}

/// 绘制二维图像
pub fn plot_image<'a>(
    ax: &mut Axes,
    source: impl Into<WaveSource<'a>>,
    options: &ImageOptions,
) -> Result<()> {
    let waves = array::materialize(source.into())?;
    let prepared = array::prepare_waves(&waves, &options.prepare)?;

    ax.imshow(Image {
        raster: Raster::Scalar {
            data: prepared.reversed_axes(),
            colormap: options.colormap,
        },
        extent: image_extent(&waves.grid(), options.prepare.space),
        origin: Origin::Lower,
    });

    set_image_labels(ax, options.prepare.space);
    if let Some(title) = &options.title {
        ax.set_title(title.clone());
    }
    Ok(())
}

/// 绘制复数场的域着色图像
pub fn plot_domain_coloring<'a>(
    ax: &mut Axes,
    source: impl Into<WaveSource<'a>>,
    options: &DomainImageOptions,
) -> Result<()> {
    let waves = array::materialize(source.into())?;
    let field = array::slice_waves(&waves, options.index, options.space)?.into_complex();
    let rgb = domain_coloring(field.view(), &options.coloring);

    ax.imshow(Image {
        raster: Raster::Rgb(rgb.permuted_axes([1, 0, 2])),
        extent: image_extent(&waves.grid(), options.space),
        origin: Origin::Lower,
    });

    set_image_labels(ax, options.space);
    if let Some(title) = &options.title {
        ax.set_title(title.clone());
    }
    Ok(())
}
