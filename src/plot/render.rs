//! # 图表渲染
//!
//! 使用 `plotters` 将 `Axes` 记录的图元绘制为 PNG 或 SVG。
//!
//! ## 绘制顺序
//! 1. 图像（逐像素矩形，灰度 / viridis / RGB）
//! 2. 图形块（圆以数据坐标多边形绘制，矩形带透明度）
//! 3. 线条（未指定颜色时按默认色序）与图例
//! 4. 文字标注（居中）
//!
//! ## 依赖关系
//! - 被 `commands/` 下各命令调用
//! - 读取 `plot/axes.rs` 的 Axes
//! - 使用 `plotters` 渲染图表

use crate::error::{EmPlotError, Result};
use crate::plot::axes::{Axes, Colormap, Image, Origin, Patch, Raster};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::colors::colormaps::ViridisRGB;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::f64::consts::PI;
use std::path::Path;

const MARGIN: u32 = 20;
const X_LABEL_AREA: u32 = 50;
const Y_LABEL_AREA: u32 = 60;
const CAPTION_HEIGHT: u32 = 40;
/// 圆的多边形边数
const CIRCLE_SEGMENTS: usize = 64;

/// 默认色序 (tab10)
const COLOR_CYCLE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FigureFormat {
    #[default]
    Png,
    Svg,
}

impl FigureFormat {
    /// 根据文件扩展名判断格式
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "png" => Ok(FigureFormat::Png),
            "svg" => Ok(FigureFormat::Svg),
            _ => Err(EmPlotError::UnsupportedFormat(format!(
                "cannot render figure to '{}' (expected .png or .svg)",
                path.display()
            ))),
        }
    }
}

/// 图像尺寸与格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureConfig {
    pub width: u32,
    pub height: u32,
    pub format: FigureFormat,
}

impl Default for FigureConfig {
    fn default() -> Self {
        FigureConfig {
            width: 800,
            height: 600,
            format: FigureFormat::Png,
        }
    }
}

fn plot_err<E: std::fmt::Debug>(e: E) -> EmPlotError {
    EmPlotError::PlotError(format!("{:?}", e))
}

/// 将 Axes 保存为图片
pub fn save_axes(ax: &Axes, output_path: &Path, config: &FigureConfig) -> Result<()> {
    let size = (config.width, config.height);
    match config.format {
        FigureFormat::Png => {
            let root = BitMapBackend::new(output_path, size).into_drawing_area();
            draw_axes(&root, ax)?;
            root.present().map_err(plot_err)?;
        }
        FigureFormat::Svg => {
            let root = SVGBackend::new(output_path, size).into_drawing_area();
            draw_axes(&root, ax)?;
            root.present().map_err(plot_err)?;
        }
    }
    Ok(())
}

/// 坐标轴范围：有线条或图形块时留 5% 边距，只有图像时紧贴图像范围
fn axis_ranges(ax: &Axes) -> ([f64; 2], [f64; 2]) {
    let Some(bounds) = ax.data_bounds() else {
        return ([0.0, 1.0], [0.0, 1.0]);
    };

    let images_only = ax.lines().is_empty() && ax.patches().is_empty();
    let pad = |range: [f64; 2]| {
        let width = range[1] - range[0];
        if width <= 0.0 {
            [range[0] - 0.5, range[1] + 0.5]
        } else if images_only {
            range
        } else {
            [range[0] - 0.05 * width, range[1] + 0.05 * width]
        }
    };

    (pad(bounds.x), pad(bounds.y))
}

/// 扩展较短的一边，使两个方向每像素对应的数据长度相同
fn equalize(x: [f64; 2], y: [f64; 2], pixels: (f64, f64)) -> ([f64; 2], [f64; 2]) {
    let (pw, ph) = (pixels.0.max(1.0), pixels.1.max(1.0));
    let unit = ((x[1] - x[0]) / pw).max((y[1] - y[0]) / ph);

    let expand = |range: [f64; 2], span: f64| {
        let center = 0.5 * (range[0] + range[1]);
        [center - 0.5 * span, center + 0.5 * span]
    };

    (expand(x, unit * pw), expand(y, unit * ph))
}

/// 数据坐标下的圆多边形
fn circle_points(center: [f64; 2], radius: f64) -> Vec<(f64, f64)> {
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let t = 2.0 * PI * i as f64 / CIRCLE_SEGMENTS as f64;
            (center[0] + radius * t.cos(), center[1] + radius * t.sin())
        })
        .collect()
}

fn to_rgb(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn scalar_color(t: f64, colormap: Colormap) -> RGBColor {
    match colormap {
        Colormap::Gray => {
            let v = to_rgb(t);
            RGBColor(v, v, v)
        }
        Colormap::Viridis => ViridisRGB.get_color(t.clamp(0.0, 1.0)),
    }
}

/// 像素 (row, col) 在数据坐标下的矩形
fn pixel_rect(image: &Image, row: usize, col: usize) -> [(f64, f64); 2] {
    let (rows, cols) = image.shape();
    let [x0, x1, y0, y1] = image.extent;
    let dx = (x1 - x0) / cols as f64;
    let dy = (y1 - y0) / rows as f64;

    let left = x0 + col as f64 * dx;
    let bottom = match image.origin {
        Origin::Lower => y0 + row as f64 * dy,
        Origin::Upper => y1 - (row + 1) as f64 * dy,
    };
    [(left, bottom), (left + dx, bottom + dy)]
}

/// 图像所有像素的颜色，按行优先排列
fn image_colors(image: &Image) -> Vec<RGBColor> {
    match &image.raster {
        Raster::Scalar { data, colormap } => {
            let (min, max) = data
                .iter()
                .filter(|v| v.is_finite())
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            let ptp = max - min;

            data.iter()
                .map(|&v| {
                    let t = if ptp > 0.0 && v.is_finite() {
                        (v - min) / ptp
                    } else {
                        0.0
                    };
                    scalar_color(t, *colormap)
                })
                .collect()
        }
        Raster::Rgb(data) => {
            let (rows, cols, _) = data.dim();
            (0..rows)
                .flat_map(|r| (0..cols).map(move |c| (r, c)))
                .map(|(r, c)| {
                    RGBColor(
                        to_rgb(data[[r, c, 0]]),
                        to_rgb(data[[r, c, 1]]),
                        to_rgb(data[[r, c, 2]]),
                    )
                })
                .collect()
        }
    }
}

/// 绘制 Axes 的核心逻辑
pub fn draw_axes<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, ax: &Axes) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let (mut x_range, mut y_range) = axis_ranges(ax);
    if ax.is_equal_aspect() {
        let (width, height) = root.dim_in_pixel();
        let caption = if ax.title().is_some() { CAPTION_HEIGHT } else { 0 };
        let pixels = (
            width.saturating_sub(2 * MARGIN + Y_LABEL_AREA) as f64,
            height.saturating_sub(2 * MARGIN + X_LABEL_AREA + caption) as f64,
        );
        (x_range, y_range) = equalize(x_range, y_range, pixels);
    }

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA);
    if let Some(title) = ax.title() {
        builder.caption(title, ("sans-serif", 24).into_font());
    }
    let mut chart = builder
        .build_cartesian_2d(x_range[0]..x_range[1], y_range[0]..y_range[1])
        .map_err(plot_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh()
        .x_label_style(("sans-serif", 14))
        .y_label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16));
    if let Some(xlabel) = ax.xlabel() {
        mesh.x_desc(xlabel);
    }
    if let Some(ylabel) = ax.ylabel() {
        mesh.y_desc(ylabel);
    }
    mesh.draw().map_err(plot_err)?;

    for image in ax.images() {
        let (_, cols) = image.shape();
        let colors = image_colors(image);
        chart
            .draw_series(colors.into_iter().enumerate().map(|(i, color)| {
                Rectangle::new(pixel_rect(image, i / cols, i % cols), color.filled())
            }))
            .map_err(plot_err)?;
    }

    for patch in ax.patches() {
        match *patch {
            Patch::Circle {
                center,
                radius,
                face,
                edge,
            } => {
                let points = circle_points(center, radius);
                chart
                    .draw_series(std::iter::once(Polygon::new(points.clone(), face.filled())))
                    .map_err(plot_err)?;

                if let Some(edge) = edge {
                    let mut outline = points;
                    outline.push(outline[0]);
                    chart
                        .draw_series(std::iter::once(PathElement::new(
                            outline,
                            edge.stroke_width(1),
                        )))
                        .map_err(plot_err)?;
                }
            }
            Patch::Rectangle {
                corner,
                width,
                height,
                color,
                alpha,
            } => {
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [
                            (corner[0], corner[1]),
                            (corner[0] + width, corner[1] + height),
                        ],
                        color.mix(alpha).filled(),
                    )))
                    .map_err(plot_err)?;
            }
        }
    }

    let mut cycle = COLOR_CYCLE.iter().cycle();
    for line in ax.lines() {
        let color = match line.color {
            Some(color) => color,
            None => cycle.next().copied().unwrap_or(BLACK),
        };
        let points = line
            .xs
            .iter()
            .zip(&line.ys)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(x, y)| (*x, *y));

        let series = chart
            .draw_series(LineSeries::new(points, color.stroke_width(line.width)))
            .map_err(plot_err)?;

        if let Some(label) = &line.label {
            series
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
    }

    if ax.has_legend() && ax.lines().iter().any(|l| l.label.is_some()) {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", 14))
            .draw()
            .map_err(plot_err)?;
    }

    let text_style = ("sans-serif", 12)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    for annotation in ax.annotations() {
        chart
            .draw_series(std::iter::once(Text::new(
                annotation.text.clone(),
                (annotation.xy[0], annotation.xy[1]),
                text_style.clone(),
            )))
            .map_err(plot_err)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            FigureFormat::from_path(Path::new("out/ctf.PNG")).unwrap(),
            FigureFormat::Png
        );
        assert_eq!(
            FigureFormat::from_path(Path::new("probe.svg")).unwrap(),
            FigureFormat::Svg
        );
        assert!(FigureFormat::from_path(Path::new("probe.pdf")).is_err());
        assert!(FigureFormat::from_path(Path::new("probe")).is_err());
    }

    #[test]
    fn test_ranges_pad_lines_but_not_images() {
        let mut ax = Axes::new();
        ax.plot(vec![0.0, 10.0], vec![0.0, 2.0]);
        let (x, y) = axis_ranges(&ax);
        assert!((x[0] + 0.5).abs() < 1e-12 && (x[1] - 10.5).abs() < 1e-12);
        assert!((y[0] + 0.1).abs() < 1e-12 && (y[1] - 2.1).abs() < 1e-12);

        let mut ax = Axes::new();
        ax.imshow(Image {
            raster: Raster::Scalar {
                data: array![[0.0, 1.0]],
                colormap: Colormap::Gray,
            },
            extent: [0.0, 4.0, -1.0, 1.0],
            origin: Origin::Lower,
        });
        assert_eq!(axis_ranges(&ax), ([0.0, 4.0], [-1.0, 1.0]));
        assert_eq!(axis_ranges(&Axes::new()), ([0.0, 1.0], [0.0, 1.0]));
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        let mut ax = Axes::new();
        ax.plot(vec![1.0, 1.0], vec![0.0, 1.0]);
        let (x, _) = axis_ranges(&ax);
        assert_eq!(x, [0.5, 1.5]);
    }

    #[test]
    fn test_equalize_expands_short_side() {
        let (x, y) = equalize([0.0, 10.0], [0.0, 2.0], (500.0, 500.0));
        assert_eq!(x, [0.0, 10.0]);
        assert!((y[0] + 4.0).abs() < 1e-12 && (y[1] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_pixel_rect_origin() {
        let image = |origin| Image {
            raster: Raster::Rgb(Array3::zeros((2, 4, 3))),
            extent: [0.0, 4.0, 0.0, 2.0],
            origin,
        };

        assert_eq!(pixel_rect(&image(Origin::Lower), 0, 1), [(1.0, 0.0), (2.0, 1.0)]);
        assert_eq!(pixel_rect(&image(Origin::Upper), 0, 1), [(1.0, 1.0), (2.0, 2.0)]);
    }

    #[test]
    fn test_scalar_image_colors_normalized() {
        let image = Image {
            raster: Raster::Scalar {
                data: array![[1.0, 3.0], [f64::NAN, 2.0]],
                colormap: Colormap::Gray,
            },
            extent: [0.0, 1.0, 0.0, 1.0],
            origin: Origin::Upper,
        };

        let colors = image_colors(&image);
        assert_eq!(colors[0], RGBColor(0, 0, 0));
        assert_eq!(colors[1], RGBColor(255, 255, 255));
        assert_eq!(colors[2], RGBColor(0, 0, 0));
        assert_eq!(colors[3], RGBColor(128, 128, 128));
    }

    #[test]
    fn test_circle_points_on_radius() {
        let points = circle_points([1.0, -1.0], 0.5);
        assert_eq!(points.len(), CIRCLE_SEGMENTS);
        for (x, y) in points {
            let r = ((x - 1.0).powi(2) + (y + 1.0).powi(2)).sqrt();
            assert!((r - 0.5).abs() < 1e-12);
        }
    }
}
