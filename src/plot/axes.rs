//! # 绘图坐标系（记录式绘图表面）
//!
//! `Axes` 按顺序记录线条、图形块、图像和文字标注，由 `plot/render.rs`
//! 统一渲染。绘图函数只向 `Axes` 添加图元，不直接接触后端。
//!
//! 调用者显式创建 `Axes`，不存在全局默认绘图上下文。
//!
//! ## 依赖关系
//! - 被 `plot/` 下所有绘图函数写入
//! - 被 `plot/render.rs`、`plot/export.rs` 读取

use crate::error::{EmPlotError, Result};

use ndarray::{Array2, Array3};
use plotters::style::RGBColor;
use std::str::FromStr;

/// 线条
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub label: Option<String>,
    /// None 时由渲染器按默认色序分配
    pub color: Option<RGBColor>,
    pub width: u32,
}

impl Line {
    pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = Some(label.into());
        self
    }

    pub fn color(&mut self, color: RGBColor) -> &mut Self {
        self.color = Some(color);
        self
    }

    pub fn width(&mut self, width: u32) -> &mut Self {
        self.width = width;
        self
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// 图形块
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    /// 数据坐标下的圆
    Circle {
        center: [f64; 2],
        radius: f64,
        face: RGBColor,
        edge: Option<RGBColor>,
    },
    /// 左下角 + 宽高
    Rectangle {
        corner: [f64; 2],
        width: f64,
        height: f64,
        color: RGBColor,
        alpha: f64,
    },
}

/// 灰度图的颜色映射
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    #[default]
    Gray,
    Viridis,
}

impl std::fmt::Display for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Colormap::Gray => write!(f, "gray"),
            Colormap::Viridis => write!(f, "viridis"),
        }
    }
}

impl FromStr for Colormap {
    type Err = EmPlotError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gray" | "grey" => Ok(Colormap::Gray),
            "viridis" => Ok(Colormap::Viridis),
            _ => Err(EmPlotError::InvalidArgument(format!(
                "colormap must be \"gray\" or \"viridis\" (got '{}')",
                s
            ))),
        }
    }
}

/// 图像第 0 行的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    Upper,
    Lower,
}

/// 图像数据
#[derive(Debug, Clone, PartialEq)]
pub enum Raster {
    /// 标量图，经颜色映射着色
    Scalar {
        data: Array2<f64>,
        colormap: Colormap,
    },
    /// (rows, cols, 3) 的 RGB 数据，取值 [0, 1]
    Rgb(Array3<f64>),
}

/// 图像
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub raster: Raster,
    /// [x0, x1, y0, y1]
    pub extent: [f64; 4],
    pub origin: Origin,
}

impl Image {
    pub fn shape(&self) -> (usize, usize) {
        match &self.raster {
            Raster::Scalar { data, .. } => data.dim(),
            Raster::Rgb(data) => {
                let (r, c, _) = data.dim();
                (r, c)
            }
        }
    }
}

/// 文字标注（居中于 xy）
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub text: String,
    pub xy: [f64; 2],
}

/// 数据范围
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Bounds {
    fn point(x: f64, y: f64) -> Self {
        Bounds {
            x: [x, x],
            y: [y, y],
        }
    }

    fn include(&mut self, other: Bounds) {
        self.x[0] = self.x[0].min(other.x[0]);
        self.x[1] = self.x[1].max(other.x[1]);
        self.y[0] = self.y[0].min(other.y[0]);
        self.y[1] = self.y[1].max(other.y[1]);
    }

    pub fn width(&self) -> f64 {
        self.x[1] - self.x[0]
    }

    pub fn height(&self) -> f64 {
        self.y[1] - self.y[0]
    }
}

/// 记录式绘图坐标系
#[derive(Debug, Clone, Default)]
pub struct Axes {
    lines: Vec<Line>,
    patches: Vec<Patch>,
    images: Vec<Image>,
    annotations: Vec<Annotation>,
    xlabel: Option<String>,
    ylabel: Option<String>,
    title: Option<String>,
    legend: bool,
    equal_aspect: bool,
}

impl Axes {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加折线，返回可继续设置样式的句柄
    pub fn plot(&mut self, xs: Vec<f64>, ys: Vec<f64>) -> &mut Line {
        self.lines.push(Line {
            xs,
            ys,
            label: None,
            color: None,
            width: 2,
        });
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    pub fn add_patch(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    pub fn imshow(&mut self, image: Image) {
        self.images.push(image);
    }

    pub fn annotate(&mut self, text: impl Into<String>, xy: [f64; 2]) {
        self.annotations.push(Annotation {
            text: text.into(),
            xy,
        });
    }

    pub fn set_xlabel(&mut self, label: impl Into<String>) {
        self.xlabel = Some(label.into());
    }

    pub fn set_ylabel(&mut self, label: impl Into<String>) {
        self.ylabel = Some(label.into());
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn legend(&mut self) {
        self.legend = true;
    }

    pub fn set_equal_aspect(&mut self, equal: bool) {
        self.equal_aspect = equal;
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn xlabel(&self) -> Option<&str> {
        self.xlabel.as_deref()
    }

    pub fn ylabel(&self) -> Option<&str> {
        self.ylabel.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn has_legend(&self) -> bool {
        self.legend
    }

    pub fn is_equal_aspect(&self) -> bool {
        self.equal_aspect
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.patches.is_empty()
            && self.images.is_empty()
            && self.annotations.is_empty()
    }

    /// 所有图元的数据范围；忽略非有限值
    pub fn data_bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        let mut add = |b: Bounds| {
            bounds = Some(match bounds {
                Some(mut acc) => {
                    acc.include(b);
                    acc
                }
                None => b,
            });
        };

        for line in &self.lines {
            for (&x, &y) in line.xs.iter().zip(&line.ys) {
                if x.is_finite() && y.is_finite() {
                    add(Bounds::point(x, y));
                }
            }
        }

        for patch in &self.patches {
            match *patch {
                Patch::Circle { center, radius, .. } => add(Bounds {
                    x: [center[0] - radius, center[0] + radius],
                    y: [center[1] - radius, center[1] + radius],
                }),
                Patch::Rectangle {
                    corner,
                    width,
                    height,
                    ..
                } => add(Bounds {
                    x: [corner[0].min(corner[0] + width), corner[0].max(corner[0] + width)],
                    y: [
                        corner[1].min(corner[1] + height),
                        corner[1].max(corner[1] + height),
                    ],
                }),
            }
        }

        for image in &self.images {
            let [x0, x1, y0, y1] = image.extent;
            add(Bounds {
                x: [x0.min(x1), x0.max(x1)],
                y: [y0.min(y1), y0.max(y1)],
            });
        }

        for annotation in &self.annotations {
            add(Bounds::point(annotation.xy[0], annotation.xy[1]));
        }

        bounds
    }
}
