//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `plot/`, `transfer/`, `utils/`
//! - 子模块: atoms, ctf, probe

pub mod atoms;
pub mod ctf;
pub mod probe;

use crate::cli::{Commands, OutputFormat};
use crate::error::{EmPlotError, Result};
use crate::plot::{export, save_axes, Axes, FigureConfig, FigureFormat};

use std::fs;
use std::path::Path;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Atoms(args) => atoms::execute(args),
        Commands::Ctf(args) => ctf::execute(args),
        Commands::Probe(args) => probe::execute(args),
    }
}

/// 确保输出文件所在目录存在
fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| EmPlotError::FileWriteError {
                path: parent.display().to_string(),
                source: e,
            })
        }
        _ => Ok(()),
    }
}

/// 按格式保存 Axes：PNG/SVG 渲染图片，CSV 导出线条数据
fn save_output(
    ax: &Axes,
    path: &Path,
    format: OutputFormat,
    width: u32,
    height: u32,
) -> Result<()> {
    ensure_parent_dir(path)?;

    let figure = |format| FigureConfig {
        width,
        height,
        format,
    };
    match format {
        OutputFormat::Png => save_axes(ax, path, &figure(FigureFormat::Png)),
        OutputFormat::Svg => save_axes(ax, path, &figure(FigureFormat::Svg)),
        OutputFormat::Csv => export::lines_to_csv(ax, path),
    }
}

/// 图像类输出不支持 CSV
fn require_figure_format(format: OutputFormat, what: &str) -> Result<()> {
    if format == OutputFormat::Csv {
        return Err(EmPlotError::UnsupportedFormat(format!(
            "CSV output is only available for line plots, not {}",
            what
        )));
    }
    Ok(())
}
