//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `atoms`: 原子结构投影图（目录输入时批量处理）
//! - `ctf`: CTF 与包络曲线
//! - `probe`: 会聚探针的图像 / 剖面 / 域着色图
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: atoms, ctf, probe

pub mod atoms;
pub mod ctf;
pub mod probe;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;

/// emplot - 电子显微模拟诊断绘图工具
#[derive(Parser)]
#[command(name = "emplot")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Diagnostic plots for electron-microscopy simulations", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Plot atomic structures projected onto a plane (file or directory)
    Atoms(atoms::AtomsArgs),

    /// Plot the contrast transfer function and its envelopes
    Ctf(ctf::CtfPlotArgs),

    /// Build a focused probe and plot it as an image, profile or domain coloring
    Probe(probe::ProbeArgs),
}

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
    /// CSV data file (line plots only)
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "png"),
            OutputFormat::Svg => write!(f, "svg"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl OutputFormat {
    /// 显式指定优先，否则按扩展名推断，无法识别时为 PNG
    pub fn resolve(explicit: Option<OutputFormat>, path: &Path) -> OutputFormat {
        if let Some(format) = explicit {
            return format;
        }
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("svg") => OutputFormat::Svg,
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Png,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Csv => "csv",
        }
    }
}

/// 解析 "a,b" 形式的浮点数对
pub fn parse_f64_pair(input: &str) -> Result<[f64; 2], String> {
    let values = parse_list::<f64>(input)?;
    match values.as_slice() {
        &[a, b] => Ok([a, b]),
        _ => Err(format!("Expected two comma-separated numbers, got '{}'", input)),
    }
}

/// 解析 "a,b" 形式的正整数对
pub fn parse_usize_pair(input: &str) -> Result<[usize; 2], String> {
    let values = parse_list::<usize>(input)?;
    match values.as_slice() {
        &[a, b] if a > 0 && b > 0 => Ok([a, b]),
        _ => Err(format!(
            "Expected two comma-separated positive integers, got '{}'",
            input
        )),
    }
}

fn parse_list<T: std::str::FromStr>(input: &str) -> Result<Vec<T>, String> {
    input
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<T>()
                .map_err(|_| format!("Invalid number '{}' in '{}'", s.trim(), input))
        })
        .collect()
}
