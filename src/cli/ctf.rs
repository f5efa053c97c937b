//! # ctf 子命令 CLI 定义
//!
//! `CtfArgs` 是 CTF 参数的共享参数组，被 `ctf` 和 `probe` 子命令展开使用。
//!
//! ## 参数优先级
//! 命令行显式参数 > `--params` JSON 文件 > 默认值
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs`、`cli/probe.rs` 使用
//! - 参数传递给 `commands/ctf.rs`

use crate::cli::OutputFormat;

use clap::Args;
use std::path::PathBuf;

/// 解析 "SYMBOL=VALUE" 形式的像差系数
pub fn parse_aberration(input: &str) -> Result<(String, f64), String> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| format!("Expected SYMBOL=VALUE, got '{}'", input))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Missing aberration symbol in '{}'", input));
    }

    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid aberration value in '{}'", input))?;

    Ok((name.to_string(), value))
}

/// CTF 参数组
#[derive(Args, Debug, Clone, Default)]
pub struct CtfArgs {
    /// Acceleration voltage in eV [default: 300000]
    #[arg(short, long)]
    pub energy: Option<f64>,

    /// Aperture semi-angle in mrad [default: no aperture]
    #[arg(long)]
    pub semiangle_cutoff: Option<f64>,

    /// Soft aperture edge width in mrad
    #[arg(long)]
    pub rolloff: Option<f64>,

    /// Focal spread in Å (temporal envelope)
    #[arg(long)]
    pub focal_spread: Option<f64>,

    /// Angular spread in mrad (spatial envelope)
    #[arg(long)]
    pub angular_spread: Option<f64>,

    /// Gaussian spread in Å
    #[arg(long)]
    pub gaussian_spread: Option<f64>,

    /// Aberration coefficient SYMBOL=VALUE (repeatable; e.g., defocus=200, Cs=1e7, C12=20)
    #[arg(short = 'a', long = "aberration", value_parser = parse_aberration, allow_hyphen_values = true)]
    pub aberrations: Vec<(String, f64)>,

    /// JSON file with CTF parameters (explicit flags take precedence)
    #[arg(long)]
    pub params: Option<PathBuf>,
}

/// ctf 子命令参数
#[derive(Args, Debug)]
pub struct CtfPlotArgs {
    #[command(flatten)]
    pub ctf: CtfArgs,

    /// Maximum spatial frequency in 1/Å
    #[arg(short = 'k', long)]
    pub max_k: f64,

    /// Azimuthal angle in radians
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub phi: f64,

    /// Number of sampling points
    #[arg(short = 'n', long, default_value_t = 1000)]
    pub samples: usize,

    /// Output file
    #[arg(short, long, default_value = "ctf.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Title for the plot
    #[arg(long)]
    pub title: Option<String>,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}
