//! # atoms 子命令 CLI 定义
//!
//! 原子结构投影图；输入为目录时进入批量模式。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/atoms.rs`

use crate::batch::collector::DEFAULT_PATTERNS;
use crate::cli::{parse_usize_pair, OutputFormat};
use crate::plot::Plane;

use clap::Args;
use std::path::PathBuf;

/// 解析扫描区域 "x0,y0,x1,y1"
pub fn parse_scan_area(input: &str) -> Result<[[f64; 2]; 2], String> {
    let values: Vec<f64> = input
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| format!("Invalid scan area '{}'", input))?;

    match values.as_slice() {
        &[x0, y0, x1, y1] => Ok([[x0, y0], [x1, y1]]),
        _ => Err(format!(
            "Scan area needs four numbers x0,y0,x1,y1, got '{}'",
            input
        )),
    }
}

/// atoms 子命令参数
#[derive(Args, Debug)]
pub struct AtomsArgs {
    /// Input: structure file (POSCAR/CONTCAR/*.vasp) or directory
    pub input: PathBuf,

    /// Output: file path (single mode) or directory (batch mode)
    #[arg(short, long, default_value = "atoms.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Projection plane, two distinct axes from x, y, z
    #[arg(long, default_value = "xy")]
    pub plane: Plane,

    /// In-plane repetitions of the cell (e.g., "3,3")
    #[arg(long, value_parser = parse_usize_pair, default_value = "1,1")]
    pub repeat: [usize; 2],

    /// Scan area rectangle corners "x0,y0,x1,y1" in Å
    #[arg(long, value_parser = parse_scan_area, allow_hyphen_values = true)]
    pub scan_area: Option<[[f64; 2]; 2]>,

    /// Atom radius as a fraction of the covalent radius
    #[arg(long, default_value_t = 0.5)]
    pub scale_atoms: f64,

    /// Label atoms with their drawing order
    #[arg(long, default_value_t = false)]
    pub numbering: bool,

    /// Title for the plot (default: structure name)
    #[arg(long)]
    pub title: Option<String>,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 1000)]
    pub height: u32,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode)
    #[arg(long, default_value = DEFAULT_PATTERNS)]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files (batch mode)
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_area() {
        assert_eq!(
            parse_scan_area("0,0.5,-2,4").unwrap(),
            [[0.0, 0.5], [-2.0, 4.0]]
        );
        assert!(parse_scan_area("0,0,1").is_err());
        assert!(parse_scan_area("0,0,1,x").is_err());
    }
}
