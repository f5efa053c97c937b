//! # probe 子命令 CLI 定义
//!
//! 构建会聚探针并绘制图像、中心剖面或域着色图。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 展开 `cli/ctf.rs` 的 CtfArgs
//! - 参数传递给 `commands/probe.rs`

use crate::cli::ctf::CtfArgs;
use crate::cli::{parse_f64_pair, parse_usize_pair, OutputFormat};
use crate::plot::{Colormap, ComplexConversion, Scale, Space};

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 绘图类型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum ProbePlotKind {
    /// 2-D image of the prepared array
    #[default]
    Image,
    /// 1-D profile through the center row
    Profile,
    /// Domain coloring of the complex wave function
    Domain,
}

impl std::fmt::Display for ProbePlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbePlotKind::Image => write!(f, "image"),
            ProbePlotKind::Profile => write!(f, "profile"),
            ProbePlotKind::Domain => write!(f, "domain"),
        }
    }
}

/// probe 子命令参数
#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub ctf: CtfArgs,

    /// Field of view "Lx,Ly" in Å
    #[arg(long, value_parser = parse_f64_pair)]
    pub extent: [f64; 2],

    /// Grid points "Nx,Ny"
    #[arg(long, value_parser = parse_usize_pair)]
    pub gpts: [usize; 2],

    /// Probe position "x,y" in Å (repeatable; default: center of the field)
    #[arg(long = "position", value_parser = parse_f64_pair, allow_hyphen_values = true)]
    pub positions: Vec<[f64; 2]>,

    /// What to plot
    #[arg(long, value_enum, default_value_t = ProbePlotKind::Image)]
    pub kind: ProbePlotKind,

    /// Index into the probe stack when several positions are given
    #[arg(short, long, default_value_t = 0)]
    pub index: usize,

    /// Plot in "real" or "fourier" space
    #[arg(long, default_value = "real")]
    pub space: Space,

    /// Value scale: "linear" or "log"
    #[arg(long, default_value = "linear")]
    pub scale: Scale,

    /// Constant c in ln(1 + c·a) for the log scale
    #[arg(long, default_value_t = 0.1)]
    pub log_constant: f64,

    /// Complex conversion: intensity, amplitude/abs, phase/angle, real, imag [default: intensity]
    #[arg(long)]
    pub convert: Option<ComplexConversion>,

    /// Colormap for images: gray or viridis
    #[arg(long, default_value = "gray")]
    pub cmap: Colormap,

    /// Domain coloring: large amplitudes fade to white instead of black
    #[arg(long, default_value_t = false)]
    pub fade_to_white: bool,

    /// Domain coloring: saturation
    #[arg(long, default_value_t = 1.0)]
    pub saturation: f64,

    /// Domain coloring: lightness base k in k^|z|
    #[arg(long, default_value_t = 0.5)]
    pub lightness_base: f64,

    /// Output file
    #[arg(short, long, default_value = "probe.png")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Title for the plot
    #[arg(long)]
    pub title: Option<String>,

    /// Figure width in pixels
    #[arg(long, default_value_t = 1000)]
    pub width: u32,

    /// Figure height in pixels
    #[arg(long, default_value_t = 1000)]
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_probe_arguments_parse() {
        let cli = Cli::try_parse_from([
            "emplot",
            "probe",
            "--extent",
            "10,10",
            "--gpts",
            "64,64",
            "--semiangle-cutoff",
            "20",
            "-a",
            "defocus=50",
            "--position",
            "2,3",
            "--position",
            "5,5",
            "--space",
            "fourier",
            "--convert",
            "abs",
            "--kind",
            "profile",
        ])
        .unwrap();

        let Commands::Probe(args) = cli.command else {
            panic!("expected probe command");
        };
        assert_eq!(args.gpts, [64, 64]);
        assert_eq!(args.positions, vec![[2.0, 3.0], [5.0, 5.0]]);
        assert_eq!(args.space, crate::plot::Space::Fourier);
        assert_eq!(args.convert, Some(crate::plot::ComplexConversion::Amplitude));
        assert_eq!(args.kind, super::ProbePlotKind::Profile);
        assert_eq!(args.ctf.semiangle_cutoff, Some(20.0));
        assert_eq!(args.ctf.aberrations, vec![("defocus".to_string(), 50.0)]);
    }

    #[test]
    fn test_invalid_space_rejected() {
        let result = Cli::try_parse_from([
            "emplot", "probe", "--extent", "10,10", "--gpts", "8,8", "--space", "momentum",
        ]);
        assert!(result.is_err());
    }
}
