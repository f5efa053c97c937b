//! # probe 命令实现
//!
//! 构建会聚电子探针，并以图像、中心剖面或域着色的形式输出。
//!
//! ## 流程
//! 1. 组装 CTF 与网格（`commands/ctf.rs::build_ctf`）
//! 2. 构建一次探针（spinner 显示进度）
//! 3. 按 `--kind` 分派到 `plot/waves.rs` 的绘图函数
//!
//! ## 依赖关系
//! - 使用 `cli/probe.rs` 定义的 ProbeArgs
//! - 使用 `transfer/probe.rs`、`plot/waves.rs`

use crate::cli::probe::{ProbeArgs, ProbePlotKind};
use crate::cli::OutputFormat;
use crate::commands::ctf::build_ctf;
use crate::commands::{require_figure_format, save_output};
use crate::error::Result;
use crate::models::{BuildWaves, Grid, Waves};
use crate::plot::{
    plot_domain_coloring, plot_image, plot_profile, Axes, ComplexConversion,
    DomainColoringOptions, DomainImageOptions, ImageOptions, PrepareOptions, ProfileOptions,
    Scale,
};
use crate::transfer::Probe;
use crate::utils::{output, progress};

/// 执行 probe 命令
pub fn execute(args: ProbeArgs) -> Result<()> {
    output::print_header("Electron Probe");

    let format = OutputFormat::resolve(args.format, &args.output);
    if args.kind != ProbePlotKind::Profile {
        require_figure_format(format, &format!("{} plots", args.kind))?;
    }

    let ctf = build_ctf(&args.ctf)?;
    let grid = Grid::new(args.extent, args.gpts)?;
    let [dx, dy] = grid.sampling();
    output::print_info(&format!(
        "Grid: {}×{} points, sampling {:.4}×{:.4} Å, λ = {:.5} Å",
        grid.gpts[0],
        grid.gpts[1],
        dx,
        dy,
        ctf.wavelength()
    ));

    let probe = Probe::new(ctf, grid).with_positions(args.positions.clone());
    let spinner = progress::create_spinner("Building probe wave function");
    let built = probe.build();
    spinner.finish_and_clear();
    let waves = built?;

    if let Some(n) = waves.stack_len() {
        output::print_info(&format!(
            "Built {} probe positions, plotting index {}",
            n, args.index
        ));
    }

    let ax = plot_waves(&waves, &args)?;
    save_output(&ax, &args.output, format, args.width, args.height)?;
    output::print_success(&format!(
        "Saved {} {} to {}",
        args.kind,
        format,
        args.output.display()
    ));
    Ok(())
}

/// 按绘图类型生成 Axes
fn plot_waves(waves: &Waves, args: &ProbeArgs) -> Result<Axes> {
    let prepare = PrepareOptions {
        index: args.index,
        space: args.space,
        scale: args.scale,
        logscale_constant: args.log_constant,
        convert: args.convert,
    };

    let mut ax = Axes::new();
    match args.kind {
        ProbePlotKind::Image => {
            plot_image(
                &mut ax,
                waves,
                &ImageOptions {
                    prepare,
                    title: args.title.clone(),
                    colormap: args.cmap,
                },
            )?;
            ax.set_equal_aspect(true);
        }
        ProbePlotKind::Profile => {
            let conversion = prepare.convert.unwrap_or(ComplexConversion::Intensity);
            plot_profile(
                &mut ax,
                waves,
                &ProfileOptions {
                    prepare,
                    title: args.title.clone(),
                    label: Some(format!("{} ({})", conversion, args.space)),
                    color: None,
                },
            )?;
            ax.legend();
        }
        ProbePlotKind::Domain => {
            if args.convert.is_some() || args.scale == Scale::Log {
                output::print_warning("--convert and --scale are ignored for domain coloring");
            }
            plot_domain_coloring(
                &mut ax,
                waves,
                &DomainImageOptions {
                    index: args.index,
                    space: args.space,
                    coloring: DomainColoringOptions {
                        fade_to_white: args.fade_to_white,
                        saturation: args.saturation,
                        k: args.lightness_base,
                    },
                    title: args.title.clone(),
                },
            )?;
            ax.set_equal_aspect(true);
        }
    }
    Ok(ax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::plot::Space;
    use clap::Parser;

    fn parse(extra: &[&str]) -> ProbeArgs {
        let mut argv = vec![
            "emplot",
            "probe",
            "--extent",
            "8,8",
            "--gpts",
            "16,16",
            "--semiangle-cutoff",
            "20",
        ];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Probe(args) => args,
            _ => panic!("expected probe command"),
        }
    }

    fn build(args: &ProbeArgs) -> Waves {
        let ctf = build_ctf(&args.ctf).unwrap();
        let grid = Grid::new(args.extent, args.gpts).unwrap();
        Probe::new(ctf, grid)
            .with_positions(args.positions.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn test_plot_waves_image() {
        let args = parse(&[]);
        let ax = plot_waves(&build(&args), &args).unwrap();
        assert_eq!(ax.images().len(), 1);
        assert!(ax.is_equal_aspect());
        assert_eq!(ax.xlabel(), Some("x [Å]"));
    }

    #[test]
    fn test_plot_waves_profile_fourier() {
        let args = parse(&["--kind", "profile", "--space", "fourier", "--convert", "abs"]);
        assert_eq!(args.space, Space::Fourier);

        let ax = plot_waves(&build(&args), &args).unwrap();
        assert_eq!(ax.lines().len(), 1);
        assert_eq!(ax.lines()[0].len(), 16);
        assert!(ax.has_legend());
    }

    #[test]
    fn test_plot_waves_domain_stack_index() {
        let args = parse(&[
            "--kind", "domain", "--position", "2,2", "--position", "6,6", "-i", "1",
        ]);
        let ax = plot_waves(&build(&args), &args).unwrap();
        assert_eq!(ax.images().len(), 1);

        let args = parse(&[
            "--kind", "domain", "--position", "2,2", "--position", "6,6", "-i", "2",
        ]);
        assert!(plot_waves(&build(&args), &args).is_err());
    }
}
