//! # ctf 命令实现
//!
//! 绘制 CTF 与包络曲线，并打印非零像差系数表。
//!
//! ## 功能
//! - 从 JSON 参数文件和命令行参数组装 `Ctf`
//! - 输出 PNG / SVG 图像或 CSV 曲线数据
//!
//! ## 依赖关系
//! - 使用 `cli/ctf.rs` 定义的参数
//! - 使用 `transfer/ctf.rs`、`plot/ctf.rs`
//! - `build_ctf` 也被 `commands/probe.rs` 使用

use crate::cli::ctf::{CtfArgs, CtfPlotArgs};
use crate::cli::OutputFormat;
use crate::commands::save_output;
use crate::error::Result;
use crate::plot::{plot_ctf, Axes, CtfPlotOptions};
use crate::transfer::Ctf;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 执行 ctf 命令
pub fn execute(args: CtfPlotArgs) -> Result<()> {
    output::print_header("Contrast Transfer Function");

    let ctf = build_ctf(&args.ctf)?;
    print_ctf_summary(&ctf);

    let mut ax = Axes::new();
    plot_ctf(
        &mut ax,
        &ctf,
        args.max_k,
        &CtfPlotOptions {
            phi: args.phi,
            n: args.samples,
        },
    )?;
    ax.set_title(
        args.title
            .clone()
            .unwrap_or_else(|| format!("CTF ({:.0} keV)", ctf.energy / 1e3)),
    );

    let curves: Vec<&str> = ax
        .lines()
        .iter()
        .filter_map(|l| l.label.as_deref())
        .collect();
    output::print_info(&format!("Curves: {}", curves.join(", ")));

    let format = OutputFormat::resolve(args.format, &args.output);
    save_output(&ax, &args.output, format, args.width, args.height)?;
    output::print_success(&format!("Saved {} to {}", format, args.output.display()));

    Ok(())
}

/// 组装 CTF：JSON 文件为基础，命令行参数覆盖
pub fn build_ctf(args: &CtfArgs) -> Result<Ctf> {
    let mut ctf = match &args.params {
        Some(path) => Ctf::from_json_file(path)?,
        None => Ctf::default(),
    };

    if let Some(energy) = args.energy {
        ctf.energy = energy;
    }
    if let Some(cutoff) = args.semiangle_cutoff {
        ctf.semiangle_cutoff = cutoff;
    }
    if let Some(rolloff) = args.rolloff {
        ctf.rolloff = rolloff;
    }
    if let Some(spread) = args.focal_spread {
        ctf.focal_spread = spread;
    }
    if let Some(spread) = args.angular_spread {
        ctf.angular_spread = spread;
    }
    if let Some(spread) = args.gaussian_spread {
        ctf.gaussian_spread = spread;
    }
    for (name, value) in &args.aberrations {
        ctf.parameters.set(name, *value)?;
    }

    ctf.validate()?;
    Ok(ctf)
}

/// 打印电子光学参数和非零像差系数表
fn print_ctf_summary(ctf: &Ctf) {
    #[derive(Tabled)]
    struct CoefficientRow {
        #[tabled(rename = "Symbol")]
        symbol: String,
        #[tabled(rename = "Value")]
        value: String,
        #[tabled(rename = "Unit")]
        unit: &'static str,
    }

    output::print_info(&format!(
        "Energy: {:.1} keV, wavelength: {:.5} Å",
        ctf.energy / 1e3,
        ctf.wavelength()
    ));
    if ctf.semiangle_cutoff.is_finite() {
        output::print_info(&format!(
            "Aperture: {} mrad (rolloff {} mrad)",
            ctf.semiangle_cutoff, ctf.rolloff
        ));
    }

    let rows: Vec<CoefficientRow> = ctf
        .parameters
        .nonzero()
        .map(|(symbol, value)| {
            let name = symbol.as_str();
            CoefficientRow {
                symbol: name.to_string(),
                value: format!("{:.4e}", value),
                unit: if name.starts_with("phi") { "rad" } else { "Å" },
            }
        })
        .collect();

    if rows.is_empty() {
        output::print_info("No aberrations (ideal lens)");
    } else {
        output::print_header(&format!("{} Non-zero Aberration Coefficients", rows.len()));
        println!("{}", Table::new(&rows));
    }
}
