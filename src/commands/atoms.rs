//! # atoms 命令实现
//!
//! 将结构文件投影到指定平面并绘制原子、晶胞边框和扫描区域。
//!
//! ## 功能
//! - 单文件模式：输出到 `--output` 文件
//! - 批量模式：输入为目录时并行渲染，输出到 `--output` 目录
//!
//! ## 依赖关系
//! - 使用 `cli/atoms.rs` 定义的 AtomsArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `parsers/` 读取结构，`plot/atoms.rs` 绘图

use crate::batch::{BatchResult, BatchRunner, FileCollector, ProcessResult};
use crate::cli::atoms::AtomsArgs;
use crate::cli::OutputFormat;
use crate::commands::{require_figure_format, save_output};
use crate::error::{EmPlotError, Result};
use crate::models::Atoms;
use crate::parsers;
use crate::plot::{plot_atoms, AtomsPlotOptions, Axes};
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 单个结构的渲染配置（批量模式下在线程间共享）
struct RenderConfig {
    options: AtomsPlotOptions,
    title: Option<String>,
    format: OutputFormat,
    width: u32,
    height: u32,
}

impl RenderConfig {
    fn from_args(args: &AtomsArgs, format: OutputFormat) -> Self {
        RenderConfig {
            options: AtomsPlotOptions {
                repeat: (args.repeat[0], args.repeat[1]),
                scan_area: args.scan_area,
                plane: args.plane,
                scale_atoms: args.scale_atoms,
                numbering: args.numbering,
            },
            title: args.title.clone(),
            format,
            width: args.width,
            height: args.height,
        }
    }

    /// 绘制并保存一个结构
    fn render(&self, atoms: &Atoms, output: &Path) -> Result<()> {
        let mut ax = Axes::new();
        plot_atoms(&mut ax, atoms, &self.options)?;
        ax.set_title(self.title.clone().unwrap_or_else(|| atoms.name.clone()));
        save_output(&ax, output, self.format, self.width, self.height)
    }
}

/// 执行 atoms 命令
pub fn execute(args: AtomsArgs) -> Result<()> {
    output::print_header("Atomic Structure Projection");

    if args.input.is_file() {
        execute_single_file(&args)
    } else if args.input.is_dir() {
        execute_batch(&args)
    } else {
        Err(EmPlotError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(args: &AtomsArgs) -> Result<()> {
    let format = OutputFormat::resolve(args.format, &args.output);
    require_figure_format(format, "atoms")?;

    let atoms = parsers::parse_structure_file(&args.input)?;
    output::print_success(&format!(
        "Loaded structure: {} ({}, {} atoms)",
        atoms.name,
        atoms.formula(),
        atoms.len()
    ));
    output::print_info(&format!(
        "Plane: {}, repeat: {}×{}",
        args.plane, args.repeat[0], args.repeat[1]
    ));

    RenderConfig::from_args(args, format).render(&atoms, &args.output)?;
    output::print_saved(&args.input.display().to_string(), &args.output);
    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &AtomsArgs) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));

    let files = FileCollector::new(&args.input)
        .with_pattern(&args.pattern)
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }
    output::print_info(&format!("Found {} structure files", files.len()));

    // 批量模式下 --output 是目录，格式无法从扩展名推断
    let format = args.format.unwrap_or(OutputFormat::Png);
    require_figure_format(format, "atoms")?;

    fs::create_dir_all(&args.output).map_err(|e| EmPlotError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let config = RenderConfig::from_args(args, format);
    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!("Using {} parallel jobs", runner.jobs()));

    let result = runner.run(&files, |file| {
        let target = args
            .output
            .join(batch_output_name(&args.input, file, format.extension()));
        process_batch_file(file, &target, &config, args.overwrite)
    })?;

    print_batch_summary(&result);
    if files.len() <= 20 {
        print_structure_table(&files);
    }
    Ok(())
}

/// 处理批量模式中的单个文件
fn process_batch_file(
    input: &Path,
    target: &Path,
    config: &RenderConfig,
    overwrite: bool,
) -> ProcessResult {
    if target.exists() && !overwrite {
        return ProcessResult::Skipped(target.to_path_buf());
    }

    let rendered = parsers::parse_structure_file(input)
        .and_then(|atoms| config.render(&atoms, target));

    match rendered {
        Ok(()) => ProcessResult::Success(target.to_path_buf()),
        Err(e) => ProcessResult::Failed(input.to_path_buf(), e.to_string()),
    }
}

/// 批量输出文件名：相对输入目录的路径用 `_` 连接，避免递归模式下重名
fn batch_output_name(root: &Path, file: &Path, extension: &str) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let parent: Vec<String> = relative
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "structure".to_string());

    let mut parts = parent;
    parts.push(stem);
    format!("{}_atoms.{}", parts.join("_"), extension)
}

fn print_batch_summary(result: &BatchResult) {
    output::print_done(&format!(
        "Batch complete: {} files, {} success, {} skipped, {} failed",
        result.total(),
        result.success,
        result.skipped,
        result.failed()
    ));

    if result.skipped > 0 {
        output::print_skip(&format!(
            "{} outputs already existed (use --overwrite to replace)",
            result.skipped
        ));
    }

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path.display(), err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }
}

/// 打印结构概要表（读取失败的文件不列出）
fn print_structure_table(files: &[PathBuf]) {
    #[derive(Tabled)]
    struct StructureRow {
        #[tabled(rename = "File")]
        file: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Formula")]
        formula: String,
        #[tabled(rename = "Atoms")]
        atoms: usize,
    }

    let rows: Vec<StructureRow> = files
        .iter()
        .filter_map(|path| {
            let atoms = parsers::parse_structure_file(path).ok()?;
            Some(StructureRow {
                file: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                name: atoms.name.clone(),
                formula: atoms.formula(),
                atoms: atoms.len(),
            })
        })
        .collect();

    if !rows.is_empty() {
        println!("{}", Table::new(&rows));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_output_name_flat() {
        let root = Path::new("/data");
        assert_eq!(
            batch_output_name(root, Path::new("/data/POSCAR_001"), "png"),
            "POSCAR_001_atoms.png"
        );
        assert_eq!(
            batch_output_name(root, Path::new("/data/slab.vasp"), "svg"),
            "slab_atoms.svg"
        );
    }

    #[test]
    fn test_batch_output_name_nested() {
        let root = Path::new("/data");
        assert_eq!(
            batch_output_name(root, Path::new("/data/run1/relax/CONTCAR"), "png"),
            "run1_relax_CONTCAR_atoms.png"
        );
    }

    #[test]
    fn test_process_batch_file_skips_existing_output() {
        let dir = std::env::temp_dir().join("emplot_atoms_skip_test");
        fs::create_dir_all(&dir).unwrap();
        let target = dir.join("existing.png");
        fs::write(&target, b"").unwrap();

        let config = RenderConfig {
            options: AtomsPlotOptions::default(),
            title: None,
            format: OutputFormat::Png,
            width: 100,
            height: 100,
        };
        let result = process_batch_file(&dir.join("POSCAR"), &target, &config, false);
        assert_eq!(result, ProcessResult::Skipped(target.clone()));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_process_batch_file_reports_parse_failure() {
        let dir = std::env::temp_dir().join("emplot_atoms_fail_test");
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("POSCAR");
        fs::write(&input, "broken\n").unwrap();

        let config = RenderConfig {
            options: AtomsPlotOptions::default(),
            title: None,
            format: OutputFormat::Png,
            width: 100,
            height: 100,
        };
        let result = process_batch_file(&input, &dir.join("out.png"), &config, true);
        assert!(matches!(result, ProcessResult::Failed(path, _) if path == input));

        fs::remove_dir_all(&dir).ok();
    }
}
