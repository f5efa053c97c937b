//! # emplot 命令行入口
//!
//! ## 子命令
//! - `atoms` - 原子结构投影图（单文件或批量目录）
//! - `ctf`   - CTF 与包络曲线
//! - `probe` - 会聚探针图像、剖面或域着色

use clap::Parser;
use emplot::cli::Cli;
use emplot::utils::output;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = emplot::commands::run(cli.command) {
        output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
