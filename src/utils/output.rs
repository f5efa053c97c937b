//! # 终端输出工具
//!
//! 命令层统一的带状态标签彩色输出；库代码不直接打印。
//! 错误写 stderr，其余写 stdout。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块和 `main.rs` 使用
//! - 使用 `colored` crate

use colored::{ColoredString, Colorize};
use std::path::Path;

/// 消息状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Error,
    Warning,
    Info,
    Skip,
    Done,
}

impl Status {
    fn tag(self) -> &'static str {
        match self {
            Status::Ok => "[OK]",
            Status::Error => "[ERR]",
            Status::Warning => "[WARN]",
            Status::Info => "[*]",
            Status::Skip => "[SKIP]",
            Status::Done => "[DONE]",
        }
    }

    fn styled(self) -> ColoredString {
        let tag = self.tag();
        match self {
            Status::Ok | Status::Done => tag.green().bold(),
            Status::Error => tag.red().bold(),
            Status::Warning => tag.yellow().bold(),
            Status::Info => tag.blue().bold(),
            Status::Skip => tag.dimmed(),
        }
    }
}

/// 按状态打印一行
pub fn print_status(status: Status, msg: &str) {
    if status == Status::Error {
        eprintln!("{} {}", status.styled(), msg);
    } else {
        println!("{} {}", status.styled(), msg);
    }
}

pub fn print_success(msg: &str) {
    print_status(Status::Ok, msg);
}

pub fn print_error(msg: &str) {
    print_status(Status::Error, msg);
}

pub fn print_warning(msg: &str) {
    print_status(Status::Warning, msg);
}

pub fn print_info(msg: &str) {
    print_status(Status::Info, msg);
}

pub fn print_skip(msg: &str) {
    print_status(Status::Skip, msg);
}

pub fn print_done(msg: &str) {
    print_status(Status::Done, msg);
}

/// 打印 "输入 -> 输出文件" 形式的成功消息
pub fn print_saved(input: &str, output: &Path) {
    let msg = format!(
        "{} {} {}",
        input.dimmed(),
        "->".cyan(),
        output.display()
    );
    print_status(Status::Ok, &msg);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let rule = "═".repeat(64);
    println!("\n{}\n  {}\n{}\n", rule.dimmed(), title.bold(), rule.dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tags_unique() {
        let all = [
            Status::Ok,
            Status::Error,
            Status::Warning,
            Status::Info,
            Status::Skip,
            Status::Done,
        ];
        let mut tags: Vec<&str> = all.iter().map(|s| s.tag()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), all.len());
    }
}
