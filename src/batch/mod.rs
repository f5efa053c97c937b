//! # 批量处理模块
//!
//! 目录输入时批量绘制结构文件。
//!
//! ## 功能
//! - 收集匹配的结构文件
//! - 并行渲染
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/atoms.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchResult, BatchRunner, ProcessResult};
