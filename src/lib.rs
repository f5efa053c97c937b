//! # emplot - 电子显微模拟诊断绘图
//!
//! 原子结构投影、衬度传递函数（CTF）、波函数剖面/图像和复数场域着色。
//! 绘图函数写入后端无关的 `plot::Axes`，由 `plot::render` 输出 PNG/SVG。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   └── commands/   (命令执行逻辑)
//!         ├── parsers/   (POSCAR 解析)
//!         ├── transfer/  (像差、包络、CTF、探针)
//!         ├── plot/      (Axes 与各绘图函数、渲染、导出)
//!         ├── batch/     (批量收集与并行执行)
//!         └── models/    (原子、网格、波函数)
//!   ├── utils/      (终端输出、进度条)
//!   └── error.rs    (错误处理)
//! ```

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod fft;
pub mod models;
pub mod parsers;
pub mod plot;
pub mod transfer;
pub mod utils;

pub use error::{EmPlotError, Result};
