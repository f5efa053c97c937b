//! # 统一错误处理模块
//!
//! 定义 emplot 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// emplot 统一错误类型
#[derive(Error, Debug)]
pub enum EmPlotError {
    // ─────────────────────────────────────────────────────────────
    // 绘图选项错误
    // ─────────────────────────────────────────────────────────────
    #[error("space must be \"real\" or \"fourier\" (got '{0}')")]
    InvalidSpace(String),

    #[error("scale must be \"log\" or \"linear\" (got '{0}')")]
    InvalidScale(String),

    #[error(
        "convert must be one of \"intensity\", \"amplitude\", \"phase\", \"real\" or \"imag\" (got '{0}')"
    )]
    InvalidConversion(String),

    #[error("Invalid plane '{0}': expected two distinct axes from x, y, z (e.g. \"xy\")")]
    InvalidPlane(String),

    // ─────────────────────────────────────────────────────────────
    // 数组错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid array shape: {0}")]
    InvalidShape(String),

    #[error("Index {index} out of range for stack of {len} slices")]
    IndexOutOfRange { index: usize, len: usize },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 渲染错误
    // ─────────────────────────────────────────────────────────────
    #[error("Plotting failed: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, EmPlotError>;
