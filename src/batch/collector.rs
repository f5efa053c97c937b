//! # 结构文件收集器
//!
//! 根据输入路径和模式收集待绘制的结构文件。
//!
//! ## 功能
//! - 单文件输入直接返回
//! - 目录输入按 glob 模式（`*`、`?`）匹配文件名
//! - 可选递归搜索，结果按路径排序
//!
//! ## 依赖关系
//! - 被 `commands/atoms.rs` 的批量模式调用
//! - 使用 `walkdir` 遍历目录

use crate::error::{EmPlotError, Result};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 默认匹配的结构文件名
pub const DEFAULT_PATTERNS: &str = "POSCAR*,CONTCAR*,*.vasp";

/// 结构文件收集器
pub struct FileCollector {
    input: PathBuf,
    patterns: Vec<String>,
    recursive: bool,
}

impl FileCollector {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            patterns: split_patterns(DEFAULT_PATTERNS),
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔），空模式保留默认值
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        let patterns = split_patterns(pattern);
        if !patterns.is_empty() {
            self.patterns = patterns;
        }
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }

        if !self.input.is_dir() {
            return Err(EmPlotError::FileNotFound {
                path: self.input.display().to_string(),
            });
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| e.into_path())
            .collect();

        files.sort();
        Ok(files)
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| self.patterns.iter().any(|p| glob_match(p, name)))
    }
}

fn split_patterns(pattern: &str) -> Vec<String> {
    pattern
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// 简单 glob 匹配（支持 * 和 ? 通配符）
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.as_bytes();
    let text = text.as_bytes();

    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(b'*') => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(&c) if c == b'?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    t = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}
