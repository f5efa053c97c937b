//! # 批量执行器
//!
//! 在 rayon 线程池中并行处理文件列表，并汇总每个文件的结果。
//!
//! ## 功能
//! - 线程数默认取 CPU 核数
//! - indicatif 进度条
//! - 失败不中断其他文件，最后汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/atoms.rs` 的批量模式调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{EmPlotError, Result};
use crate::utils::progress;

use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 单个文件的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    /// 已生成输出文件
    Success(PathBuf),
    /// 输出已存在且未要求覆盖
    Skipped(PathBuf),
    /// (输入文件, 错误信息)
    Failed(PathBuf, String),
}

/// 批量处理汇总
#[derive(Debug, Default)]
pub struct BatchResult {
    pub success: usize,
    pub skipped: usize,
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchResult {
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Skipped(_) => self.skipped += 1,
            ProcessResult::Failed(path, err) => self.failures.push((path, err)),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed()
    }
}

impl FromIterator<ProcessResult> for BatchResult {
    fn from_iter<I: IntoIterator<Item = ProcessResult>>(iter: I) -> Self {
        let mut summary = BatchResult::default();
        for result in iter {
            summary.merge(result);
        }
        summary
    }
}

/// 批量执行器
pub struct BatchRunner {
    jobs: usize,
    show_progress: bool,
}

impl BatchRunner {
    /// jobs 为 0 时使用全部 CPU 核
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理文件列表
    pub fn run<F>(&self, files: &[PathBuf], processor: F) -> Result<BatchResult>
    where
        F: Fn(&Path) -> ProcessResult + Sync + Send,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| EmPlotError::Other(format!("failed to start thread pool: {}", e)))?;

        let pb = if self.show_progress {
            progress::create_progress_bar(files.len() as u64, "Rendering")
        } else {
            indicatif::ProgressBar::hidden()
        };

        let summary = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let result = processor(file.as_path());
                    pb.inc(1);
                    result
                })
                .collect::<Vec<_>>()
                .into_iter()
                .collect::<BatchResult>()
        });

        pb.finish_and_clear();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_collects_all_outcomes() {
        let files: Vec<PathBuf> = (0..12).map(|i| PathBuf::from(format!("POSCAR_{}", i))).collect();
        let runner = BatchRunner::new(3).with_progress(false);

        let summary = runner
            .run(&files, |path| {
                let name = path.display().to_string();
                if name.ends_with('0') {
                    ProcessResult::Failed(path.to_path_buf(), "bad file".to_string())
                } else if name.ends_with('1') {
                    ProcessResult::Skipped(path.to_path_buf())
                } else {
                    ProcessResult::Success(path.with_extension("png"))
                }
            })
            .unwrap();

        // _0, _10 失败；_1, _11 跳过
        assert_eq!(summary.total(), 12);
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.success, 8);
    }

    #[test]
    fn test_zero_jobs_uses_all_cores() {
        assert_eq!(BatchRunner::new(0).jobs(), num_cpus::get());
    }
}
