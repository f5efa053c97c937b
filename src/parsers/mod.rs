//! # 解析器模块
//!
//! 提供结构文件解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar

pub mod poscar;

use crate::error::{EmPlotError, Result};
use crate::models::Atoms;
use std::path::Path;

/// 文件是否为可识别的结构文件
pub fn is_structure_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    if ext == "vasp" || ext == "poscar" {
        return true;
    }

    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with("POSCAR") || name.starts_with("CONTCAR"))
}

/// 从文件路径推断格式并解析
pub fn parse_structure_file(path: &Path) -> Result<Atoms> {
    if is_structure_file(path) {
        poscar::parse_poscar_file(path)
    } else {
        Err(EmPlotError::UnsupportedFormat(format!(
            "Cannot determine format for: {}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_structure_file() {
        assert!(is_structure_file(Path::new("runs/POSCAR")));
        assert!(is_structure_file(Path::new("CONTCAR_relaxed")));
        assert!(is_structure_file(Path::new("graphene.vasp")));
        assert!(!is_structure_file(Path::new("graphene.cif")));
        assert!(!is_structure_file(Path::new("OUTCAR")));
    }

    #[test]
    fn test_unsupported_format() {
        assert!(matches!(
            parse_structure_file(Path::new("model.xyz")),
            Err(EmPlotError::UnsupportedFormat(_))
        ));
    }
}
