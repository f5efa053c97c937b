//! # 数据模型模块
//!
//! 定义原子结构、元素数据表和波函数容器。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`transfer/` 和 `plot/` 使用
//! - 子模块: structure, elements, waves

pub mod elements;
pub mod structure;
pub mod waves;

pub use structure::{Atoms, Lattice};
pub use waves::{BuildWaves, FieldArray, Grid, WaveSource, Waves};
