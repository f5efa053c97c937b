//! # 电子光学传递模块
//!
//! 提供衬度传递函数 (CTF) 的参数和各分量的计算。
//!
//! ## 子模块
//! - `aberrations`: 极坐标像差系数与像差相位因子
//! - `envelopes`: 光阑与各类包络函数
//! - `ctf`: CTF 参数对象
//! - `probe`: 延迟构建的会聚探针波函数
//!
//! ## 依赖关系
//! - 被 `plot/ctf.rs` 使用
//! - 被 `commands/ctf.rs`、`commands/probe.rs` 调用

pub mod aberrations;
pub mod ctf;
pub mod envelopes;
pub mod probe;

pub use aberrations::{PolarParameters, PolarSymbol};
pub use ctf::{energy2wavelength, Ctf, CtfComponents};
pub use probe::Probe;
