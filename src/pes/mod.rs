//! # PES 模块
//!
//! 反应路径相对能量表的数据模型、组装与绘图。
//!
//! ## 子模块
//! - `model`: PesSpec, PesTable 等数据结构
//! - `assembler`: 相对能量、布居与 ee
//! - `plot`: qh-ΔG 能量剖面图
//!
//! ## 依赖关系
//! - 被 `commands/pes.rs` 使用
//! - 使用 `thermo/boltzmann.rs`

pub mod assembler;
pub mod model;
pub mod plot;

pub use assembler::assemble;
pub use model::PesTable;
