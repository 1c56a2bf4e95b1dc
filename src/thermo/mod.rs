//! # 热化学计算模块
//!
//! 准谐振子热化学引擎、溶剂自由空间模型与 Boltzmann 加权。
//!
//! ## 依赖关系
//! - 被 `commands/`, `pes/` 使用
//! - 子模块: constants, solvent, engine, boltzmann

pub mod boltzmann;
pub mod constants;
pub mod engine;
pub mod solvent;

pub use boltzmann::{boltzmann_weights, summarize_clusters, ClusterSummary};
pub use engine::evaluate;
pub use solvent::Solvent;
