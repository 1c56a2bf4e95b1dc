//! # 批量处理模块
//!
//! 收集输出文件并并行完成解析与热化学计算。
//!
//! ## 功能
//! - 自动检测输入类型（文件/目录/通配符）
//! - 收集匹配文件列表
//! - 并行处理，结果保持输入顺序
//!
//! ## 依赖关系
//! - 被 `commands/pipeline.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::{single_point_path, FileCollector};
pub use runner::{BatchRunner, ProcessResult};
