//! # 数据模型模块
//!
//! 定义计算记录、运行参数与热化学结果。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `thermo/`, `pes/`, `commands/` 使用
//! - 子模块: record, options, thermo

pub mod options;
pub mod record;
pub mod thermo;

pub use options::{EnergyUnit, QhMethod, RunOptions};
pub use record::{CalculationRecord, CpuTime, RotationalTemperatures};
pub use thermo::{EnergyProfile, ThermoResult, ThermoWarning};
