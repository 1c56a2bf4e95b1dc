//! # 统一错误处理模块
//!
//! 定义 qhthermo 的所有错误类型，使用 `thiserror` 派生。
//! 可恢复的异常（缺失热化学数据、线性分子警告）不走这里，
//! 而是以 `ThermoWarning` 的形式附在结果上。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// qhthermo 统一错误类型
#[derive(Error, Debug)]
pub enum ThermoError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
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

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid PES file {path}: {reason}")]
    PesFormat { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误（致命，终止整个运行）
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown quasi-harmonic model '{0}' specified (must be grimme or truhlar)")]
    UnknownQhMethod(String),

    #[error("Unknown solvent '{0}' (choose from none, H2O, toluene, DMF, AcOH, chloroform)")]
    UnknownSolvent(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid temperature interval: {0}")]
    InvalidInterval(String),

    // ─────────────────────────────────────────────────────────────
    // PES 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Structure '{structure}' has not been defined correctly as energy-zero; make sure it matches one of the SPECIES with thermochemistry data")]
    MissingZeroReference { structure: String },

    // ─────────────────────────────────────────────────────────────
    // CSV / 绘图错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot error: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ThermoError>;
