//! # 统一错误处理模块
//!
//! 定义 matsieve 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// matsieve 统一错误类型
#[derive(Error, Debug)]
pub enum MatsieveError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 输入格式错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed JSON in {path}\nReason: {reason}")]
    Json { path: String, reason: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Path '{path}' not found under {formula}/{variant}")]
    MissingPath {
        formula: String,
        variant: String,
        path: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 查询错误
    // ─────────────────────────────────────────────────────────────
    #[error("Material not found in dataset: {0}")]
    MissingMaterial(String),

    #[error("Unsupported ranking '{0}' (expected 'min', 'max' or a non-negative integer)")]
    UnsupportedRanking(String),

    #[error("Ranking position {index} out of range for {formula} ({len} candidates)")]
    IndexOutOfRange {
        formula: String,
        index: usize,
        len: usize,
    },

    #[error("Property '{property}' occurs {count} times inside {formula}/{variant}: {paths}")]
    DuplicatePropertyInVariant {
        formula: String,
        variant: String,
        property: String,
        count: usize,
        /// 各命中的点路径，逗号分隔
        paths: String,
    },

    #[error("Property '{property}' not found for {formula}")]
    PropertyNotFound { formula: String, property: String },

    #[error("Property '{property}' of {formula}/{variant} is not numeric")]
    NonNumericProperty {
        formula: String,
        variant: String,
        property: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 去重过滤错误
    // ─────────────────────────────────────────────────────────────
    #[error("No reference selection; call select_reference first")]
    ReferenceNotSelected,

    #[error("Material {0} is present in only one of the reference and candidate sets")]
    MaterialMismatch(String),

    // ─────────────────────────────────────────────────────────────
    // 快照错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid snapshot file {path}: {reason}")]
    SnapshotFormat { path: String, reason: String },

    #[error("Snapshot encoding error: {0}")]
    Snapshot(#[from] bincode::Error),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, MatsieveError>;
