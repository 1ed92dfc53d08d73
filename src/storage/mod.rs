//! # 存储模块
//!
//! 数据集与查询结果的文件读写。
//!
//! ## 依赖关系
//! - 被 `filter/export.rs` 和 `commands/` 使用
//! - 子模块: json, snapshot

pub mod json;
pub mod snapshot;

pub use json::{parse_json, read_dataset, read_json, to_json_string, write_json};
pub use snapshot::{load_snapshot, save_snapshot, Snapshot, SnapshotKind};
