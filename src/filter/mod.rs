//! # 去重过滤模块
//!
//! 以参考选择（如每个材料形成能最高的变体）为基准，检查其他排序位置的
//! 变体是否与参考在相对容差内相等，保留“非重复”材料并导出。
//!
//! ## 依赖关系
//! - 使用 `query/` 的 Retriever
//! - 使用 `storage/` 写出 JSON
//! - 子模块: duplicate, export

pub mod duplicate;
pub mod export;

pub use duplicate::{
    approx_eq, non_duplicates, DuplicateFilter, FilterOptions, FilterState, ReferenceOptions,
    DEFAULT_PROPERTY, DEFAULT_RTOL, DEFAULT_STRUCTURE,
};
pub use export::{export_file_name, export_sets, DEFAULT_INDENT};
