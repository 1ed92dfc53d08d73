//! # 查询模块
//!
//! 在嵌套材料数据上按性质名查找、排序并整理结果。
//!
//! ## 依赖关系
//! - 被 `filter/` 和 `commands/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: lookup, ranking, retriever

pub mod lookup;
pub mod ranking;
pub mod retriever;

pub use retriever::{variant_key, Retriever};
