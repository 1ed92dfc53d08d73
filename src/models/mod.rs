//! # 数据模型模块
//!
//! 定义嵌套材料数据集、查询选项与查询结果的数据模型。
//!
//! ## 依赖关系
//! - 被 `query/`, `filter/`, `storage/` 和 `commands/` 使用
//! - 子模块: dataset, options, retrieval

pub mod dataset;
pub mod options;
pub mod retrieval;

pub use dataset::{Dataset, Record, RESULTS_KEY};
pub use options::{MaterialSelection, Ranking, RetrieveOptions};
pub use retrieval::{Retrieval, VARIANT_FIELD};
