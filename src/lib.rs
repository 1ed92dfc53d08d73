//! # matsieve - DFT 材料数据查询与去重
//!
//! 在按化学式索引、按 tilt 变体展开的嵌套材料数据上做性质查询、
//! 排序选择，并基于参考选择筛出“非重复”结构。
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── models/   (Dataset, Retrieval, Ranking 等数据模型)
//!   ├── query/    (Retriever: 深度查找与排序选择)
//!   ├── filter/   (DuplicateFilter: 基于参考的容差去重)
//!   ├── storage/  (JSON 读写、快照持久化)
//!   ├── utils/    (终端输出、进度、美化打印)
//!   └── error.rs  (错误处理)
//! ```
//! `cli/` 与 `commands/` 只服务于 `matsieve` 可执行文件。

pub mod cli;
pub mod commands;
pub mod error;
pub mod filter;
pub mod models;
pub mod query;
pub mod storage;
pub mod utils;

pub use error::{MatsieveError, Result};
pub use filter::{export_sets, DuplicateFilter, FilterOptions, FilterState, ReferenceOptions};
pub use models::{Dataset, MaterialSelection, Ranking, Record, RetrieveOptions, Retrieval};
pub use query::Retriever;
