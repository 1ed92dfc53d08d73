//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `retrieve`: 按性质查询（可排序选择）
//! - `variant`: 取出指定 tilt 变体
//! - `filter`: 基于参考选择的去重过滤与导出
//! - `show`: 美化打印 JSON 或快照文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: retrieve, filter, show

pub mod filter;
pub mod retrieve;
pub mod show;

use crate::models::Ranking;
use clap::{Parser, Subcommand};

/// 数据集路径的环境变量
pub const DATASET_ENV: &str = "MATSIEVE_DATASET";

/// matsieve - DFT 材料数据查询与去重
#[derive(Parser, Debug)]
#[command(name = "matsieve")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Query, rank and de-duplicate nested DFT materials records", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Retrieve a property for each material, optionally ranked
    Retrieve(retrieve::RetrieveArgs),

    /// Extract one tilt variant plus chemical info for each material
    Variant(retrieve::VariantArgs),

    /// Filter out structures that duplicate a reference selection
    Filter(filter::FilterArgs),

    /// Pretty-print a JSON or snapshot file
    Show(show::ShowArgs),
}

/// 解析排序规则（min, max 或非负整数）
pub fn parse_ranking(input: &str) -> Result<Ranking, String> {
    input.parse::<Ranking>().map_err(|e| e.to_string())
}

/// 缩进参数转换：`--compact` 优先
pub fn indent_of(indent: usize, compact: bool) -> Option<usize> {
    if compact {
        None
    } else {
        Some(indent)
    }
}
