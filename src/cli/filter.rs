//! # filter 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/filter.rs`

use super::{parse_ranking, DATASET_ENV};
use crate::filter::{DEFAULT_PROPERTY, DEFAULT_STRUCTURE};
use crate::models::Ranking;
use clap::Args;
use std::path::PathBuf;

/// filter 子命令参数
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Path to the dataset JSON file
    #[arg(env = DATASET_ENV)]
    pub dataset: PathBuf,

    /// Property used for both reference selection and comparison
    #[arg(short, long, default_value = DEFAULT_PROPERTY)]
    pub property: String,

    /// Ranking rule that selects the reference variant
    #[arg(long, value_parser = parse_ranking, default_value = "max")]
    pub reference: Ranking,

    /// Comma-separated candidate rankings; each yields one output file
    #[arg(long, value_delimiter = ',', value_parser = parse_ranking, default_value = "2")]
    pub rankings: Vec<Ranking>,

    /// Relative tolerance for the duplicate test
    #[arg(long, default_value_t = 1e-2)]
    pub rtol: f64,

    /// Structure attached to each selected variant
    #[arg(short, long, default_value = DEFAULT_STRUCTURE)]
    pub structure: String,

    /// Do not attach any structure
    #[arg(long, default_value_t = false)]
    pub no_structure: bool,

    /// Directory for the exported JSON files (created if missing)
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Filename prefix for the exported JSON files
    #[arg(long, default_value = "non_duplicates")]
    pub prefix: String,

    /// JSON indentation width
    #[arg(long, default_value_t = 4)]
    pub indent: usize,

    /// Write compact JSON (overrides --indent)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Save the filter state (reference and results) as a snapshot
    #[arg(long)]
    pub save_state: Option<PathBuf>,
}
