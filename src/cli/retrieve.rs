//! # retrieve / variant 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/retrieve.rs`

use super::{parse_ranking, DATASET_ENV};
use crate::models::{MaterialSelection, Ranking};
use clap::Args;
use std::path::PathBuf;

/// retrieve 子命令参数
#[derive(Args, Debug)]
pub struct RetrieveArgs {
    /// Path to the dataset JSON file
    #[arg(env = DATASET_ENV)]
    pub dataset: PathBuf,

    /// Name of the property to retrieve (searched at any depth inside each variant)
    #[arg(short, long)]
    pub property: String,

    /// Comma-separated material formulas (default: all materials)
    #[arg(short, long, value_delimiter = ',')]
    pub materials: Vec<String>,

    /// Ranking rule: 'min', 'max' or a non-negative position in ascending order
    #[arg(short, long, value_parser = parse_ranking)]
    pub ranking: Option<Ranking>,

    /// Structure to attach to the selected variant (dotted path allowed)
    #[arg(short, long)]
    pub structure: Option<String>,

    /// Return the whole selected variant record
    #[arg(long, default_value_t = false)]
    pub polymorph_info: bool,

    /// Merge the material's chemical information fields
    #[arg(long, default_value_t = false)]
    pub chem_info: bool,

    /// Write the result to a JSON file instead of printing a table
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write a flat (formula, tilt, value) CSV table
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// JSON indentation width
    #[arg(long, default_value_t = 4)]
    pub indent: usize,

    /// Write compact JSON (overrides --indent)
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

/// variant 子命令参数
#[derive(Args, Debug)]
pub struct VariantArgs {
    /// Path to the dataset JSON file
    #[arg(env = DATASET_ENV)]
    pub dataset: PathBuf,

    /// Tilt number; selects the '<N>_tilt' variant
    #[arg(short, long)]
    pub tilt: usize,

    /// Comma-separated material formulas (default: all materials)
    #[arg(short, long, value_delimiter = ',')]
    pub materials: Vec<String>,

    /// Write the result to a JSON file instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON indentation width
    #[arg(long, default_value_t = 4)]
    pub indent: usize,

    /// Write compact JSON (overrides --indent)
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

/// 空列表表示全部材料
pub fn selection_of(materials: &[String]) -> MaterialSelection {
    if materials.is_empty() {
        MaterialSelection::All
    } else {
        MaterialSelection::Only(materials.to_vec())
    }
}
