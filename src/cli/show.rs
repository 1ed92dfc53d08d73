//! # show 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/show.rs`

use clap::Args;
use std::path::PathBuf;

/// show 子命令参数
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// JSON file or snapshot to display
    pub file: PathBuf,

    /// Only display this top-level entry
    #[arg(short, long)]
    pub material: Option<String>,

    /// Print a per-material summary table instead of the full tree
    #[arg(long, default_value_t = false)]
    pub summary: bool,
}
