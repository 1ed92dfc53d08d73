//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `query/`, `filter/`, `storage/`, `utils/`
//! - 子模块: retrieve, filter, show

pub mod filter;
pub mod retrieve;
pub mod show;

use crate::cli::Commands;
use crate::error::Result;
use crate::models::Dataset;
use crate::storage;
use crate::utils::{output, progress};

use std::path::Path;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Retrieve(args) => retrieve::execute(args),
        Commands::Variant(args) => retrieve::execute_variant(args),
        Commands::Filter(args) => filter::execute(args),
        Commands::Show(args) => show::execute(args),
    }
}

/// 加载数据集（带 spinner）
pub(crate) fn load_dataset(path: &Path) -> Result<Dataset> {
    let spinner = progress::create_spinner(&format!("Loading '{}'", path.display()));
    let dataset = storage::read_dataset(path);
    spinner.finish_and_clear();

    let dataset = dataset?;
    output::print_info(&format!(
        "Loaded {} materials from '{}'",
        dataset.len(),
        path.display()
    ));
    Ok(dataset)
}
