//! # 非重复集合导出
//!
//! 单个集合写成 `{prefix}.json`；多个集合写成 `{prefix}_00.json`,
//! `{prefix}_01.json`, ...，顺序与序列一致。
//!
//! ## 依赖关系
//! - 被 `filter/duplicate.rs` 和 `commands/filter.rs` 调用
//! - 使用 `storage/json.rs` 写出文件

use crate::error::Result;
use crate::models::Retrieval;
use crate::storage;

use std::path::{Path, PathBuf};
use tracing::debug;

/// 默认 JSON 缩进
pub const DEFAULT_INDENT: usize = 4;

/// 第 `index` 个集合的文件名
pub fn export_file_name(prefix: &str, index: usize, single: bool) -> String {
    if single {
        format!("{}.json", prefix)
    } else {
        format!("{}_{:02}.json", prefix, index)
    }
}

/// 依次写出集合序列，返回已写出的文件路径
///
/// 某个文件写入失败时立即返回，已写出的文件保留。
pub fn export_sets(
    sets: &[Retrieval],
    dir: &Path,
    prefix: &str,
    indent: Option<usize>,
) -> Result<Vec<PathBuf>> {
    let single = sets.len() == 1;
    let mut written = Vec::with_capacity(sets.len());

    for (index, set) in sets.iter().enumerate() {
        let path = dir.join(export_file_name(prefix, index, single));
        storage::write_json(set, &path, indent)?;
        debug!(path = %path.display(), materials = set.len(), "exported set");
        written.push(path);
    }

    Ok(written)
}
