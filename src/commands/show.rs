//! # show 命令实现
//!
//! 美化打印 JSON 文件或快照；可只显示单个条目，或输出数据集概况表。
//!
//! ## 依赖关系
//! - 使用 `cli/show.rs` 定义的参数
//! - 使用 `storage/`, `utils/display.rs`

use crate::cli::show::ShowArgs;
use crate::error::{MatsieveError, Result};
use crate::models::Dataset;
use crate::storage::{self, snapshot};
use crate::utils::{display, output};

use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// 执行 show 命令
pub fn execute(args: ShowArgs) -> Result<()> {
    let value = load_any(&args.file)?;

    let value = match args.material {
        Some(ref formula) => {
            let entry = value
                .get(formula)
                .cloned()
                .ok_or_else(|| MatsieveError::MissingMaterial(formula.clone()))?;
            let mut single = Map::new();
            single.insert(formula.clone(), entry);
            Value::Object(single)
        }
        None => value,
    };

    if args.summary {
        let dataset = Dataset::from_value(value)?;
        output::print_header(&format!("{} materials", dataset.len()));
        println!("{}", display::summary_table(&dataset)?);
    } else {
        display::display(&value);
    }

    Ok(())
}

/// 读取 JSON 或快照文件
fn load_any(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).map_err(|e| MatsieveError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    if snapshot::is_snapshot(&bytes) {
        let snap = snapshot::decode_snapshot(&bytes, path)?;
        output::print_info(&format!("Snapshot of {}", snap.kind()));
        snap.to_value()
    } else {
        storage::parse_json(&bytes, path)
    }
}
