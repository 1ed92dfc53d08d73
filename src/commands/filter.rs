//! # filter 命令实现
//!
//! ## 功能
//! - 按参考排序规则选出每个材料的参考变体
//! - 对每个候选排序位置筛出非重复材料
//! - 导出 JSON，可选保存过滤器快照
//!
//! ## 依赖关系
//! - 使用 `cli/filter.rs` 定义的参数
//! - 使用 `filter/`, `storage/`
//! - 使用 `utils/output.rs`

use crate::cli::filter::FilterArgs;
use crate::cli::indent_of;
use crate::error::{MatsieveError, Result};
use crate::filter::{DuplicateFilter, FilterOptions, ReferenceOptions};
use crate::storage::{self, Snapshot};
use crate::utils::output;

use std::fs;
use tabled::{Table, Tabled};

/// 每个候选排序位置的统计行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Ranking")]
    ranking: String,
    #[tabled(rename = "Non-duplicates")]
    kept: usize,
    #[tabled(rename = "Materials")]
    materials: String,
}

/// 执行 filter 命令
pub fn execute(args: FilterArgs) -> Result<()> {
    output::print_header("Filtering Duplicate Structures");

    let dataset = super::load_dataset(&args.dataset)?;
    let mut filter = DuplicateFilter::new(&dataset);

    let structure = if args.no_structure {
        None
    } else {
        Some(args.structure.clone())
    };
    let reference_opts = ReferenceOptions::default()
        .property(&args.property)
        .ranking(args.reference)
        .structure(structure);
    let reference = filter.select_reference(&reference_opts)?;
    output::print_info(&format!(
        "Reference: '{}' ranked by {} for {} materials",
        args.property,
        args.reference,
        reference.len()
    ));

    let opts = FilterOptions::default()
        .rankings(args.rankings.iter().copied())
        .relative_tolerance(args.rtol);
    let sets = filter.filter_duplicates(opts)?;

    let rows: Vec<SummaryRow> = args
        .rankings
        .iter()
        .zip(sets)
        .map(|(ranking, set)| SummaryRow {
            ranking: ranking.to_string(),
            kept: set.len(),
            materials: set.formulas().collect::<Vec<_>>().join(", "),
        })
        .collect();
    println!("{}", Table::new(&rows));

    fs::create_dir_all(&args.output_dir).map_err(|e| MatsieveError::FileWrite {
        path: args.output_dir.display().to_string(),
        source: e,
    })?;

    let written = filter.export(
        &args.output_dir,
        &args.prefix,
        indent_of(args.indent, args.compact),
    )?;
    for (path, set) in written.iter().zip(filter.non_duplicates()) {
        output::print_export(path, set.len());
    }

    if let Some(ref state_path) = args.save_state {
        storage::save_snapshot(&Snapshot::FilterState(filter.state()), state_path)?;
        output::print_success(&format!("Filter state saved to '{}'", state_path.display()));
    }

    output::print_done(&format!(
        "Exported {} non-duplicate set(s) to '{}'",
        written.len(),
        args.output_dir.display()
    ));

    Ok(())
}
