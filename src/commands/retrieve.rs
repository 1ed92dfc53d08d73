//! # retrieve / variant 命令实现
//!
//! ## 功能
//! - 按性质查询每个材料的全部变体，或按排序规则选出单个变体
//! - 终端表格显示，或写出 JSON
//! - 可选写出 (formula, tilt, value) 扁平 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/retrieve.rs` 定义的参数
//! - 使用 `query/retriever.rs`, `storage/`
//! - 使用 `utils/output.rs`

use crate::cli::indent_of;
use crate::cli::retrieve::{selection_of, RetrieveArgs, VariantArgs};
use crate::error::{MatsieveError, Result};
use crate::models::{Dataset, RetrieveOptions, Retrieval, VARIANT_FIELD};
use crate::query::Retriever;
use crate::storage;
use crate::utils::{display, output};

use serde_json::Value;
use std::path::Path;
use tabled::{Table, Tabled};

/// 性质结果行
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct PropertyRow {
    #[tabled(rename = "Formula")]
    pub formula: String,
    #[tabled(rename = "Tilt")]
    pub tilt: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// 执行 retrieve 命令
pub fn execute(args: RetrieveArgs) -> Result<()> {
    output::print_header("Retrieving Material Properties");

    let dataset = super::load_dataset(&args.dataset)?;
    let retriever = Retriever::new(&dataset);

    let opts = RetrieveOptions::new()
        .selection(selection_of(&args.materials))
        .ranking(args.ranking)
        .structure(args.structure.clone())
        .polymorph_info(args.polymorph_info)
        .chemical_info(args.chem_info);

    if opts.ranking.is_none() && (opts.structure.is_some() || opts.polymorph_info) {
        output::print_warning("--structure and --polymorph-info only apply with --ranking");
    }

    let retrieval = retriever.retrieve(&args.property, &opts)?;
    output::print_info(&format!(
        "Retrieved '{}' for {} materials",
        args.property,
        retrieval.len()
    ));

    let rows = property_rows(&dataset, &retrieval, &args.property, opts.ranking.is_some())?;
    if rows.is_empty() {
        output::print_warning(&format!("Property '{}' not found", args.property));
    }

    if let Some(ref csv_path) = args.csv {
        save_rows_csv(&rows, csv_path)?;
        output::print_success(&format!("Table saved to '{}'", csv_path.display()));
    }

    match args.output {
        Some(ref path) => {
            storage::write_json(&retrieval, path, indent_of(args.indent, args.compact))?;
            output::print_success(&format!("Result saved to '{}'", path.display()));
        }
        None => println!("{}", Table::new(&rows)),
    }

    Ok(())
}

/// 执行 variant 命令
pub fn execute_variant(args: VariantArgs) -> Result<()> {
    output::print_header("Retrieving Tilt Variant");

    let dataset = super::load_dataset(&args.dataset)?;
    let retrieval =
        Retriever::new(&dataset).retrieve_variant(args.tilt, &selection_of(&args.materials))?;

    match args.output {
        Some(ref path) => {
            storage::write_json(&retrieval, path, indent_of(args.indent, args.compact))?;
            output::print_success(&format!("Result saved to '{}'", path.display()));
        }
        None => display::display(&retrieval.to_value()),
    }

    Ok(())
}

/// 把查询结果展开为表格行
///
/// 排序结果每个材料一行；未排序结果每个变体一行（跳过合并进来的化学信息字段）。
pub fn property_rows(
    dataset: &Dataset,
    retrieval: &Retrieval,
    property: &str,
    ranked: bool,
) -> Result<Vec<PropertyRow>> {
    let mut rows = Vec::new();

    for (formula, record) in retrieval {
        if ranked {
            let tilt = record
                .get(VARIANT_FIELD)
                .and_then(Value::as_str)
                .unwrap_or("-");
            rows.push(PropertyRow {
                formula: formula.clone(),
                tilt: tilt.to_string(),
                value: record.get(property).map(format_value).unwrap_or_default(),
            });
            continue;
        }

        let variants = dataset.results(formula)?;
        if let Some(map) = record.as_object() {
            for (variant, value) in map.iter().filter(|(k, _)| variants.contains_key(*k)) {
                rows.push(PropertyRow {
                    formula: formula.clone(),
                    tilt: variant.clone(),
                    value: format_value(value),
                });
            }
        }
    }

    Ok(rows)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 保存表格行到 CSV
fn save_rows_csv(rows: &[PropertyRow], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["formula", "tilt", "value"])?;
    for row in rows {
        wtr.write_record([&row.formula, &row.tilt, &row.value])?;
    }

    wtr.flush().map_err(|e| MatsieveError::FileWrite {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ranking;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> Dataset {
        Dataset::from_value(json!({
            "BaTiO3": {
                "results": {
                    "0_tilt": { "FE_at": -2.0 },
                    "1_tilt": { "FE_at": -1.5 }
                },
                "A_site": "Ba"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_rows_unranked_skip_chemical_info() {
        let dataset = sample();
        let retrieval = Retriever::new(&dataset)
            .retrieve("FE_at", &RetrieveOptions::new().chemical_info(true))
            .unwrap();
        let rows = property_rows(&dataset, &retrieval, "FE_at", false).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].tilt, "1_tilt");
        assert_eq!(rows[1].value, "-1.5");
    }

    #[test]
    fn test_rows_ranked() {
        let dataset = sample();
        let retrieval = Retriever::new(&dataset)
            .retrieve("FE_at", &RetrieveOptions::new().ranked(Ranking::Min))
            .unwrap();
        let rows = property_rows(&dataset, &retrieval, "FE_at", true).unwrap();
        assert_eq!(
            rows,
            vec![PropertyRow {
                formula: "BaTiO3".to_string(),
                tilt: "0_tilt".to_string(),
                value: "-2.0".to_string(),
            }]
        );
    }

    #[test]
    fn test_save_rows_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        let rows = vec![PropertyRow {
            formula: "BaTiO3".to_string(),
            tilt: "0_tilt".to_string(),
            value: "-2.0".to_string(),
        }];
        save_rows_csv(&rows, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "formula,tilt,value\nBaTiO3,0_tilt,-2.0\n");
    }
}
