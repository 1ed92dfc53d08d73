//! # 数据美化打印
//!
//! 把任意 JSON 映射渲染为缩进的树状文本，或把数据集概括为表格，
//! 供交互式查看。不属于任何程序化接口。
//!
//! ```text
//! BaTiO3
//!   results
//!     0_tilt
//!       FE_at: -2.31
//!   A_site: "Ba"
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/show.rs` 使用
//! - 使用 `tabled` 生成表格

use crate::error::Result;
use crate::models::Dataset;

use serde_json::Value;
use tabled::{Table, Tabled};

const INDENT: &str = "  ";

/// 渲染为树状文本
pub fn pretty(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(_) | Value::Array(_) => render(value, 0, &mut out),
        scalar => {
            out.push_str(&inline(scalar));
            out.push('\n');
        }
    }
    out
}

/// 打印到标准输出
pub fn display(value: &Value) {
    print!("{}", pretty(value));
}

fn render(value: &Value, depth: usize, out: &mut String) {
    let pad = INDENT.repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if is_leaf(child) {
                    out.push_str(&format!("{}{}: {}\n", pad, key, inline(child)));
                } else {
                    out.push_str(&format!("{}{}\n", pad, key));
                    render(child, depth + 1, out);
                }
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                if is_leaf(child) {
                    out.push_str(&format!("{}[{}] {}\n", pad, i, inline(child)));
                } else {
                    out.push_str(&format!("{}[{}]\n", pad, i));
                    render(child, depth + 1, out);
                }
            }
        }
        scalar => out.push_str(&format!("{}{}\n", pad, inline(scalar))),
    }
}

/// 标量、空容器以及只含标量的数组在一行内显示
fn is_leaf(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.iter().all(|v| !v.is_object() && !v.is_array()),
        _ => true,
    }
}

fn inline(value: &Value) -> String {
    value.to_string()
}

/// 数据集概况行
#[derive(Debug, Clone, Tabled)]
pub struct MaterialSummary {
    #[tabled(rename = "Formula")]
    pub formula: String,
    #[tabled(rename = "Variants")]
    pub variants: usize,
    #[tabled(rename = "Chemical info")]
    pub chemical_fields: String,
}

/// 逐材料统计变体数与化学信息字段
pub fn summarize(dataset: &Dataset) -> Result<Vec<MaterialSummary>> {
    dataset
        .formulas()
        .map(|formula| {
            let variants = dataset.results(formula)?.len();
            let chemical = dataset.chemical_info(formula)?;
            Ok(MaterialSummary {
                formula: formula.to_string(),
                variants,
                chemical_fields: chemical.keys().cloned().collect::<Vec<_>>().join(", "),
            })
        })
        .collect()
}

/// 数据集概况表
pub fn summary_table(dataset: &Dataset) -> Result<String> {
    Ok(Table::new(summarize(dataset)?).to_string())
}
