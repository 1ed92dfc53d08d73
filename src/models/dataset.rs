//! # 材料数据集模型
//!
//! 数据集是一个 JSON 对象：化学式 → 材料记录。材料记录包含 `results`
//! 子映射（tilt 变体键 → 变体记录）以及若干与变体无关的化学信息字段。
//!
//! ```text
//! {
//!   "BaTiO3": {
//!     "results": {
//!       "0_tilt": { "dft_structure": {...}, "FE_at": -2.31 },
//!       "1_tilt": { ... }
//!     },
//!     "A_site": "Ba", "B_site": "Ti"
//!   }
//! }
//! ```
//!
//! ## 依赖关系
//! - 被 `query/retriever.rs` 和 `storage/` 使用
//! - 使用 `serde_json`（开启 `preserve_order`，对象保持插入顺序）

use crate::error::{MatsieveError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON 对象（保持键的插入顺序）
pub type Record = Map<String, Value>;

/// 材料记录中存放变体结果的键
pub const RESULTS_KEY: &str = "results";

/// 材料数据集（化学式 → 材料记录）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    materials: Record,
}

impl Dataset {
    /// 从已解析的 JSON 值构建，顶层必须是对象
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(materials) => Ok(Dataset { materials }),
            other => Err(MatsieveError::MalformedInput(format!(
                "dataset must be a JSON object, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// 按插入顺序列出所有化学式
    pub fn formulas(&self) -> impl Iterator<Item = &str> + '_ {
        self.materials.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// 获取某个材料的完整记录
    pub fn material(&self, formula: &str) -> Result<&Record> {
        let value = self
            .materials
            .get(formula)
            .ok_or_else(|| MatsieveError::MissingMaterial(formula.to_string()))?;

        value.as_object().ok_or_else(|| {
            MatsieveError::MalformedInput(format!(
                "material {} must be a JSON object, found {}",
                formula,
                value_kind(value)
            ))
        })
    }

    /// 获取某个材料的 `results` 子映射
    pub fn results(&self, formula: &str) -> Result<&Record> {
        let material = self.material(formula)?;
        match material.get(RESULTS_KEY) {
            Some(Value::Object(results)) => Ok(results),
            Some(other) => Err(MatsieveError::MalformedInput(format!(
                "{}.{} must be a JSON object, found {}",
                formula,
                RESULTS_KEY,
                value_kind(other)
            ))),
            None => Err(MatsieveError::MalformedInput(format!(
                "material {} has no '{}' entry",
                formula, RESULTS_KEY
            ))),
        }
    }

    /// 化学信息：材料记录中除 `results` 以外的所有字段
    pub fn chemical_info(&self, formula: &str) -> Result<Record> {
        let material = self.material(formula)?;
        Ok(material
            .iter()
            .filter(|(key, _)| key.as_str() != RESULTS_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

/// JSON 值类型名称（用于错误信息）
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
