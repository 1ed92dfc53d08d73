//! # 查询结果模型
//!
//! `Retrieval` 是化学式 → 结果记录的有序映射，序列化时即为普通 JSON 对象。
//!
//! ## 依赖关系
//! - 由 `query/retriever.rs` 生成
//! - 被 `filter/` 与 `storage/` 使用

use crate::models::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 排序结果中记录选中变体键的字段名
pub const VARIANT_FIELD: &str = "tilt";

/// 查询结果（化学式 → 结果记录）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Retrieval {
    entries: Record,
}

impl Retrieval {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, formula: &str) -> Option<&Value> {
        self.entries.get(formula)
    }

    pub fn insert(&mut self, formula: impl Into<String>, record: Value) {
        self.entries.insert(formula.into(), record);
    }

    pub fn formulas(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }
}

impl<'a> IntoIterator for &'a Retrieval {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
