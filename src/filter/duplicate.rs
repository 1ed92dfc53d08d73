//! # 重复结构过滤
//!
//! 1. `select_reference`: 按排序规则为每个材料选出参考变体
//! 2. `filter_duplicates`: 对每个候选排序位置重新查询，按化学式与参考逐一比对，
//!    性质值超出相对容差的材料记为非重复
//! 3. `export`: 导出累计的非重复集合
//!
//! ## 依赖关系
//! - 使用 `query/retriever.rs`
//! - 使用 `filter/export.rs`
//! - 被 `commands/filter.rs` 和 `storage/snapshot.rs` 使用

use crate::error::{MatsieveError, Result};
use crate::filter::export::export_sets;
use crate::models::{Dataset, Ranking, RetrieveOptions, Retrieval, VARIANT_FIELD};
use crate::query::Retriever;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// 默认比较的性质（每原子形成能）
pub const DEFAULT_PROPERTY: &str = "FE_at";
/// 默认附带的结构
pub const DEFAULT_STRUCTURE: &str = "dft_structure";
/// 默认相对容差
pub const DEFAULT_RTOL: f64 = 1e-2;

/// 参考选择选项
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceOptions {
    pub property: String,
    pub ranking: Ranking,
    pub structure: Option<String>,
}

impl Default for ReferenceOptions {
    fn default() -> Self {
        ReferenceOptions {
            property: DEFAULT_PROPERTY.to_string(),
            ranking: Ranking::Max,
            structure: Some(DEFAULT_STRUCTURE.to_string()),
        }
    }
}

impl ReferenceOptions {
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }

    pub fn ranking(mut self, ranking: Ranking) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn structure(mut self, structure: Option<String>) -> Self {
        self.structure = structure;
        self
    }
}

/// 去重选项
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    /// 比较的性质，`None` 沿用参考选择的性质
    pub property: Option<String>,
    /// 候选排序位置，每个产生一个非重复集合
    pub rankings: Vec<Ranking>,
    pub relative_tolerance: f64,
    /// 附带的结构，`None` 沿用参考选择的结构
    pub structure: Option<String>,
    /// 追加到已有的集合序列之后
    pub previous: Vec<Retrieval>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            property: None,
            rankings: vec![Ranking::Position(2)],
            relative_tolerance: DEFAULT_RTOL,
            structure: None,
            previous: Vec::new(),
        }
    }
}

impl FilterOptions {
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    pub fn rankings(mut self, rankings: impl IntoIterator<Item = Ranking>) -> Self {
        self.rankings = rankings.into_iter().collect();
        self
    }

    pub fn relative_tolerance(mut self, rtol: f64) -> Self {
        self.relative_tolerance = rtol;
        self
    }

    pub fn structure(mut self, structure: impl Into<String>) -> Self {
        self.structure = Some(structure.into());
        self
    }

    pub fn with_previous(mut self, previous: Vec<Retrieval>) -> Self {
        self.previous = previous;
        self
    }
}

/// 过滤器可持久化的状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub property: Option<String>,
    pub structure: Option<String>,
    pub reference: Option<Retrieval>,
    pub non_duplicates: Vec<Retrieval>,
}

/// 重复结构过滤器
#[derive(Debug, Clone)]
pub struct DuplicateFilter<'a> {
    retriever: Retriever<'a>,
    property: Option<String>,
    structure: Option<String>,
    reference: Option<Retrieval>,
    non_duplicates: Vec<Retrieval>,
}

impl<'a> DuplicateFilter<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        DuplicateFilter {
            retriever: Retriever::new(dataset),
            property: None,
            structure: None,
            reference: None,
            non_duplicates: Vec::new(),
        }
    }

    /// 从快照状态恢复
    pub fn from_state(dataset: &'a Dataset, state: FilterState) -> Self {
        DuplicateFilter {
            retriever: Retriever::new(dataset),
            property: state.property,
            structure: state.structure,
            reference: state.reference,
            non_duplicates: state.non_duplicates,
        }
    }

    pub fn state(&self) -> FilterState {
        FilterState {
            property: self.property.clone(),
            structure: self.structure.clone(),
            reference: self.reference.clone(),
            non_duplicates: self.non_duplicates.clone(),
        }
    }

    pub fn reference(&self) -> Option<&Retrieval> {
        self.reference.as_ref()
    }

    pub fn non_duplicates(&self) -> &[Retrieval] {
        &self.non_duplicates
    }

    pub fn take_non_duplicates(&mut self) -> Vec<Retrieval> {
        std::mem::take(&mut self.non_duplicates)
    }

    /// 选出参考结构，并记住性质与结构名作为后续默认值
    pub fn select_reference(&mut self, opts: &ReferenceOptions) -> Result<&Retrieval> {
        let query = RetrieveOptions::new()
            .ranked(opts.ranking)
            .structure(opts.structure.clone());
        let reference = self.retriever.retrieve(&opts.property, &query)?;

        info!(
            property = %opts.property,
            ranking = %opts.ranking,
            materials = reference.len(),
            "selected reference"
        );

        self.property = Some(opts.property.clone());
        self.structure = opts.structure.clone();
        Ok(self.reference.insert(reference))
    }

    /// 对每个候选排序位置找出与参考不重复的材料
    ///
    /// 任一排序位置失败时不产生新集合；传入的已有序列保留在过滤器中。
    pub fn filter_duplicates(&mut self, opts: FilterOptions) -> Result<&[Retrieval]> {
        let FilterOptions {
            property,
            rankings,
            relative_tolerance,
            structure,
            mut previous,
        } = opts;

        let property = property
            .or_else(|| self.property.clone())
            .unwrap_or_else(|| DEFAULT_PROPERTY.to_string());
        let structure = structure.or_else(|| self.structure.clone());

        match self.distinct_sets(&property, &rankings, relative_tolerance, structure) {
            Ok(sets) => {
                previous.extend(sets);
                self.non_duplicates = previous;
                Ok(&self.non_duplicates)
            }
            Err(e) => {
                if !previous.is_empty() {
                    self.non_duplicates = previous;
                }
                Err(e)
            }
        }
    }

    fn distinct_sets(
        &self,
        property: &str,
        rankings: &[Ranking],
        rtol: f64,
        structure: Option<String>,
    ) -> Result<Vec<Retrieval>> {
        let reference = self
            .reference
            .as_ref()
            .ok_or(MatsieveError::ReferenceNotSelected)?;

        let mut sets = Vec::with_capacity(rankings.len());
        for &ranking in rankings {
            let query = RetrieveOptions::new()
                .ranked(ranking)
                .structure(structure.clone());
            let candidates = self.retriever.retrieve(property, &query)?;
            let distinct = non_duplicates(reference, &candidates, property, rtol)?;

            info!(
                %ranking,
                kept = distinct.len(),
                total = candidates.len(),
                "filtered duplicates"
            );
            sets.push(distinct);
        }
        Ok(sets)
    }

    /// 导出累计的非重复集合
    pub fn export(&self, dir: &Path, prefix: &str, indent: Option<usize>) -> Result<Vec<PathBuf>> {
        export_sets(&self.non_duplicates, dir, prefix, indent)
    }
}

/// 相对容差比较，无绝对容差下限
pub fn approx_eq(value: f64, reference: f64, rtol: f64) -> bool {
    (value - reference).abs() <= rtol * reference.abs()
}

/// 按化学式连接参考与候选集合，返回超出容差的候选记录（参考顺序）
pub fn non_duplicates(
    reference: &Retrieval,
    candidates: &Retrieval,
    property: &str,
    rtol: f64,
) -> Result<Retrieval> {
    if let Some(extra) = candidates.formulas().find(|f| reference.get(f).is_none()) {
        return Err(MatsieveError::MaterialMismatch(extra.to_string()));
    }

    let mut distinct = Retrieval::new();
    for (formula, reference_record) in reference {
        let candidate = candidates
            .get(formula)
            .ok_or_else(|| MatsieveError::MaterialMismatch(formula.clone()))?;

        let expected = numeric_property(formula, reference_record, property)?;
        let actual = numeric_property(formula, candidate, property)?;

        if !approx_eq(actual, expected, rtol) {
            distinct.insert(formula.clone(), candidate.clone());
        }
    }

    Ok(distinct)
}

fn numeric_property(formula: &str, record: &Value, property: &str) -> Result<f64> {
    let value = record
        .get(property)
        .ok_or_else(|| MatsieveError::PropertyNotFound {
            formula: formula.to_string(),
            property: property.to_string(),
        })?;

    value
        .as_f64()
        .ok_or_else(|| MatsieveError::NonNumericProperty {
            formula: formula.to_string(),
            variant: record
                .get(VARIANT_FIELD)
                .and_then(Value::as_str)
                .unwrap_or("?")
                .to_string(),
            property: property.to_string(),
        })
}
