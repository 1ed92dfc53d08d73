//! # 性质查询器
//!
//! 对每个材料：逐个变体按性质名深度查找取值，可选按排序规则选出单个变体，
//! 并附带结构、完整变体记录或化学信息。
//!
//! ## 结果形态
//! - 未排序: `{ "<variant>": <value>, ... }`
//! - 排序: `{ "tilt": "<variant>", "<property>": <value>[, "<structure>": {...}] }`
//! - 排序 + polymorph_info: `{ "tilt": "<variant>", ...完整变体记录 }`
//! - chemical_info: 以上任一形态再合并化学信息字段
//!
//! ## 依赖关系
//! - 使用 `models/` 数据模型
//! - 使用 `query/lookup.rs`, `query/ranking.rs`
//! - 被 `filter/duplicate.rs` 和 `commands/` 使用

use crate::error::{MatsieveError, Result};
use crate::models::{
    Dataset, MaterialSelection, Ranking, Record, RetrieveOptions, Retrieval, VARIANT_FIELD,
};
use crate::query::lookup::{find_all, lookup_path, Hit};
use crate::query::ranking::select_index;

use serde_json::Value;
use tracing::{debug, warn};

/// tilt 变体键，如 `3_tilt`
pub fn variant_key(tilt: usize) -> String {
    format!("{}_tilt", tilt)
}

/// 一个变体中查到的性质值
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    variant: &'a str,
    record: &'a Value,
    value: &'a Value,
}

/// 只读查询器，借用数据集
#[derive(Debug, Clone, Copy)]
pub struct Retriever<'a> {
    dataset: &'a Dataset,
}

impl<'a> Retriever<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Retriever { dataset }
    }

    /// 数据集中的材料数
    pub fn material_count(&self) -> usize {
        self.dataset.len()
    }

    pub fn formulas(&self) -> Vec<&'a str> {
        self.dataset.formulas().collect()
    }

    /// 按性质查询
    pub fn retrieve(&self, property: &str, opts: &RetrieveOptions) -> Result<Retrieval> {
        let mut retrieval = Retrieval::new();

        for formula in self.resolve(&opts.materials) {
            let record = self.retrieve_material(formula, property, opts)?;
            retrieval.insert(formula, Value::Object(record));
        }

        Ok(retrieval)
    }

    /// 取出每个材料的化学信息及 `{tilt}_tilt` 变体（若存在）
    pub fn retrieve_variant(&self, tilt: usize, selection: &MaterialSelection) -> Result<Retrieval> {
        let key = variant_key(tilt);
        let mut retrieval = Retrieval::new();

        for formula in self.resolve(selection) {
            let mut record = self.dataset.chemical_info(formula)?;
            match self.dataset.results(formula)?.get(&key) {
                Some(variant) => {
                    record.insert(key.clone(), variant.clone());
                }
                None => debug!(formula, variant = %key, "variant not present"),
            }
            retrieval.insert(formula, Value::Object(record));
        }

        Ok(retrieval)
    }

    fn resolve<'s>(&'s self, selection: &'s MaterialSelection) -> Vec<&'s str> {
        match selection {
            MaterialSelection::All => self.dataset.formulas().collect(),
            MaterialSelection::Only(formulas) => formulas.iter().map(String::as_str).collect(),
        }
    }

    fn retrieve_material(
        &self,
        formula: &str,
        property: &str,
        opts: &RetrieveOptions,
    ) -> Result<Record> {
        let results = self.dataset.results(formula)?;
        let candidates = collect_candidates(formula, results, property)?;

        if candidates.is_empty() {
            warn!(formula, property, "property not found in any variant");
        }

        let mut record = match opts.ranking {
            None => candidates
                .iter()
                .map(|c| (c.variant.to_string(), c.value.clone()))
                .collect(),
            Some(ranking) => {
                let selected = select(formula, property, &candidates, ranking)?;
                debug!(formula, property, %ranking, variant = selected.variant, "selected variant");
                shape_ranked(formula, property, &selected, opts)?
            }
        };

        if opts.chemical_info {
            for (key, value) in self.dataset.chemical_info(formula)? {
                record.insert(key, value);
            }
        }

        Ok(record)
    }
}

/// 逐个变体查找性质；每个变体至多一个命中
fn collect_candidates<'r>(
    formula: &str,
    results: &'r Record,
    property: &str,
) -> Result<Vec<Candidate<'r>>> {
    let mut candidates = Vec::with_capacity(results.len());

    for (variant, record) in results {
        let hits = find_all(record, property);
        match hits.as_slice() {
            [] => {}
            [hit] => candidates.push(Candidate {
                variant: variant.as_str(),
                record,
                value: hit.value,
            }),
            _ => {
                return Err(MatsieveError::DuplicatePropertyInVariant {
                    formula: formula.to_string(),
                    variant: variant.clone(),
                    property: property.to_string(),
                    count: hits.len(),
                    paths: hits.iter().map(Hit::dotted).collect::<Vec<_>>().join(", "),
                })
            }
        }
    }

    Ok(candidates)
}

fn select<'r>(
    formula: &str,
    property: &str,
    candidates: &[Candidate<'r>],
    ranking: Ranking,
) -> Result<Candidate<'r>> {
    if candidates.is_empty() {
        return Err(MatsieveError::PropertyNotFound {
            formula: formula.to_string(),
            property: property.to_string(),
        });
    }

    let values = candidates
        .iter()
        .map(|c| {
            c.value
                .as_f64()
                .ok_or_else(|| MatsieveError::NonNumericProperty {
                    formula: formula.to_string(),
                    variant: c.variant.to_string(),
                    property: property.to_string(),
                })
        })
        .collect::<Result<Vec<f64>>>()?;

    match select_index(&values, ranking) {
        Some(idx) => Ok(candidates[idx]),
        None => Err(MatsieveError::IndexOutOfRange {
            formula: formula.to_string(),
            index: match ranking {
                Ranking::Position(k) => k,
                Ranking::Min | Ranking::Max => 0,
            },
            len: values.len(),
        }),
    }
}

fn shape_ranked(
    formula: &str,
    property: &str,
    selected: &Candidate<'_>,
    opts: &RetrieveOptions,
) -> Result<Record> {
    let mut record = Record::new();
    record.insert(
        VARIANT_FIELD.to_string(),
        Value::String(selected.variant.to_string()),
    );

    if opts.polymorph_info {
        // 完整变体记录，不再按 structure 收窄
        let full = selected.record.as_object().ok_or_else(|| {
            MatsieveError::MalformedInput(format!(
                "variant {}/{} is not a JSON object",
                formula, selected.variant
            ))
        })?;
        for (key, value) in full {
            record.insert(key.clone(), value.clone());
        }
        return Ok(record);
    }

    record.insert(property.to_string(), selected.value.clone());

    if let Some(structure) = &opts.structure {
        let value =
            lookup_path(selected.record, structure).ok_or_else(|| MatsieveError::MissingPath {
                formula: formula.to_string(),
                variant: selected.variant.to_string(),
                path: structure.clone(),
            })?;
        record.insert(structure.clone(), value.clone());
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Dataset {
        Dataset::from_value(json!({
            "BaTiO3": {
                "results": {
                    "0_tilt": {
                        "dft_structure": { "lattice": [4.0, 4.0, 4.0] },
                        "energetics": { "FE_at": -2.0 },
                        "band_gap": 1.8
                    },
                    "1_tilt": {
                        "dft_structure": { "lattice": [4.1, 4.0, 3.9] },
                        "energetics": { "FE_at": -1.5 },
                        "band_gap": 1.6
                    },
                    "2_tilt": {
                        "dft_structure": { "lattice": [4.2, 4.1, 3.8] },
                        "energetics": { "FE_at": -2.5 },
                        "band_gap": 2.1
                    }
                },
                "A_site": "Ba",
                "B_site": "Ti"
            },
            "SrZrO3": {
                "results": {
                    "0_tilt": {
                        "dft_structure": { "lattice": [4.1, 4.1, 4.1] },
                        "energetics": { "FE_at": -3.0 },
                        "band_gap": 3.4
                    },
                    "3_tilt": {
                        "dft_structure": { "lattice": [5.8, 5.8, 8.2] },
                        "energetics": { "FE_at": -3.1 },
                        "band_gap": 3.6
                    }
                },
                "A_site": "Sr",
                "B_site": "Zr"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_unranked_keys_follow_variant_order() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);
        let out = retriever
            .retrieve("FE_at", &RetrieveOptions::new().materials(["BaTiO3"]))
            .unwrap();

        let record = out.get("BaTiO3").unwrap().as_object().unwrap();
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["0_tilt", "1_tilt", "2_tilt"]);
        assert_eq!(record["1_tilt"], json!(-1.5));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_all_materials_in_dataset_order() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);
        let out = retriever.retrieve("band_gap", &RetrieveOptions::new()).unwrap();
        let formulas: Vec<&str> = out.formulas().collect();
        assert_eq!(formulas, vec!["BaTiO3", "SrZrO3"]);
        assert_eq!(retriever.material_count(), 2);
    }

    #[test]
    fn test_min_max_and_position() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);

        let max = retriever
            .retrieve("FE_at", &RetrieveOptions::new().ranked(Ranking::Max))
            .unwrap();
        assert_eq!(
            max.get("BaTiO3").unwrap(),
            &json!({ "tilt": "1_tilt", "FE_at": -1.5 })
        );
        assert_eq!(
            max.get("SrZrO3").unwrap(),
            &json!({ "tilt": "0_tilt", "FE_at": -3.0 })
        );

        let min = retriever
            .retrieve("FE_at", &RetrieveOptions::new().ranked(Ranking::Min))
            .unwrap();
        assert_eq!(min.get("BaTiO3").unwrap()["tilt"], json!("2_tilt"));

        // 升序: -2.5 (2_tilt), -2.0 (0_tilt), -1.5 (1_tilt)
        let second = retriever
            .retrieve(
                "FE_at",
                &RetrieveOptions::new()
                    .materials(["BaTiO3"])
                    .ranked(Ranking::Position(1)),
            )
            .unwrap();
        assert_eq!(
            second.get("BaTiO3").unwrap(),
            &json!({ "tilt": "0_tilt", "FE_at": -2.0 })
        );
    }

    #[test]
    fn test_position_out_of_range() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);
        let err = retriever
            .retrieve("FE_at", &RetrieveOptions::new().ranked(Ranking::Position(2)))
            .unwrap_err();
        assert!(matches!(
            err,
            MatsieveError::IndexOutOfRange { ref formula, index: 2, len: 2 } if formula == "SrZrO3"
        ));
    }

    #[test]
    fn test_structure_attached() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);
        let out = retriever
            .retrieve(
                "FE_at",
                &RetrieveOptions::new()
                    .materials(["SrZrO3"])
                    .ranked(Ranking::Min)
                    .with_structure("dft_structure"),
            )
            .unwrap();
        assert_eq!(
            out.get("SrZrO3").unwrap(),
            &json!({
                "tilt": "3_tilt",
                "FE_at": -3.1,
                "dft_structure": { "lattice": [5.8, 5.8, 8.2] }
            })
        );
    }

    #[test]
    fn test_structure_dotted_path_and_missing_path() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);
        let out = retriever
            .retrieve(
                "FE_at",
                &RetrieveOptions::new()
                    .materials(["SrZrO3"])
                    .ranked(Ranking::Min)
                    .with_structure("dft_structure.lattice.2"),
            )
            .unwrap();
        assert_eq!(out.get("SrZrO3").unwrap()["dft_structure.lattice.2"], json!(8.2));

        let err = retriever
            .retrieve(
                "FE_at",
                &RetrieveOptions::new()
                    .ranked(Ranking::Max)
                    .with_structure("spuds_structure"),
            )
            .unwrap_err();
        assert!(matches!(err, MatsieveError::MissingPath { ref path, .. } if path == "spuds_structure"));
    }

    #[test]
    fn test_structure_ignored_without_ranking() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);
        let out = retriever
            .retrieve(
                "band_gap",
                &RetrieveOptions::new()
                    .materials(["SrZrO3"])
                    .with_structure("dft_structure"),
            )
            .unwrap();
        assert_eq!(
            out.get("SrZrO3").unwrap(),
            &json!({ "0_tilt": 3.4, "3_tilt": 3.6 })
        );
    }

    #[test]
    fn test_polymorph_info_returns_full_variant() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);
        let out = retriever
            .retrieve(
                "band_gap",
                &RetrieveOptions::new()
                    .materials(["BaTiO3"])
                    .ranked(Ranking::Max)
                    .with_structure("dft_structure")
                    .polymorph_info(true),
            )
            .unwrap();
        let record = out.get("BaTiO3").unwrap().as_object().unwrap();
        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["tilt", "dft_structure", "energetics", "band_gap"]);
        assert_eq!(record["tilt"], json!("2_tilt"));
        assert_eq!(record["energetics"], json!({ "FE_at": -2.5 }));
    }

    #[test]
    fn test_chemical_info_merged() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);

        let ranked = retriever
            .retrieve(
                "FE_at",
                &RetrieveOptions::new()
                    .materials(["SrZrO3"])
                    .ranked(Ranking::Max)
                    .chemical_info(true),
            )
            .unwrap();
        assert_eq!(
            ranked.get("SrZrO3").unwrap(),
            &json!({ "tilt": "0_tilt", "FE_at": -3.0, "A_site": "Sr", "B_site": "Zr" })
        );

        let unranked = retriever
            .retrieve(
                "FE_at",
                &RetrieveOptions::new().materials(["SrZrO3"]).chemical_info(true),
            )
            .unwrap();
        assert_eq!(
            unranked.get("SrZrO3").unwrap(),
            &json!({ "0_tilt": -3.0, "3_tilt": -3.1, "A_site": "Sr", "B_site": "Zr" })
        );
    }

    #[test]
    fn test_missing_material() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);
        let err = retriever
            .retrieve("FE_at", &RetrieveOptions::new().materials(["PbTiO3"]))
            .unwrap_err();
        assert!(matches!(err, MatsieveError::MissingMaterial(ref f) if f == "PbTiO3"));
    }

    #[test]
    fn test_absent_property_is_empty_when_unranked() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);
        let out = retriever
            .retrieve("magmom", &RetrieveOptions::new())
            .unwrap();
        assert_eq!(out.get("BaTiO3").unwrap(), &json!({}));
        assert_eq!(out.get("SrZrO3").unwrap(), &json!({}));

        let err = retriever
            .retrieve("magmom", &RetrieveOptions::new().ranked(Ranking::Min))
            .unwrap_err();
        assert!(matches!(err, MatsieveError::PropertyNotFound { .. }));
    }

    #[test]
    fn test_duplicate_property_in_variant() {
        let dataset = Dataset::from_value(json!({
            "KNbO3": {
                "results": {
                    "0_tilt": { "FE_at": -1.0, "relaxed": { "FE_at": -1.1 } }
                }
            }
        }))
        .unwrap();
        let retriever = Retriever::new(&dataset);
        let err = retriever
            .retrieve("FE_at", &RetrieveOptions::new())
            .unwrap_err();
        assert!(matches!(
            err,
            MatsieveError::DuplicatePropertyInVariant { ref variant, count: 2, ref paths, .. }
                if variant == "0_tilt" && paths == "FE_at, relaxed.FE_at"
        ));
    }

    #[test]
    fn test_variant_without_property_is_skipped() {
        let dataset = Dataset::from_value(json!({
            "NaNbO3": {
                "results": {
                    "0_tilt": { "FE_at": -1.0 },
                    "1_tilt": { "band_gap": 2.0 },
                    "2_tilt": { "FE_at": -0.5 }
                }
            }
        }))
        .unwrap();
        let retriever = Retriever::new(&dataset);
        let out = retriever.retrieve("FE_at", &RetrieveOptions::new()).unwrap();
        assert_eq!(
            out.get("NaNbO3").unwrap(),
            &json!({ "0_tilt": -1.0, "2_tilt": -0.5 })
        );

        let max = retriever
            .retrieve("FE_at", &RetrieveOptions::new().ranked(Ranking::Max))
            .unwrap();
        assert_eq!(max.get("NaNbO3").unwrap()["tilt"], json!("2_tilt"));
    }

    #[test]
    fn test_non_numeric_property_fails_ranking() {
        let dataset = Dataset::from_value(json!({
            "LiNbO3": {
                "results": {
                    "0_tilt": { "space_group": "R3c" },
                    "1_tilt": { "space_group": "Pnma" }
                }
            }
        }))
        .unwrap();
        let retriever = Retriever::new(&dataset);

        let unranked = retriever
            .retrieve("space_group", &RetrieveOptions::new())
            .unwrap();
        assert_eq!(unranked.get("LiNbO3").unwrap()["1_tilt"], json!("Pnma"));

        let err = retriever
            .retrieve("space_group", &RetrieveOptions::new().ranked(Ranking::Min))
            .unwrap_err();
        assert!(matches!(err, MatsieveError::NonNumericProperty { .. }));
    }

    #[test]
    fn test_retrieve_variant() {
        let dataset = sample();
        let retriever = Retriever::new(&dataset);
        let out = retriever
            .retrieve_variant(3, &MaterialSelection::All)
            .unwrap();

        assert_eq!(
            out.get("BaTiO3").unwrap(),
            &json!({ "A_site": "Ba", "B_site": "Ti" })
        );
        let srzr = out.get("SrZrO3").unwrap().as_object().unwrap();
        assert_eq!(srzr["3_tilt"]["energetics"]["FE_at"], json!(-3.1));
    }
}
