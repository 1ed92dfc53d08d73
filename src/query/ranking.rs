//! # 排序选择
//!
//! 在一组数值中按 `Ranking` 规则选出下标。
//!
//! ## 依赖关系
//! - 被 `query/retriever.rs` 使用

use crate::models::Ranking;
use std::cmp::Ordering;

/// 稳定升序排序后的原始下标
///
/// `0.0` 与 `-0.0` 视为相等，与 `Min`/`Max` 的比较方式一致。
pub fn argsort(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[a]
            .partial_cmp(&values[b])
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// 按规则选出下标；空输入或位置越界返回 `None`
///
/// 最小/最大值相等时取先出现者。
pub fn select_index(values: &[f64], ranking: Ranking) -> Option<usize> {
    match ranking {
        Ranking::Min => first_extreme(values, |candidate, best| candidate < best),
        Ranking::Max => first_extreme(values, |candidate, best| candidate > best),
        Ranking::Position(k) => argsort(values).get(k).copied(),
    }
}

fn first_extreme(values: &[f64], better: impl Fn(f64, f64) -> bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some(b) if !better(v, values[b]) => {}
            _ => best = Some(i),
        }
    }
    best
}
