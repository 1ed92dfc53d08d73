//! # 查询选项
//!
//! 排序规则与 `Retriever::retrieve` 的选项构建器。
//!
//! ## 依赖关系
//! - 被 `query/`, `filter/` 和 `cli/` 使用

use crate::error::MatsieveError;
use std::str::FromStr;

/// 排序选择规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    /// 性质值最小的变体
    Min,
    /// 性质值最大的变体
    Max,
    /// 按性质值升序排列后第 k 个变体（从 0 开始）
    Position(usize),
}

impl FromStr for Ranking {
    type Err = MatsieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min" => Ok(Ranking::Min),
            "max" => Ok(Ranking::Max),
            digits if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => digits
                .parse::<usize>()
                .map(Ranking::Position)
                .map_err(|_| MatsieveError::UnsupportedRanking(s.to_string())),
            _ => Err(MatsieveError::UnsupportedRanking(s.to_string())),
        }
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ranking::Min => write!(f, "min"),
            Ranking::Max => write!(f, "max"),
            Ranking::Position(k) => write!(f, "{}", k),
        }
    }
}

/// 参与查询的材料范围
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MaterialSelection {
    /// 数据集中的全部材料
    #[default]
    All,
    /// 指定化学式列表（按给定顺序）
    Only(Vec<String>),
}

/// `retrieve` 查询选项
#[derive(Debug, Clone, Default)]
pub struct RetrieveOptions {
    /// 材料范围
    pub materials: MaterialSelection,
    /// 附带的结构名称（支持 `a.b` 点路径），仅在设定排序时生效
    pub structure: Option<String>,
    /// 排序规则，`None` 表示返回全部变体
    pub ranking: Option<Ranking>,
    /// 返回选中变体的完整记录
    pub polymorph_info: bool,
    /// 合并材料的化学信息字段
    pub chemical_info: bool,
}

impl RetrieveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 限定材料列表
    pub fn materials<I, S>(mut self, formulas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.materials = MaterialSelection::Only(formulas.into_iter().map(Into::into).collect());
        self
    }

    pub fn selection(mut self, selection: MaterialSelection) -> Self {
        self.materials = selection;
        self
    }

    /// 设置排序规则
    pub fn ranked(mut self, ranking: Ranking) -> Self {
        self.ranking = Some(ranking);
        self
    }

    pub fn ranking(mut self, ranking: Option<Ranking>) -> Self {
        self.ranking = ranking;
        self
    }

    /// 附带指定结构
    pub fn with_structure(mut self, structure: impl Into<String>) -> Self {
        self.structure = Some(structure.into());
        self
    }

    pub fn structure(mut self, structure: Option<String>) -> Self {
        self.structure = structure;
        self
    }

    pub fn polymorph_info(mut self, enabled: bool) -> Self {
        self.polymorph_info = enabled;
        self
    }

    pub fn chemical_info(mut self, enabled: bool) -> Self {
        self.chemical_info = enabled;
        self
    }
}
