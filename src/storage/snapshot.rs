//! # 快照持久化
//!
//! 把数据集、查询结果或过滤器状态保存为带版本号的二进制文件，供之后重新加载。
//!
//! ## 文件格式 (bincode)
//! ```text
//! magic "MSNP" | version: u16 | kind | payload: JSON 文本
//! ```
//! 载荷保存为 JSON 文本，只接受本模块列出的三种类型。
//!
//! ## 依赖关系
//! - 使用 `models/`, `filter/duplicate.rs` 的 FilterState
//! - 被 `commands/filter.rs`, `commands/show.rs` 使用
//! - 使用 `bincode` 编码外层结构

use crate::error::{MatsieveError, Result};
use crate::filter::FilterState;
use crate::models::{Dataset, Retrieval};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// 文件头魔数
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"MSNP";
/// 当前格式版本
pub const SNAPSHOT_VERSION: u16 = 1;

/// 快照载荷类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotKind {
    Dataset,
    Retrieval,
    FilterState,
}

impl std::fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotKind::Dataset => write!(f, "dataset"),
            SnapshotKind::Retrieval => write!(f, "retrieval"),
            SnapshotKind::FilterState => write!(f, "filter state"),
        }
    }
}

/// 可保存的对象
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Dataset(Dataset),
    Retrieval(Retrieval),
    FilterState(FilterState),
}

impl Snapshot {
    pub fn kind(&self) -> SnapshotKind {
        match self {
            Snapshot::Dataset(_) => SnapshotKind::Dataset,
            Snapshot::Retrieval(_) => SnapshotKind::Retrieval,
            Snapshot::FilterState(_) => SnapshotKind::FilterState,
        }
    }

    /// 转为 JSON 值（用于显示）
    pub fn to_value(&self) -> Result<Value> {
        let value = match self {
            Snapshot::Dataset(dataset) => serde_json::to_value(dataset),
            Snapshot::Retrieval(retrieval) => serde_json::to_value(retrieval),
            Snapshot::FilterState(state) => serde_json::to_value(state),
        };
        value.map_err(|e| MatsieveError::MalformedInput(e.to_string()))
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    magic: [u8; 4],
    version: u16,
    kind: SnapshotKind,
    payload: String,
}

/// 检查字节是否以快照魔数开头
pub fn is_snapshot(bytes: &[u8]) -> bool {
    bytes.starts_with(&SNAPSHOT_MAGIC)
}

/// 编码快照
pub fn encode_snapshot(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let payload = match snapshot {
        Snapshot::Dataset(dataset) => serde_json::to_string(dataset),
        Snapshot::Retrieval(retrieval) => serde_json::to_string(retrieval),
        Snapshot::FilterState(state) => serde_json::to_string(state),
    }
    .map_err(|e| MatsieveError::MalformedInput(e.to_string()))?;

    let envelope = Envelope {
        magic: SNAPSHOT_MAGIC,
        version: SNAPSHOT_VERSION,
        kind: snapshot.kind(),
        payload,
    };
    Ok(bincode::serialize(&envelope)?)
}

/// 解码快照（`path` 仅用于错误信息）
pub fn decode_snapshot(bytes: &[u8], path: &Path) -> Result<Snapshot> {
    let format_err = |reason: String| MatsieveError::SnapshotFormat {
        path: path.display().to_string(),
        reason,
    };

    if !is_snapshot(bytes) {
        return Err(format_err("missing snapshot header".to_string()));
    }

    let envelope: Envelope = bincode::deserialize(bytes)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(format_err(format!(
            "unsupported version {} (expected {})",
            envelope.version, SNAPSHOT_VERSION
        )));
    }

    let payload = envelope.payload.as_str();
    let snapshot = match envelope.kind {
        SnapshotKind::Dataset => serde_json::from_str(payload).map(Snapshot::Dataset),
        SnapshotKind::Retrieval => serde_json::from_str(payload).map(Snapshot::Retrieval),
        SnapshotKind::FilterState => serde_json::from_str(payload).map(Snapshot::FilterState),
    };
    snapshot.map_err(|e| format_err(format!("{} payload: {}", envelope.kind, e)))
}

/// 保存快照到文件
pub fn save_snapshot(snapshot: &Snapshot, path: &Path) -> Result<()> {
    let bytes = encode_snapshot(snapshot)?;
    fs::write(path, bytes).map_err(|e| MatsieveError::FileWrite {
        path: path.display().to_string(),
        source: e,
    })
}

/// 从文件加载快照
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let bytes = fs::read(path).map_err(|e| MatsieveError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;
    decode_snapshot(&bytes, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DuplicateFilter, FilterOptions, ReferenceOptions};
    use crate::models::Ranking;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> Dataset {
        Dataset::from_value(json!({
            "PbZrO3": {
                "results": {
                    "0_tilt": { "dft_structure": { "a": 4.1 }, "FE_at": -2.7 },
                    "1_tilt": { "dft_structure": { "a": 4.2 }, "FE_at": -2.9 }
                },
                "A_site": "Pb"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_dataset_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.msnp");
        let snapshot = Snapshot::Dataset(sample());

        save_snapshot(&snapshot, &path).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.kind(), SnapshotKind::Dataset);
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_filter_state_round_trip() {
        let dataset = sample();
        let mut filter = DuplicateFilter::new(&dataset);
        filter
            .select_reference(&ReferenceOptions::default())
            .unwrap();
        filter
            .filter_duplicates(FilterOptions::default().rankings([Ranking::Min]))
            .unwrap();

        let snapshot = Snapshot::FilterState(filter.state());
        let bytes = encode_snapshot(&snapshot).unwrap();
        assert!(is_snapshot(&bytes));

        let decoded = decode_snapshot(&bytes, Path::new("state.msnp")).unwrap();
        let Snapshot::FilterState(state) = decoded else {
            panic!("expected filter state");
        };
        let restored = DuplicateFilter::from_state(&dataset, state);
        assert_eq!(restored.non_duplicates(), filter.non_duplicates());
        assert_eq!(restored.reference(), filter.reference());
    }

    #[test]
    fn test_rejects_plain_json() {
        let err = decode_snapshot(br#"{"PbZrO3": {}}"#, Path::new("data.json")).unwrap_err();
        assert!(matches!(err, MatsieveError::SnapshotFormat { .. }));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let envelope = Envelope {
            magic: SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION + 1,
            kind: SnapshotKind::Retrieval,
            payload: "{}".to_string(),
        };
        let bytes = bincode::serialize(&envelope).unwrap();
        let err = decode_snapshot(&bytes, Path::new("future.msnp")).unwrap_err();
        assert!(matches!(
            err,
            MatsieveError::SnapshotFormat { ref reason, .. } if reason.contains("version")
        ));
    }
}
