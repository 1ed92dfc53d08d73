//! # JSON 读写
//!
//! 读取整个 JSON 文件到内存；按可配置缩进写出。
//!
//! ## 依赖关系
//! - 被 `filter/export.rs`, `commands/` 使用
//! - 使用 `serde_json`

use crate::error::{MatsieveError, Result};
use crate::models::Dataset;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// 读取 JSON 文件
pub fn read_json(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).map_err(|e| MatsieveError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_json(&bytes, path)
}

/// 解析 JSON 字节（`path` 仅用于错误信息）
pub fn parse_json(bytes: &[u8], path: &Path) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| MatsieveError::Json {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// 读取数据集文件
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    Dataset::from_value(read_json(path)?)
}

/// 序列化为 JSON 文本；`None` 为紧凑格式，`Some(n)` 为 n 个空格缩进
pub fn to_json_string<T: Serialize + ?Sized>(value: &T, indent: Option<usize>) -> Result<String> {
    let encode_err = |e: serde_json::Error| MatsieveError::MalformedInput(e.to_string());

    match indent {
        None => serde_json::to_string(value).map_err(encode_err),
        Some(width) => {
            let spaces = " ".repeat(width);
            let formatter = PrettyFormatter::with_indent(spaces.as_bytes());
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut ser).map_err(encode_err)?;
            String::from_utf8(buf).map_err(|e| MatsieveError::MalformedInput(e.to_string()))
        }
    }
}

/// 写出 JSON 文件
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path, indent: Option<usize>) -> Result<()> {
    let text = to_json_string(value, indent)?;
    fs::write(path, text).map_err(|e| MatsieveError::FileWrite {
        path: path.display().to_string(),
        source: e,
    })
}
