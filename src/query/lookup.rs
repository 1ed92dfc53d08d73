//! # 嵌套键查找
//!
//! - `find_all`: 按键名在整棵 JSON 子树中做深度优先查找
//! - `lookup_path`: 按 `a.b.0` 形式的点路径直接取值
//!
//! ## 依赖关系
//! - 被 `query/retriever.rs` 使用

use serde_json::Value;

/// 一次键名命中：从查找根开始的路径与对应值
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'a> {
    pub path: Vec<String>,
    pub value: &'a Value,
}

impl Hit<'_> {
    /// 点分隔路径（用于诊断信息）
    pub fn dotted(&self) -> String {
        self.path.join(".")
    }
}

/// 查找子树中所有名为 `key` 的条目
///
/// 对象按键顺序遍历，数组按下标遍历；命中的值本身也会继续向下查找。
pub fn find_all<'a>(root: &'a Value, key: &str) -> Vec<Hit<'a>> {
    let mut hits = Vec::new();
    let mut path = Vec::new();
    walk(root, key, &mut path, &mut hits);
    hits
}

fn walk<'a>(node: &'a Value, key: &str, path: &mut Vec<String>, hits: &mut Vec<Hit<'a>>) {
    match node {
        Value::Object(map) => {
            for (name, child) in map {
                path.push(name.clone());
                if name == key {
                    hits.push(Hit {
                        path: path.clone(),
                        value: child,
                    });
                }
                walk(child, key, path, hits);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                path.push(i.to_string());
                walk(child, key, path, hits);
                path.pop();
            }
        }
        _ => {}
    }
}

/// 按点路径取值，数组段使用十进制下标
pub fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
