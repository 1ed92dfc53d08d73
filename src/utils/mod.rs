//! # 工具函数模块
//!
//! 提供美化输出、进度提示、数据美化打印等工具。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: display, output, progress

pub mod display;
pub mod output;
pub mod progress;
