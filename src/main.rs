//! # matsieve - DFT 材料数据查询与去重
//!
//! ## 子命令
//! - `retrieve` - 按性质查询，可按 min/max/位次选择变体
//! - `variant`  - 取出指定 tilt 变体
//! - `filter`   - 基于参考选择的去重过滤与导出
//! - `show`     - 美化打印 JSON 或快照文件
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── query/    (性质查询)
//!   │     ├── filter/   (去重过滤)
//!   │     └── storage/  (文件读写)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

use clap::Parser;
use matsieve::cli::Cli;
use matsieve::commands;
use matsieve::utils::output;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

/// 日志输出到 stderr；RUST_LOG 优先于 --verbose
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
