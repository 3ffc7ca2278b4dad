//! # esutil - 电子结构计算统一工具箱
//!
//! 将分散的电子结构辅助脚本用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `convert` - 结构格式转换 (.xyz, .gen, .gin)
//! - `kgrid`   - Monkhorst-Pack k 点网格生成
//! - `basis`   - exciting 局域轨道基组生成
//! - `analyze` - 分析功能
//!   - `gw`  - GW 准粒子带隙汇总
//!   - `rdf` - 径向分布函数绘图
//! - `submit`  - 批量提交作业到 SLURM/PBS
//! - `pointgroup` - 点群数据查询
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (格式解析器)
//!   │     ├── kspace/    (k 点网格)
//!   │     ├── lobasis/   (局域轨道基组)
//!   │     ├── scheduler/ (作业脚本)
//!   │     └── models/    (数据模型)
//!   ├── batch/      (批量处理)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod kspace;
mod lobasis;
mod models;
mod parsers;
mod scheduler;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
