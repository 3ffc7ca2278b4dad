//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `utils/`
//! - 子模块: convert, kgrid, basis, analyze, submit, pointgroup

pub mod analyze;
pub mod basis;
pub mod convert;
pub mod kgrid;
pub mod pointgroup;
pub mod submit;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Convert(args) => convert::execute(args),
        Commands::Kgrid(args) => kgrid::execute(args),
        Commands::Basis(args) => basis::execute(args),
        Commands::Analyze(args) => analyze::execute(args),
        Commands::Submit(args) => submit::execute(args),
        Commands::Pointgroup(args) => pointgroup::execute(args),
    }
}
