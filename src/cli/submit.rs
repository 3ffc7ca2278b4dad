//! # submit 子命令 CLI 定义
//!
//! 批量提交 exciting/DFTB+/Qcore 作业到 SLURM/PBS
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/submit.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 电子结构引擎选择
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Engine {
    /// exciting (all-electron LAPW)
    Exciting,
    /// DFTB+
    Dftb,
    /// entos/Qcore
    Qcore,
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Exciting => write!(f, "exciting"),
            Engine::Dftb => write!(f, "dftb+"),
            Engine::Qcore => write!(f, "qcore"),
        }
    }
}

/// 调度器选择
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Scheduler {
    /// SLURM (sbatch)
    Slurm,
    /// PBS (qsub)
    Pbs,
}

/// submit 子命令参数
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Path to the CSV file containing structure list
    #[arg(long)]
    pub csv: PathBuf,

    /// Path to directory containing structure files (.xyz / .gen)
    #[arg(long)]
    pub struct_dir: PathBuf,

    /// Range of structures to submit (e.g., '1-20,25,30-32')
    #[arg(long)]
    pub range: String,

    /// Root directory for job folders
    #[arg(long, default_value = "jobs")]
    pub jobs_root: PathBuf,

    /// Electronic-structure engine
    #[arg(long, value_enum, default_value = "exciting")]
    pub engine: Engine,

    /// Batch scheduler
    #[arg(long, value_enum, default_value = "slurm")]
    pub scheduler: Scheduler,

    /// Input template file (input.xml / dftb_in.hsd / .in depending on engine)
    #[arg(long)]
    pub input_template: PathBuf,

    // ─────────────────────────────────────────────────────────────
    // Engine options
    // ─────────────────────────────────────────────────────────────
    /// Override the ngridk attribute in the exciting input template (e.g., '4x4x4')
    #[arg(long)]
    pub ngridk: Option<String>,

    /// Engine executable (default chosen per engine)
    #[arg(long)]
    pub exec: Option<String>,

    /// Number of MPI processes
    #[arg(long, default_value_t = 16)]
    pub np: u32,

    /// Module list (comma-separated)
    #[arg(long, default_value = "")]
    pub modules: String,

    /// Environment variables to export, KEY=VALUE (repeatable, order preserved)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    // ─────────────────────────────────────────────────────────────
    // Scheduler options
    // ─────────────────────────────────────────────────────────────
    /// SLURM partition / PBS queue
    #[arg(long, default_value = "batch")]
    pub partition: String,

    /// Number of nodes
    #[arg(long, default_value_t = 1)]
    pub nodes: u32,

    /// Number of tasks
    #[arg(long, default_value_t = 16)]
    pub ntasks: u32,

    /// CPUs per task
    #[arg(long, default_value_t = 1)]
    pub cpus_per_task: u32,

    /// Memory per CPU
    #[arg(long, default_value = "2G")]
    pub mem_per_cpu: String,

    /// Time limit (e.g., '24:00:00')
    #[arg(long, default_value = "24:00:00")]
    pub time: String,

    // ─────────────────────────────────────────────────────────────
    // Execution control
    // ─────────────────────────────────────────────────────────────
    /// Only generate job files, do not submit
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Submit jobs to the scheduler after generation
    #[arg(long, default_value_t = false)]
    pub submit: bool,

    /// Wall-clock timeout for each scheduler call, in seconds
    #[arg(long, default_value_t = 60)]
    pub submit_timeout: u64,
}
