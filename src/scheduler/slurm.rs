//! # Slurm 脚本生成工具
//!
//! 生成 sbatch 提交脚本。
//!
//! ## 依赖关系
//! - 被 `scheduler/mod.rs` 调用
//! - 使用 `scheduler/mod.rs` 的 JobConfig

use super::JobConfig;
use std::path::Path;

/// 生成 sbatch 脚本内容
pub fn generate_sbatch_script(config: &JobConfig, workdir: &Path, exec_cmd: &str) -> String {
    format!(
        r#"#!/bin/bash
#SBATCH --partition {partition}
#SBATCH --nodes={nodes}
#SBATCH --mem-per-cpu {mem}
#SBATCH --time {time}
#SBATCH -c {cpus}
#SBATCH -n {ntasks}
#SBATCH -J {name}
#SBATCH -o slurm_logs/%x.out
#SBATCH -e slurm_logs/%x.err

set -euo pipefail

{modules}
echo "Loaded modules"
{env}

cd "{workdir}"
echo "PWD=$(pwd)"
echo "Running: {cmd}"
{cmd}

echo "Timings:"
sacct -o JobID,Submit,Start,End,CPUTime,State -j $SLURM_JOBID
echo "Resources:"
sacct -o JobID,JobName,Partition,ReqMem,MaxRSS,MaxVMSize -j $SLURM_JOBID
"#,
        partition = config.partition,
        nodes = config.nodes,
        mem = config.mem_per_cpu,
        time = config.time_limit,
        cpus = config.cpus_per_task,
        ntasks = config.ntasks,
        name = config.job_name,
        modules = config.module_section(),
        env = config.env_section(),
        workdir = workdir.display(),
        cmd = exec_cmd,
    )
}
