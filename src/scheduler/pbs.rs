//! # PBS 脚本生成工具
//!
//! 生成 qsub 提交脚本。
//!
//! ## 依赖关系
//! - 被 `scheduler/mod.rs` 调用
//! - 使用 `scheduler/mod.rs` 的 JobConfig

use super::JobConfig;
use std::path::Path;

/// 生成 qsub 脚本内容
///
/// PBS 无 mem-per-cpu 概念，内存按 select 块整体申请
pub fn generate_pbs_script(config: &JobConfig, workdir: &Path, exec_cmd: &str) -> String {
    format!(
        r#"#!/bin/bash
#PBS -N {name}
#PBS -q {queue}
#PBS -l select={nodes}:ncpus={cpus}:mpiprocs={ntasks}:mem={mem}
#PBS -l walltime={time}
#PBS -j oe
#PBS -o pbs_logs/{name}.log

set -euo pipefail

{modules}
echo "Loaded modules"
{env}

cd "${{PBS_O_WORKDIR:-{workdir}}}"
echo "PWD=$(pwd)"
echo "Running: {cmd}"
{cmd}
"#,
        name = config.job_name,
        queue = config.partition,
        nodes = config.nodes,
        cpus = config.cpus_per_task.max(1) * config.ntasks,
        ntasks = config.ntasks,
        mem = config.mem_per_cpu,
        time = config.time_limit,
        modules = config.module_section(),
        env = config.env_section(),
        workdir = workdir.display(),
        cmd = exec_cmd,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pbs_script_directives() {
        let config = JobConfig {
            job_name: "geo2-md".to_string(),
            partition: "workq".to_string(),
            nodes: 1,
            ntasks: 32,
            cpus_per_task: 1,
            mem_per_cpu: "2G".to_string(),
            time_limit: "48:00:00".to_string(),
            modules: vec!["dftbplus/24.1".to_string()],
            env: vec![],
        };

        let script = generate_pbs_script(&config, Path::new("/work/geo2"), "dftb+ > dftb.out");

        assert!(script.starts_with("#!/bin/bash"));
        assert!(script.contains("#PBS -N geo2-md"));
        assert!(script.contains("#PBS -q workq"));
        assert!(script.contains("#PBS -l select=1:ncpus=32:mpiprocs=32:mem=2G"));
        assert!(script.contains("#PBS -l walltime=48:00:00"));
        assert!(script.contains("module load dftbplus/24.1"));
        assert!(script.contains("PBS_O_WORKDIR"));
        assert!(script.contains("dftb+ > dftb.out"));
    }

    #[test]
    fn test_workdir_fallback_embedded() {
        let config = JobConfig::default();
        let script = generate_pbs_script(&config, Path::new("/abs/path"), "true");
        assert!(script.contains("${PBS_O_WORKDIR:-/abs/path}"));
    }
}
