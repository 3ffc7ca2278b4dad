//! # 作业脚本生成模块
//!
//! 生成 SLURM / PBS 提交脚本并封装调度器命令调用。
//!
//! ## 子模块
//! - `slurm`: sbatch 脚本生成
//! - `pbs`: qsub 脚本生成
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 无外部模块依赖

pub mod pbs;
pub mod slurm;

use crate::error::{EsutilError, Result};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

/// 调度器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerKind {
    Slurm,
    Pbs,
}

impl SchedulerKind {
    /// 提交命令名
    pub fn submit_command(&self) -> &'static str {
        match self {
            SchedulerKind::Slurm => "sbatch",
            SchedulerKind::Pbs => "qsub",
        }
    }

    /// 脚本文件名
    pub fn script_name(&self) -> &'static str {
        match self {
            SchedulerKind::Slurm => "submit.sbatch",
            SchedulerKind::Pbs => "submit.pbs",
        }
    }
}

/// 作业资源配置
///
/// 指令序列从有序字段物化为文本，顺序固定；environment 保持插入顺序。
pub struct JobConfig {
    pub job_name: String,
    /// SLURM partition / PBS queue
    pub partition: String,
    pub nodes: u32,
    pub ntasks: u32,
    pub cpus_per_task: u32,
    pub mem_per_cpu: String,
    pub time_limit: String,
    pub modules: Vec<String>,
    /// 导出的环境变量（有序键值对）
    pub env: Vec<(String, String)>,
}

impl Default for JobConfig {
    fn default() -> Self {
        JobConfig {
            job_name: "job".to_string(),
            partition: "batch".to_string(),
            nodes: 1,
            ntasks: 16,
            cpus_per_task: 1,
            mem_per_cpu: "2G".to_string(),
            time_limit: "24:00:00".to_string(),
            modules: vec![],
            env: vec![],
        }
    }
}

impl JobConfig {
    /// module purge + load 行
    pub(crate) fn module_section(&self) -> String {
        let mut lines = vec!["module purge 2>&1".to_string()];
        lines.extend(self.modules.iter().map(|m| format!("module load {}", m)));
        lines.join("\n")
    }

    /// export 行（保持插入顺序）
    pub(crate) fn env_section(&self) -> String {
        self.env
            .iter()
            .map(|(k, v)| format!("export {}=\"{}\"", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 按调度器类型生成作业脚本
pub fn generate_job_script(
    kind: SchedulerKind,
    config: &JobConfig,
    workdir: &Path,
    exec_cmd: &str,
) -> String {
    match kind {
        SchedulerKind::Slurm => slurm::generate_sbatch_script(config, workdir, exec_cmd),
        SchedulerKind::Pbs => pbs::generate_pbs_script(config, workdir, exec_cmd),
    }
}

/// 带固定墙钟超时地运行外部命令
///
/// 超时后杀掉子进程并返回 CommandTimeout
pub fn run_with_timeout(
    command: &str,
    args: &[&str],
    cwd: &Path,
    timeout_secs: u64,
) -> Result<Output> {
    let mut child = Command::new(command)
        .args(args)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|_| EsutilError::CommandNotFound {
            command: command.to_string(),
        })?;

    let deadline = Instant::now() + Duration::from_secs(timeout_secs);

    loop {
        match child.try_wait() {
            Ok(Some(_)) => {
                return child
                    .wait_with_output()
                    .map_err(|e| EsutilError::CommandFailed {
                        command: command.to_string(),
                        stderr: e.to_string(),
                    });
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    child.kill().ok();
                    child.wait().ok();
                    return Err(EsutilError::CommandTimeout {
                        command: command.to_string(),
                        seconds: timeout_secs,
                    });
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => {
                return Err(EsutilError::CommandFailed {
                    command: command.to_string(),
                    stderr: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_section_order() {
        let config = JobConfig {
            modules: vec!["exciting/oxygen".to_string(), "intel/2024".to_string()],
            ..Default::default()
        };
        let section = config.module_section();
        let purge = section.find("module purge").unwrap();
        let exciting = section.find("exciting/oxygen").unwrap();
        let intel = section.find("intel/2024").unwrap();
        assert!(purge < exciting && exciting < intel);
    }

    #[test]
    fn test_env_section_preserves_insertion_order() {
        let config = JobConfig {
            env: vec![
                ("OMP_NUM_THREADS".to_string(), "4".to_string()),
                ("ZZZ_FIRST".to_string(), "no".to_string()),
                ("AAA_LAST".to_string(), "yes".to_string()),
            ],
            ..Default::default()
        };
        let section = config.env_section();
        let omp = section.find("OMP_NUM_THREADS").unwrap();
        let zzz = section.find("ZZZ_FIRST").unwrap();
        let aaa = section.find("AAA_LAST").unwrap();
        assert!(omp < zzz && zzz < aaa);
    }

    #[test]
    fn test_run_with_timeout_success() {
        let out = run_with_timeout("true", &[], Path::new("."), 5).unwrap();
        assert!(out.status.success());
    }

    #[test]
    fn test_run_with_timeout_kills_slow_command() {
        let err = run_with_timeout("sleep", &["30"], Path::new("."), 1).unwrap_err();
        assert!(matches!(err, EsutilError::CommandTimeout { seconds: 1, .. }));
    }

    #[test]
    fn test_run_with_timeout_missing_command() {
        let err = run_with_timeout("definitely-not-a-command", &[], Path::new("."), 1).unwrap_err();
        assert!(matches!(err, EsutilError::CommandNotFound { .. }));
    }
}
