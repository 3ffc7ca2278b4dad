//! # submit 命令实现
//!
//! 批量生成并提交 exciting/DFTB+/Qcore 作业。
//!
//! ## 功能
//! - 读取结构列表 CSV
//! - 生成作业目录和引擎输入文件
//! - 生成 SLURM/PBS 脚本
//! - 可选自动提交（带墙钟超时）
//!
//! ## 依赖关系
//! - 使用 `cli/submit.rs` 定义的参数
//! - 使用 `scheduler/`, `parsers/`, `utils/output.rs`, `utils/progress.rs`

use crate::cli::submit::{Engine, Scheduler, SubmitArgs};
use crate::error::{EsutilError, Result};
use crate::parsers;
use crate::parsers::gen::to_gen_string;
use crate::parsers::xyz::to_xyz_string;
use crate::scheduler::{generate_job_script, run_with_timeout, JobConfig, SchedulerKind};
use crate::utils::{output, progress};

use regex::Regex;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// 执行 submit 命令
pub fn execute(args: SubmitArgs) -> Result<()> {
    output::print_header("Batch Job Submission");

    if !args.csv.exists() {
        return Err(EsutilError::FileNotFound {
            path: args.csv.display().to_string(),
        });
    }

    if !args.struct_dir.exists() {
        return Err(EsutilError::DirectoryNotFound {
            path: args.struct_dir.display().to_string(),
        });
    }

    if !args.input_template.exists() {
        return Err(EsutilError::FileNotFound {
            path: args.input_template.display().to_string(),
        });
    }

    fs::create_dir_all(&args.jobs_root).map_err(|e| EsutilError::FileWriteError {
        path: args.jobs_root.display().to_string(),
        source: e,
    })?;

    let structures = read_csv_structures(&args.csv)?;
    output::print_info(&format!("Loaded {} structures from CSV", structures.len()));

    let indices = parse_range(&args.range)?;
    output::print_info(&format!(
        "Selected {} structures from range '{}' for {} on {}",
        indices.len(),
        args.range,
        args.engine,
        match args.scheduler {
            Scheduler::Slurm => "SLURM",
            Scheduler::Pbs => "PBS",
        }
    ));

    let kind = match args.scheduler {
        Scheduler::Slurm => SchedulerKind::Slurm,
        Scheduler::Pbs => SchedulerKind::Pbs,
    };

    let mut submitted = Vec::new();
    let mut generated = Vec::new();

    for idx in &indices {
        let i = *idx;
        if i < 1 || i > structures.len() {
            output::print_warning(&format!("Index {} out of range, skipping", i));
            continue;
        }

        let structure_name = &structures[i - 1];
        if structure_name.is_empty() {
            output::print_warning(&format!("Empty structure name at index {}, skipping", i));
            continue;
        }

        let structure_path = match find_structure_file(&args.struct_dir, structure_name) {
            Some(p) => p,
            None => {
                output::print_warning(&format!(
                    "No .xyz or .gen found for '{}', skipping",
                    structure_name
                ));
                continue;
            }
        };

        let job_dir = args.jobs_root.join(structure_name);
        fs::create_dir_all(&job_dir).map_err(|e| EsutilError::FileWriteError {
            path: job_dir.display().to_string(),
            source: e,
        })?;

        // 日志目录与脚本中的 -o/-e 路径保持一致
        let log_dir = match kind {
            SchedulerKind::Slurm => "slurm_logs",
            SchedulerKind::Pbs => "pbs_logs",
        };
        fs::create_dir_all(job_dir.join(log_dir)).ok();

        let exec_cmd = stage_engine_inputs(&args, &job_dir, structure_name, &structure_path)?;

        let script_path = write_job_script(&args, kind, &job_dir, structure_name, &exec_cmd)?;
        generated.push(structure_name.clone());

        if args.submit && !args.dry_run {
            submit_job(kind, &job_dir, &script_path, structure_name, args.submit_timeout)
                .map(|job_id| {
                    output::print_success(&format!("Submitted: {} - {}", structure_name, job_id));
                    submitted.push(structure_name.clone());
                })
                .unwrap_or_else(|e| {
                    output::print_error(&format!("{}: {}", structure_name, e));
                });
        } else {
            output::print_info(&format!("[DRY] Generated job: {}", job_dir.display()));
        }
    }

    output::print_separator();
    output::print_done(&format!(
        "Processed {} entries, generated {} jobs, submitted {} jobs",
        indices.len(),
        generated.len(),
        submitted.len()
    ));

    Ok(())
}

/// 读取 CSV 中的结构名称列表
fn read_csv_structures(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| EsutilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let reader = BufReader::new(file);
    let mut structures = Vec::new();
    let mut first_line = true;

    for line in reader.lines() {
        let line = line.map_err(|e| EsutilError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        if line.trim().is_empty() {
            continue;
        }

        // 第一行可能是 header
        if first_line {
            first_line = false;
            if line.to_lowercase().contains("structure") {
                continue;
            }
        }

        // 取第一列作为结构名
        let name = line
            .split([',', '\t', ' '])
            .find(|s| !s.is_empty())
            .unwrap_or("")
            .to_string();
        structures.push(name);
    }

    Ok(structures)
}

/// 解析范围字符串 (e.g., "1-5,8,10-12")
fn parse_range(expr: &str) -> Result<Vec<usize>> {
    let mut items = Vec::new();

    for chunk in expr.split(',') {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }

        if chunk.contains('-') {
            let parts: Vec<&str> = chunk.splitn(2, '-').collect();
            if parts.len() != 2 {
                return Err(EsutilError::InvalidRange(chunk.to_string()));
            }
            let a: usize = parts[0]
                .parse()
                .map_err(|_| EsutilError::InvalidRange(chunk.to_string()))?;
            let b: usize = parts[1]
                .parse()
                .map_err(|_| EsutilError::InvalidRange(chunk.to_string()))?;
            if a < 1 || b < a {
                return Err(EsutilError::InvalidRange(chunk.to_string()));
            }
            items.extend(a..=b);
        } else {
            let v: usize = chunk
                .parse()
                .map_err(|_| EsutilError::InvalidRange(chunk.to_string()))?;
            if v < 1 {
                return Err(EsutilError::InvalidRange(chunk.to_string()));
            }
            items.push(v);
        }
    }

    items.sort();
    items.dedup();
    Ok(items)
}

/// 查找结构文件（.gen 优先于 .xyz）
fn find_structure_file(struct_dir: &Path, structure_name: &str) -> Option<PathBuf> {
    let candidates = [
        struct_dir.join(format!("{}.gen", structure_name)),
        struct_dir.join(format!("{}.xyz", structure_name)),
    ];

    candidates.into_iter().find(|p| p.exists())
}

/// 准备引擎输入文件，返回执行命令
fn stage_engine_inputs(
    args: &SubmitArgs,
    job_dir: &Path,
    structure_name: &str,
    structure_path: &Path,
) -> Result<String> {
    let structure = parsers::parse_structure_file(structure_path)?;

    match args.engine {
        Engine::Exciting => {
            let mut template = fs::read_to_string(&args.input_template).map_err(|e| {
                EsutilError::FileReadError {
                    path: args.input_template.display().to_string(),
                    source: e,
                }
            })?;

            if let Some(ref ngridk) = args.ngridk {
                let (rewritten, replaced) = set_ngridk_attribute(&template, ngridk)?;
                if !replaced {
                    output::print_warning(&format!(
                        "Template has no ngridk attribute, --ngridk ignored for '{}'",
                        structure_name
                    ));
                }
                template = rewritten;
            }

            write_file(&job_dir.join("input.xml"), &template)?;
            write_file(
                &job_dir.join(format!("{}.xyz", structure_name)),
                &to_xyz_string(&structure),
            )?;

            let exec = args.exec.as_deref().unwrap_or("exciting_smp");
            Ok(format!("mpirun -np {} {}", args.np, exec))
        }
        Engine::Dftb => {
            fs::copy(&args.input_template, job_dir.join("dftb_in.hsd")).map_err(|e| {
                EsutilError::FileWriteError {
                    path: job_dir.join("dftb_in.hsd").display().to_string(),
                    source: e,
                }
            })?;

            // dftb_in.hsd 以 GenFormat 引用 geo.gen
            write_file(&job_dir.join("geo.gen"), &to_gen_string(&structure))?;

            let exec = args.exec.as_deref().unwrap_or("dftb+");
            Ok(format!("mpirun -np {} {} > dftb.out", args.np, exec))
        }
        Engine::Qcore => {
            let input_name = format!("{}.in", structure_name);
            fs::copy(&args.input_template, job_dir.join(&input_name)).map_err(|e| {
                EsutilError::FileWriteError {
                    path: job_dir.join(&input_name).display().to_string(),
                    source: e,
                }
            })?;

            write_file(
                &job_dir.join(format!("{}.xyz", structure_name)),
                &to_xyz_string(&structure),
            )?;

            let exec = args.exec.as_deref().unwrap_or("qcore");
            Ok(format!(
                "{} {} > {}.out",
                exec, input_name, structure_name
            ))
        }
    }
}

/// 写作业脚本
fn write_job_script(
    args: &SubmitArgs,
    kind: SchedulerKind,
    job_dir: &Path,
    structure_name: &str,
    exec_cmd: &str,
) -> Result<PathBuf> {
    let modules: Vec<String> = args
        .modules
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let env = parse_env_pairs(&args.env)?;

    let config = JobConfig {
        job_name: structure_name.to_string(),
        partition: args.partition.clone(),
        nodes: args.nodes,
        ntasks: args.ntasks,
        cpus_per_task: args.cpus_per_task,
        mem_per_cpu: args.mem_per_cpu.clone(),
        time_limit: args.time.clone(),
        modules,
        env,
    };

    let script = generate_job_script(kind, &config, job_dir, exec_cmd);
    let script_path = job_dir.join(kind.script_name());

    write_file(&script_path, &script)?;
    Ok(script_path)
}

/// 提交作业并返回调度器的回显
fn submit_job(
    kind: SchedulerKind,
    job_dir: &Path,
    script_path: &Path,
    structure_name: &str,
    timeout_secs: u64,
) -> Result<String> {
    let command = kind.submit_command();
    let script_name = script_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("submit");

    let spinner = progress::create_spinner(&format!("Submitting {}", structure_name));
    let result = run_with_timeout(command, &[script_name], job_dir, timeout_secs);
    spinner.finish_and_clear();

    let out = result?;
    if out.status.success() {
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    } else {
        Err(EsutilError::CommandFailed {
            command: command.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        })
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| EsutilError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 解析 KEY=VALUE 环境变量参数，保持顺序
fn parse_env_pairs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| {
                    EsutilError::InvalidArgument(format!(
                        "Invalid --env entry '{}', expected KEY=VALUE",
                        pair
                    ))
                })
        })
        .collect()
}

/// 替换 exciting input.xml 中的 ngridk 属性
///
/// 返回 (新文本, 是否发生替换)
fn set_ngridk_attribute(xml: &str, divisions: &str) -> Result<(String, bool)> {
    let parts: Vec<usize> = divisions
        .to_lowercase()
        .split(['x', ','])
        .map(|s| s.trim().parse())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| EsutilError::InvalidArgument(format!("Invalid ngridk: '{}'", divisions)))?;

    if parts.len() != 3 {
        return Err(EsutilError::InvalidArgument(format!(
            "ngridk needs 3 divisions, got '{}'",
            divisions
        )));
    }

    let attribute = format!(r#"ngridk="{} {} {}""#, parts[0], parts[1], parts[2]);
    let pattern = Regex::new(r#"ngridk\s*=\s*"[^"]*""#).unwrap();

    if pattern.is_match(xml) {
        Ok((pattern.replace_all(xml, attribute.as_str()).to_string(), true))
    } else {
        Ok((xml.to_string(), false))
    }
}
