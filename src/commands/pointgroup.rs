//! # pointgroup 命令实现
//!
//! 查询 JSON 点群数据表。
//!
//! ## 功能
//! - 列出数据表中的所有点群
//! - 查询单个点群的共轭类与不可约表示
//!
//! ## 依赖关系
//! - 使用 `cli/pointgroup.rs` 定义的参数
//! - 使用 `parsers/pointgroup.rs`
//! - 使用 `utils/output.rs`

use crate::cli::pointgroup::PointgroupArgs;
use crate::error::Result;
use crate::parsers::pointgroup::{lookup, parse_pointgroup_file, PointGroupTable};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 点群列表行
#[derive(Debug, Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Order")]
    order: usize,
    #[tabled(rename = "Classes")]
    classes: usize,
    #[tabled(rename = "Irreps")]
    irreps: usize,
}

/// 类/表示对照行
#[derive(Debug, Tabled)]
struct DetailRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Irrep")]
    irrep: String,
}

/// 执行 pointgroup 命令
pub fn execute(args: PointgroupArgs) -> Result<()> {
    output::print_header("Point Group Lookup");

    let table = parse_pointgroup_file(&args.data)?;

    match &args.group {
        Some(label) => print_group(&table, label),
        None => {
            print_listing(&table);
            Ok(())
        }
    }
}

/// 打印所有点群的概要
fn print_listing(table: &PointGroupTable) {
    let rows: Vec<GroupRow> = table
        .iter()
        .map(|(label, pg)| GroupRow {
            group: label.clone(),
            order: pg.order,
            classes: pg.classes.len(),
            irreps: pg.irreps.len(),
        })
        .collect();

    println!("{}", Table::new(&rows));
    output::print_done(&format!("{} point groups in table", table.len()));
}

/// 打印单个点群的详情
fn print_group(table: &PointGroupTable, label: &str) -> Result<()> {
    let pg = lookup(table, label)?;

    output::print_kv("Group", label);
    output::print_kv("Order", &pg.order.to_string());
    println!();

    let max_rows = pg.classes.len().max(pg.irreps.len());
    let rows: Vec<DetailRow> = (0..max_rows)
        .map(|i| DetailRow {
            index: i + 1,
            class: pg.classes.get(i).cloned().unwrap_or_default(),
            irrep: pg.irreps.get(i).cloned().unwrap_or_default(),
        })
        .collect();

    println!("{}", Table::new(&rows));
    Ok(())
}
