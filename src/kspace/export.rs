//! # k 点网格数据导出
//!
//! 导出 k 点网格到 CSV 格式。
//!
//! ## 依赖关系
//! - 被 `commands/kgrid.rs` 调用
//! - 使用 `kspace/grid.rs` 的 KpointGrid 结构
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{EsutilError, Result};
use crate::kspace::KpointGrid;

use std::path::Path;

/// 导出网格为 CSV 格式
pub fn to_csv(grid: &KpointGrid, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path).map_err(EsutilError::CsvError)?;

    wtr.write_record([
        "k1", "k2", "k3", "kx", "ky", "kz", "weight",
    ])
    .map_err(EsutilError::CsvError)?;

    for point in &grid.points {
        wtr.write_record(&[
            format!("{:.8}", point.frac[0]),
            format!("{:.8}", point.frac[1]),
            format!("{:.8}", point.frac[2]),
            format!("{:.8}", point.cart[0]),
            format!("{:.8}", point.cart[1]),
            format!("{:.8}", point.cart[2]),
            format!("{:.8}", point.weight),
        ])
        .map_err(EsutilError::CsvError)?;
    }

    wtr.flush().map_err(|e| EsutilError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
