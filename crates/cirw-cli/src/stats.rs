//! Per-run stats rows and their CSV export (§6 "Stats output"): a
//! two-row grouped header plus one `before/after/reduce` row per file.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use cirw_engine::Metric;
use cirw_ir::CircuitInfo;

/// One file's before/after summary, ready to render as a CSV row.
#[derive(Debug, Clone)]
pub struct StatRow {
    pub file: String,
    pub size_before: usize,
    pub size_after: usize,
    pub metric_before: i64,
    pub metric_after: i64,
    pub sqg_before: usize,
    pub sqg_after: usize,
    pub mqg_before: usize,
    pub mqg_after: usize,
    pub elapsed: Duration,
}

fn metric_value(info: &CircuitInfo, metric: Metric) -> i64 {
    match metric {
        Metric::Cycle => info.cycle as i64,
        Metric::Depth => info.depth as i64,
    }
}

impl StatRow {
    pub fn new(file: impl Into<String>, metric: Metric, origin: &CircuitInfo, result: &CircuitInfo, elapsed: Duration) -> StatRow {
        StatRow {
            file: file.into(),
            size_before: origin.size,
            size_after: result.size,
            metric_before: metric_value(origin, metric),
            metric_after: metric_value(result, metric),
            sqg_before: origin.sqg_num,
            sqg_after: result.sqg_num,
            mqg_before: origin.mqg_num,
            mqg_after: result.mqg_num,
            elapsed,
        }
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.file.clone(),
            self.size_before.to_string(),
            self.size_after.to_string(),
            reduce_cell(self.size_before as i64, self.size_after as i64),
            self.metric_before.to_string(),
            self.metric_after.to_string(),
            reduce_cell(self.metric_before, self.metric_after),
            self.sqg_before.to_string(),
            self.sqg_after.to_string(),
            reduce_cell(self.sqg_before as i64, self.sqg_after as i64),
            self.mqg_before.to_string(),
            self.mqg_after.to_string(),
            reduce_cell(self.mqg_before as i64, self.mqg_after as i64),
            format!("{:.3}s", self.elapsed.as_secs_f64()),
        ]
    }
}

/// `N(pp.pp%)`, or `N(-)` when `before` is zero (avoids a divide by zero).
fn reduce_cell(before: i64, after: i64) -> String {
    let reduced = before - after;
    if before == 0 {
        format!("{reduced}(-)")
    } else {
        let percent = reduced as f64 / before as f64 * 100.0;
        format!("{reduced}({percent:.2}%)")
    }
}

const GROUP_HEADER: [&str; 14] =
    ["Filename", "Size", "", "", "Metric", "", "", "SQGs", "", "", "MQGs", "", "", "Total Time"];
const SUB_HEADER: [&str; 14] =
    ["", "before", "after", "reduce", "before", "after", "reduce", "before", "after", "reduce", "before", "after", "reduce", ""];

fn write_rows(path: &Path, rows: &[StatRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating stats file {}", path.display()))?;
    writer.write_record(GROUP_HEADER)?;
    writer.write_record(SUB_HEADER)?;
    for row in rows {
        writer.write_record(row.record())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a single row to `path`, creating the file (and header) fresh.
pub fn write_single(path: &Path, row: &StatRow) -> Result<()> {
    write_rows(path, std::slice::from_ref(row))
}

/// Write every accumulated row to `path`, in batch-mode order.
pub fn write_batch(path: &Path, rows: &[StatRow]) -> Result<()> {
    write_rows(path, rows)
}

/// Build the batch stats filename per §6: `MMDDHHmm_<dir>_<optimize>_<strategy>_<system>_<metric>.csv`.
pub fn batch_file_name(dir_label: &str, optimize: bool, strategy: &str, system: &str, metric: &str) -> String {
    let timestamp = Local::now().format("%m%d%H%M");
    let optimize_label = if optimize { "optimize" } else { "no-optimize" };
    format!("{timestamp}_{dir_label}_{optimize_label}_{strategy}_{system}_{metric}.csv")
}
