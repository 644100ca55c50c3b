//! Shared CLI flags and their translation into `cirw_engine::RunOptions`.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use cirw_engine::{DepthSizeFilter, Metric, RunOptions, Strategy, System, SystemPair};
use clap::Args;

/// Flags common to both `run` and `batch` (§9 "Recognized options").
#[derive(Debug, Args, Clone)]
pub struct SharedOptions {
    /// Skip the optimize/search loop; only run expansion and migration.
    #[arg(long)]
    pub no_optimize: bool,

    /// Plan search strategy: omit for greedy, or "MCM" / "random".
    #[arg(long)]
    pub strategy: Option<String>,

    /// Cost metric driving candidate/plan search.
    #[arg(long, default_value = "cycle")]
    pub metric: String,

    /// Gate set, or "SRC:DST" to request migration, e.g. "IBM:Surface".
    #[arg(long, default_value = "IBM")]
    pub system: String,

    /// Skip files whose depth size doesn't match this filter.
    #[arg(long, default_value = "all")]
    pub depth_size: String,

    /// Write per-run stats as a CSV row to this path.
    #[arg(long)]
    pub stat: Option<PathBuf>,

    /// Redirect this run's structured log output to a file instead of stderr.
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Directory batch-mode per-file logs are written under.
    #[arg(long, default_value = "./log/")]
    pub logs: PathBuf,

    /// Seed the random generator driving MCM/random search, for reproducible runs.
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_metric(value: &str) -> Result<Metric> {
    match value {
        "cycle" => Ok(Metric::Cycle),
        "depth" => Ok(Metric::Depth),
        other => Err(anyhow!("unknown metric '{other}', expected 'cycle' or 'depth'")),
    }
}

pub fn parse_strategy(value: Option<&str>) -> Result<Option<Strategy>> {
    match value {
        None => Ok(None),
        Some("MCM") => Ok(Some(Strategy::Mcm)),
        Some("random") => Ok(Some(Strategy::Random)),
        Some(other) => Err(anyhow!("unknown strategy '{other}', expected 'MCM' or 'random'")),
    }
}

pub fn parse_system(value: &str) -> Result<System> {
    System::parse(value).ok_or_else(|| anyhow!("unknown system '{value}', expected IBM, Surface, or U"))
}

pub fn parse_system_pair(value: &str) -> Result<SystemPair> {
    match value.split_once(':') {
        Some((source, target)) => Ok(SystemPair::Pair { source: parse_system(source)?, target: parse_system(target)? }),
        None => Ok(SystemPair::Single(parse_system(value)?)),
    }
}

pub fn parse_depth_size(value: &str) -> Result<DepthSizeFilter> {
    match value {
        "all" => Ok(DepthSizeFilter::All),
        "small" => Ok(DepthSizeFilter::Small),
        "medium" => Ok(DepthSizeFilter::Medium),
        "large" => Ok(DepthSizeFilter::Large),
        other => Err(anyhow!("unknown depth_size filter '{other}'")),
    }
}

impl SharedOptions {
    pub fn to_run_options(&self) -> Result<RunOptions> {
        Ok(RunOptions {
            optimize: !self.no_optimize,
            strategy: parse_strategy(self.strategy.as_deref()).context("parsing --strategy")?,
            metric: parse_metric(&self.metric).context("parsing --metric")?,
            depth_size: parse_depth_size(&self.depth_size).context("parsing --depth-size")?,
            system: parse_system_pair(&self.system).context("parsing --system")?,
            stat: self.stat.clone(),
            log: self.log.clone(),
            logs: self.logs.clone(),
        })
    }
}
