//! `cirw batch`: rewrite every circuit file in a directory (§9 "Batch
//! mode"). A per-file `DepthSizeMismatch` is a skip, not a fatal error;
//! the same filter is applied up front via [`CircuitInfo::from_source`]
//! so a rejected file never pays for expansion/migration/optimization.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use cirw_engine::EngineError;
use cirw_ir::{Circuit, CircuitInfo};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;

use crate::options::SharedOptions;
use crate::stats::StatRow;
use crate::{logging, stats};

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Directory of circuit files to rewrite.
    input_dir: PathBuf,

    /// Directory rewritten circuits are written to, mirroring `input_dir`.
    output_dir: PathBuf,

    #[command(flatten)]
    shared: SharedOptions,
}

pub fn execute(args: BatchArgs) -> Result<()> {
    let options = args.shared.to_run_options()?;
    let system = options.system;

    let mut rng: StdRng = match args.shared.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    fs::create_dir_all(&args.output_dir).with_context(|| format!("creating {}", args.output_dir.display()))?;

    let mut entries: Vec<PathBuf> = fs::read_dir(&args.input_dir)
        .with_context(|| format!("reading {}", args.input_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let progress = ProgressBar::new(entries.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for path in &entries {
        progress.set_message(path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string());

        let file_name = path.file_name().expect("filtered to files").to_string_lossy().to_string();
        let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let path_str = path.to_string_lossy().to_string();

        let precheck = CircuitInfo::from_source(&path_str, &source)?;
        if !options.depth_size.matches(precheck.depth_size) {
            warn!(file = %file_name, depth_size = precheck.depth_size.as_str(), "skipped: depth size mismatch");
            skipped += 1;
            progress.inc(1);
            continue;
        }

        let mut circuit = Circuit::from_source(&path_str, &source, system.source().to_string())?;

        let log_path = args.shared.logs.join(format!("{file_name}.log"));
        let started = Instant::now();
        let outcome = logging::with_file_scope(&log_path, 0, || cirw_engine::execute(&mut circuit, &options, &mut rng))?;
        let elapsed = started.elapsed();

        match outcome {
            Ok(_) => {}
            Err(EngineError::DepthSizeMismatch { actual, requested }) => {
                warn!(file = %file_name, actual, requested, "skipped: depth size mismatch");
                skipped += 1;
                progress.inc(1);
                continue;
            }
            Err(other) => return Err(other).with_context(|| format!("rewriting {}", path.display())),
        }

        let origin = circuit.origin().expect("execute always freezes origin before returning").clone();
        let result = circuit.info()?;

        let output_path = args.output_dir.join(&file_name);
        fs::write(&output_path, circuit.render()).with_context(|| format!("writing {}", output_path.display()))?;

        rows.push(StatRow::new(file_name, options.metric, &origin, &result, elapsed));
        progress.inc(1);
    }

    progress.finish_with_message("done");

    if let Some(stat_path) = &args.shared.stat {
        stats::write_batch(stat_path, &rows)?;
        eprintln!("{} wrote {}", style("stats:").cyan().bold(), stat_path.display());
    } else {
        let dir_label = args.input_dir.file_name().and_then(|n| n.to_str()).unwrap_or("batch");
        let strategy = options.strategy.map(|s| format!("{s:?}").to_lowercase()).unwrap_or_else(|| "greedy".to_string());
        let file_name = stats::batch_file_name(dir_label, options.optimize, &strategy, &system.target().to_string(), &args.shared.metric);
        let default_path = args.output_dir.join(file_name);
        stats::write_batch(&default_path, &rows)?;
        eprintln!("{} wrote {}", style("stats:").cyan().bold(), default_path.display());
    }

    eprintln!(
        "{} {} rewritten, {} skipped",
        style("batch done:").green().bold(),
        rows.len(),
        skipped,
    );

    Ok(())
}
