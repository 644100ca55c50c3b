//! `cirw run`: rewrite a single circuit file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use cirw_ir::Circuit;
use clap::Args;
use console::style;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::options::SharedOptions;
use crate::stats::StatRow;
use crate::{logging, stats};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Circuit file to rewrite.
    input: PathBuf,

    /// Where to write the rewritten circuit. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    shared: SharedOptions,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let source = fs::read_to_string(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let path_str = args.input.to_string_lossy().to_string();

    let options = args.shared.to_run_options()?;
    let system = options.system;
    let mut rng: StdRng = match args.shared.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut circuit = Circuit::from_source(&path_str, &source, system.source().to_string())?;
    let started = Instant::now();
    let shrank = match &args.shared.log {
        Some(log_path) => {
            logging::with_file_scope(log_path, 0, || cirw_engine::execute(&mut circuit, &options, &mut rng))??
        }
        None => cirw_engine::execute(&mut circuit, &options, &mut rng)?,
    };
    let elapsed = started.elapsed();

    let origin = circuit.origin().expect("execute always freezes origin before returning").clone();
    let result = circuit.info()?;

    match &args.output {
        Some(path) => {
            fs::write(path, circuit.render()).with_context(|| format!("writing {}", path.display()))?;
            info!(output = %path.display(), "wrote rewritten circuit");
        }
        None => print!("{}", circuit.render()),
    }

    if let Some(stat_path) = &args.shared.stat {
        let row = StatRow::new(path_str, options.metric, &origin, &result, elapsed);
        stats::write_single(stat_path, &row)?;
    }

    eprintln!(
        "{} {} -> {} operators, depth {} -> {}{}",
        style("done:").green().bold(),
        origin.size,
        result.size,
        origin.depth,
        result.depth,
        if shrank { "" } else { " (no reduction)" },
    );

    Ok(())
}
