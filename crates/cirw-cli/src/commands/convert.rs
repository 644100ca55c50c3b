//! `cirw convert-rules`: migrate a rule family's JSON file between systems,
//! offline (§4.C "A `convert` utility... pre-generates a migrated system's
//! rule files from IBM-native ones").

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cirw_engine::passes::convert;
use cirw_engine::rules::{self, RuleFamily};
use cirw_ir::pattern::Pattern;
use clap::Args;
use console::style;
use serde_json::json;

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Rule family to convert.
    #[arg(long, value_parser = ["reversible", "hadamard", "commutation", "pattern", "expansion"])]
    family: String,

    /// Source system the input file is expressed in.
    #[arg(long)]
    from: String,

    /// Target system to migrate the rules to.
    #[arg(long)]
    to: String,

    /// Where to write the migrated rule file.
    #[arg(short, long)]
    output: PathBuf,
}

fn parse_family(value: &str) -> RuleFamily {
    match value {
        "reversible" => RuleFamily::Reversible,
        "hadamard" => RuleFamily::Hadamard,
        "commutation" => RuleFamily::Commutation,
        "pattern" => RuleFamily::Pattern,
        "expansion" => RuleFamily::Expansion,
        other => unreachable!("clap value_parser restricts to known families, got {other}"),
    }
}

pub fn execute(args: ConvertArgs) -> Result<()> {
    let family = parse_family(&args.family);
    let from = crate::options::parse_system(&args.from)?;
    let to = crate::options::parse_system(&args.to)?;

    let patterns = rules::load(from, family)?;
    let migration = rules::load_migration(from, to)?;

    let migrated = convert::migrate_rule_file(patterns, &migration);

    let json_rules: Vec<_> = migrated.iter().map(pattern_to_json).collect();
    let body = serde_json::to_string_pretty(&json_rules).context("serializing migrated rule file")?;
    fs::write(&args.output, body).with_context(|| format!("writing {}", args.output.display()))?;

    eprintln!(
        "{} {} rules migrated from {from} to {to}, written to {}",
        style("converted:").green().bold(),
        migrated.len(),
        args.output.display(),
    );

    Ok(())
}

/// Render a letter-normalized [`Pattern`] back to the `{src, dst}` tuple-list
/// shape rule files use, substituting each letter for its numeric index so
/// the file is re-loadable by [`Pattern::from_raw`] (which will then
/// re-normalize it, a no-op on already-dense letter indices).
fn pattern_to_json(pattern: &Pattern) -> serde_json::Value {
    let render = |templates: &[cirw_ir::pattern::Template]| -> serde_json::Value {
        json!(templates
            .iter()
            .map(|t| {
                let operands: Vec<u32> = t.operands.iter().map(|&letter| letter as u32).collect();
                if t.angle.is_empty() {
                    json!((t.kind.token(), operands))
                } else {
                    json!((t.kind.token(), operands, t.angle))
                }
            })
            .collect::<Vec<_>>())
    };

    json!({
        "src": render(&pattern.src),
        "dst": render(&pattern.dst),
    })
}

