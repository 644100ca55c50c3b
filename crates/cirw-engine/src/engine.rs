//! The outer `execute` orchestration (§4.F) and its typed configuration,
//! `RunOptions` -- the in-library equivalent of the CLI's parsed options.

use std::path::PathBuf;

use cirw_ir::{Circuit, DepthSize};
use rand::Rng;
use tracing::{debug, info, instrument};

use crate::candidate::{Candidate, Metric};
use crate::error::{EngineError, EngineResult};
use crate::passes;
use crate::positioning;
use crate::rules::{self, RuleFamily, System};
use crate::search::{self, Strategy};

/// How many optimization+search turns `execute` runs at most before giving
/// up, even if the draft is still shrinking (§4.F).
const LIMIT: usize = 5;

/// `depth_size` filter applied at load time (§7 "DepthSizeMismatch").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthSizeFilter {
    All,
    Small,
    Medium,
    Large,
}

impl DepthSizeFilter {
    pub fn matches(self, size: DepthSize) -> bool {
        match self {
            DepthSizeFilter::All => true,
            DepthSizeFilter::Small => size == DepthSize::Small,
            DepthSizeFilter::Medium => size == DepthSize::Medium,
            DepthSizeFilter::Large => size == DepthSize::Large,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DepthSizeFilter::All => "all",
            DepthSizeFilter::Small => "small",
            DepthSizeFilter::Medium => "medium",
            DepthSizeFilter::Large => "large",
        }
    }
}

/// `system: System | [SrcSystem, DstSystem]` (§6). A bare system is sugar
/// for "migrate from IBM (the canonical internal system) to this system";
/// `Single(Ibm)` is the default and means no migration at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPair {
    Single(System),
    Pair { source: System, target: System },
}

impl SystemPair {
    pub fn source(self) -> System {
        match self {
            SystemPair::Single(_) => System::Ibm,
            SystemPair::Pair { source, .. } => source,
        }
    }

    pub fn target(self) -> System {
        match self {
            SystemPair::Single(system) => system,
            SystemPair::Pair { target, .. } => target,
        }
    }

    pub fn needs_migration(self) -> bool {
        self.source() != self.target()
    }
}

impl Default for SystemPair {
    fn default() -> Self {
        SystemPair::Single(System::Ibm)
    }
}

/// The typed equivalent of the reference tool's option bag (§9
/// "Configuration"). Constructed programmatically for library use, or from
/// parsed CLI flags in `cirw-cli`.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub optimize: bool,
    pub strategy: Option<Strategy>,
    pub metric: Metric,
    pub depth_size: DepthSizeFilter,
    pub system: SystemPair,
    pub stat: Option<PathBuf>,
    pub log: Option<PathBuf>,
    pub logs: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            optimize: true,
            strategy: None,
            metric: Metric::Cycle,
            depth_size: DepthSizeFilter::All,
            system: SystemPair::default(),
            stat: None,
            log: None,
            logs: PathBuf::from("./log/"),
        }
    }
}

/// Run expansion, migration (if requested), and up to `LIMIT` optimize
/// turns against an already-parsed circuit. Returns `true` iff the draft
/// shrank overall (§4.F).
#[instrument(skip(circuit, rng), fields(system = ?options.system))]
pub fn execute<R: Rng>(circuit: &mut Circuit, options: &RunOptions, rng: &mut R) -> EngineResult<bool> {
    let starting_len = circuit.len();

    let expanded = passes::expansion::run(circuit.operators().to_vec(), options.system.source())?;
    circuit.set_operators(expanded);

    if options.system.needs_migration() {
        info!(source = %options.system.source(), target = %options.system.target(), "migrating circuit");
        let migrated = passes::migration::run(circuit.operators().to_vec(), options.system.source(), options.system.target())?;
        circuit.set_operators(migrated);
        circuit.set_system(options.system.target().to_string());
    }

    circuit.freeze_origin()?;
    let origin = circuit.origin().expect("just frozen above").clone();

    if !options.depth_size.matches(origin.depth_size) {
        return Err(EngineError::DepthSizeMismatch {
            actual: origin.depth_size.as_str().to_string(),
            requested: options.depth_size.as_str().to_string(),
        });
    }

    if !options.optimize {
        return Ok(false);
    }

    let working_system = options.system.target();
    let mut turns = 0;
    loop {
        let changed = run_turn(circuit, working_system, options, rng)?;
        turns += 1;
        debug!(turn = turns, changed, draft_len = circuit.len(), "optimization turn complete");
        if !changed || turns >= LIMIT {
            break;
        }
    }

    Ok(circuit.len() < starting_len)
}

/// One turn: a composite optimize pass (reduction + commutation), then
/// non-local pattern positioning, candidate validation, plan search, and
/// application. Returns whether the draft shrank this turn.
fn run_turn<R: Rng>(circuit: &mut Circuit, system: System, options: &RunOptions, rng: &mut R) -> EngineResult<bool> {
    let before = circuit.len();

    let optimized = passes::optimize(circuit.operators().to_vec(), system)?;
    circuit.set_operators(optimized);

    let pattern_family = rules::load(system, RuleFamily::Pattern)?;
    let mut candidates = Vec::new();
    for pattern in pattern_family {
        for positions in positioning::find_positions(circuit.draft(), &pattern.operator_signature) {
            if let Some(candidate) = Candidate::validate(pattern, positions, circuit.operators()) {
                candidates.push(candidate);
            }
        }
    }

    if !candidates.is_empty() {
        let strategy = options.strategy.unwrap_or(Strategy::Greedy);
        let plan = search::search(strategy, candidates, options.metric, circuit.operators(), rng)?;
        if !plan.is_empty() {
            let mut operators = circuit.operators().to_vec();
            for candidate in plan.candidates() {
                candidate.apply(&mut operators)?;
            }
            circuit.set_operators(operators);
            circuit.update();
        }
    }

    Ok(circuit.len() < before)
}
