//! Expansion pass: per-operator, non-suffix rewrite of composite gates
//! into their constituent operators (§4.C "Expansion pass").

use cirw_ir::Operator;

use crate::error::EngineResult;
use crate::passes::rewrite_per_operator;
use crate::rules::{self, RuleFamily, System};

/// Expansion patterns are loaded for all three systems eagerly, since an
/// expansion pass may run before the working system is fixed -- `rules::load`
/// already memoizes each system independently, so no separate eager-load
/// step is needed here beyond touching all three once at startup.
pub fn preload_all_systems() -> EngineResult<()> {
    for system in [System::Ibm, System::Surface, System::U] {
        rules::load(system, RuleFamily::Expansion)?;
    }
    Ok(())
}

pub fn run(operators: Vec<Operator>, system: System) -> EngineResult<Vec<Operator>> {
    let patterns = rules::load(system, RuleFamily::Expansion)?;
    rewrite_per_operator(operators, patterns)
}
