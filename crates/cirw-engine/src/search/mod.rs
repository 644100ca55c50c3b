//! Turning a flat candidate list into one conflict-free [`Plan`] (§4.E).

mod greedy;
mod mcm;
mod random;

use cirw_ir::Operator;
use rand::Rng;

use crate::candidate::{Candidate, Metric};
use crate::error::EngineResult;
use crate::plan::Plan;

/// Which search strategy picks a plan from a candidate list. `None` maps to
/// greedy per §4.F (`execute`'s `strategy: None -> greedy` default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Greedy,
    Random,
    Mcm,
}

impl Strategy {
    pub fn parse(name: Option<&str>) -> Option<Strategy> {
        match name {
            None => Some(Strategy::Greedy),
            Some("MCM") => Some(Strategy::Mcm),
            Some("random") => Some(Strategy::Random),
            _ => None,
        }
    }
}

/// Build exactly one plan from `candidates` using `strategy` (§4.E "Open
/// question": greedy is fixed to emit exactly one plan object).
pub fn search<R: Rng>(
    strategy: Strategy,
    candidates: Vec<Candidate>,
    metric: Metric,
    operators: &[Operator],
    rng: &mut R,
) -> EngineResult<Plan> {
    match strategy {
        Strategy::Greedy => greedy::plan(candidates, metric, operators),
        Strategy::Random => random::plan(candidates, metric, operators, rng),
        Strategy::Mcm => mcm::plan(candidates, metric, operators, rng),
    }
}
