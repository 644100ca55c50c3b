//! Random plan search (§4.E "Random plan").
//!
//! Conflict groups are resolved and removed permanently once visited: after
//! a group's winner is committed, none of that group's members (winner or
//! not) are considered again. This is the resolved reading of an ambiguous
//! point in the original implementation (see DESIGN.md).

use cirw_ir::Operator;
use rand::Rng;

use crate::candidate::{Candidate, Metric};
use crate::error::EngineResult;
use crate::plan::Plan;

pub fn plan<R: Rng>(candidates: Vec<Candidate>, metric: Metric, operators: &[Operator], rng: &mut R) -> EngineResult<Plan> {
    let mut remaining = candidates;
    let mut selected: Vec<Candidate> = Vec::new();
    let mut saving: i64 = 0;

    while !remaining.is_empty() {
        let mut group: Vec<Candidate> = Vec::new();
        let mut rest: Vec<Candidate> = Vec::new();
        let mut drained = remaining.into_iter();
        let head = drained.next().expect("checked non-empty above");
        let is_head_conflict = |c: &Candidate| c.conflicts_with(&head);
        for candidate in drained {
            if is_head_conflict(&candidate) {
                group.push(candidate);
            } else {
                rest.push(candidate);
            }
        }
        group.insert(0, head);

        let winner_idx = if group.len() == 1 { 0 } else { rng.gen_range(0..group.len()) };
        let winner = group.swap_remove(winner_idx);
        saving += winner.delta(metric, operators)?;

        // `rest` only excluded candidates conflicting with `head`; when the
        // winner isn't `head` itself, `rest` can still hold candidates that
        // overlap the winner's actual position set and must be dropped too.
        rest.retain(|c| !c.conflicts_with(&winner));
        selected.push(winner);

        remaining = rest;
    }

    Ok(Plan::new(selected, saving))
}
