//! Monte-Carlo plan search (§4.E "Monte-Carlo plan (MCM)").

use std::collections::HashSet;

use cirw_ir::Operator;
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::candidate::{Candidate, Metric};
use crate::error::EngineResult;
use crate::plan::Plan;

const SIMULATION_TIMES: usize = 10;
const SIMULATION_SIZE: usize = 10;

pub fn plan<R: Rng>(candidates: Vec<Candidate>, metric: Metric, operators: &[Operator], rng: &mut R) -> EngineResult<Plan> {
    let mut is_selected = vec![false; candidates.len()];
    let mut selected_idx: Vec<usize> = Vec::new();
    let mut saving: i64 = 0;

    loop {
        let head_idx = candidates.iter().enumerate().position(|(i, c)| {
            !is_selected[i] && !selected_idx.iter().any(|&s| candidates[s].conflicts_with(c))
        });
        let head_idx = match head_idx {
            Some(i) => i,
            None => break,
        };

        let mut targets = vec![head_idx];
        for i in (head_idx + 1)..candidates.len() {
            if is_selected[i] {
                continue;
            }
            if candidates[i].conflicts_with(&candidates[head_idx]) {
                targets.push(i);
            } else {
                break;
            }
        }

        let winner_idx = if targets.len() == 1 {
            targets[0]
        } else {
            let mut values = Vec::with_capacity(targets.len());
            for &idx in &targets {
                values.push(simulate(&candidates, idx, metric, operators, rng)?);
            }
            let max_value = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let tied: Vec<usize> = targets
                .iter()
                .zip(&values)
                .filter(|(_, &v)| v >= max_value - f64::EPSILON)
                .map(|(&i, _)| i)
                .collect();
            tied[rng.gen_range(0..tied.len())]
        };

        saving += candidates[winner_idx].delta(metric, operators)?;
        is_selected[winner_idx] = true;
        selected_idx.push(winner_idx);
    }

    let winners: HashSet<usize> = selected_idx.into_iter().collect();
    let chosen: Vec<Candidate> =
        candidates.into_iter().enumerate().filter(|(i, _)| winners.contains(i)).map(|(_, c)| c).collect();

    Ok(Plan::new(chosen, saving))
}

/// The mean value of `SIMULATION_TIMES` independent rollouts starting from
/// `target`, plus `target`'s own delta, used only to rank candidates within
/// a conflict group.
fn simulate<R: Rng>(
    candidates: &[Candidate],
    target_idx: usize,
    metric: Metric,
    operators: &[Operator],
    rng: &mut R,
) -> EngineResult<f64> {
    let mut total = 0.0;
    for _ in 0..SIMULATION_TIMES {
        total += rollout(candidates, target_idx, metric, operators, rng)?;
    }
    let mean = total / SIMULATION_TIMES as f64;
    Ok(mean + candidates[target_idx].delta(metric, operators)? as f64)
}

fn rollout<R: Rng>(
    candidates: &[Candidate],
    target_idx: usize,
    metric: Metric,
    operators: &[Operator],
    rng: &mut R,
) -> EngineResult<f64> {
    let target = &candidates[target_idx];
    let cap = (target.begin() + SIMULATION_SIZE).min(operators.len());

    let mut pool: Vec<&Candidate> = candidates[(target_idx + 1)..].iter().filter(|c| c.end() < cap).collect();

    let mut applied: FxHashSet<usize> = target.positions().iter().copied().collect();
    let mut value = target.delta(metric, operators)? as f64;
    pool.retain(|c| !c.positions().iter().any(|p| applied.contains(p)));

    while !pool.is_empty() {
        let deltas: Vec<f64> =
            pool.iter().map(|c| c.delta(metric, operators).map(|d| d as f64)).collect::<EngineResult<_>>()?;
        let total: f64 = deltas.iter().sum();

        let chosen = if pool.len() == 1 {
            0
        } else if total <= 0.0 {
            rng.gen_range(0..pool.len())
        } else {
            let draw: f64 = rng.gen::<f64>();
            let mut cumulative = 0.0;
            let mut chosen = pool.len() - 1;
            for (i, &d) in deltas.iter().enumerate() {
                cumulative += d / total;
                if draw < cumulative {
                    chosen = i;
                    break;
                }
            }
            chosen
        };

        let picked = pool.remove(chosen);
        value += picked.delta(metric, operators)? as f64;
        applied.extend(picked.positions().iter().copied());
        pool.retain(|c| !c.positions().iter().any(|p| applied.contains(p)));
    }

    Ok(value)
}
