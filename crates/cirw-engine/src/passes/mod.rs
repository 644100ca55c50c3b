//! Sliding-window and per-operator rewrite passes (§4.C).

pub mod commutation;
pub mod convert;
pub mod expansion;
pub mod migration;
pub mod reduction;

use std::collections::VecDeque;

use cirw_ir::pattern::Pattern;
use cirw_ir::Operator;

use crate::error::EngineResult;
use crate::rules::System;

/// One optimization turn: reduction then commutation (§4.C "Composite
/// optimization"). The circuit engine repeats this up to `iteration = 3`
/// times, with a final reduction pass once a turn stops changing the draft.
pub fn optimize(operators: Vec<Operator>, system: System) -> EngineResult<Vec<Operator>> {
    let operators = reduction::run(operators, system)?;
    let operators = commutation::run(operators, system)?;
    Ok(operators)
}

/// A read-only view of the buffer's most recent `size` operators, in order.
pub(crate) fn suffix_refs(buffer: &VecDeque<Operator>, size: usize) -> Vec<&Operator> {
    let skip = buffer.len() - size;
    buffer.iter().skip(skip).collect()
}

/// The sliding-window discipline shared by reduction and commutation
/// (§4.C): append each incoming operator, flush from the front whenever
/// the buffer exceeds `max_rule_size`, and repeatedly offer the buffer to
/// `try_match` (which performs the pass-specific suffix rewrite and
/// reports whether it fired) as long as the buffer holds at least
/// `min_rule_size` operators.
pub(crate) fn slide_window<F>(operators: Vec<Operator>, max_rule_size: usize, min_rule_size: usize, mut try_match: F) -> Vec<Operator>
where
    F: FnMut(&mut VecDeque<Operator>) -> bool,
{
    let min_rule_size = min_rule_size.max(1);
    let mut buffer: VecDeque<Operator> = VecDeque::new();
    let mut output = Vec::with_capacity(operators.len());

    for operator in operators {
        buffer.push_back(operator);
        while buffer.len() > max_rule_size {
            output.push(buffer.pop_front().expect("buffer non-empty by loop condition"));
        }
        while buffer.len() >= min_rule_size && try_match(&mut buffer) {}
    }

    while let Some(op) = buffer.pop_front() {
        output.push(op);
    }
    output
}

/// Shared per-operator rewrite: for each operator, find the first pattern
/// whose single source template matches it by kind (and any angle
/// constraint), and splice in the destination templates' instantiated
/// operators in its place. Used by both [`expansion`] and [`migration`],
/// whose rule shapes (one source template, N destination templates) are
/// identical even though their rule *sources* differ (§4.C).
pub(crate) fn rewrite_per_operator(operators: Vec<Operator>, patterns: &[Pattern]) -> EngineResult<Vec<Operator>> {
    let mut next_index = operators.iter().map(Operator::creation_index).max().map(|m| m + 1).unwrap_or(0);
    let mut output = Vec::with_capacity(operators.len());

    for operator in operators {
        let mut rewritten = false;
        for pattern in patterns {
            if pattern.src.len() != 1 || pattern.src[0].kind != operator.kind() {
                continue;
            }
            if let Some(books) = pattern.bind(&[&operator]) {
                for template in &pattern.dst {
                    let operands = Pattern::resolve_operands(template, &books);
                    output.push(Operator::new(template.kind, operands, template.angle.clone(), next_index)?);
                    next_index += 1;
                }
                rewritten = true;
                break;
            }
        }
        if !rewritten {
            output.push(operator);
        }
    }

    Ok(output)
}
