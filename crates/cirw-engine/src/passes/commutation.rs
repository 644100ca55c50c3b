//! Commutation pass: on a suffix match, reverse the matched operators in
//! place rather than replacing them (§4.C "Commutation pass").

use std::collections::VecDeque;

use cirw_ir::pattern::Pattern;
use cirw_ir::Operator;

use crate::error::EngineResult;
use crate::passes::{slide_window, suffix_refs};
use crate::rules::{self, RuleFamily, System};

pub fn run(operators: Vec<Operator>, system: System) -> EngineResult<Vec<Operator>> {
    let commutation = rules::load(system, RuleFamily::Commutation)?;
    let max_rule_size = commutation.iter().map(Pattern::size).max().unwrap_or(1);
    let min_rule_size = commutation.iter().map(Pattern::size).min().unwrap_or(1);

    Ok(slide_window(operators, max_rule_size, min_rule_size, move |buffer| {
        try_commute(buffer, commutation)
    }))
}

fn try_commute(buffer: &mut VecDeque<Operator>, family: &[Pattern]) -> bool {
    for pattern in family {
        let size = pattern.size();
        if size == 0 || buffer.len() < size {
            continue;
        }
        let matches = {
            let ops = suffix_refs(buffer, size);
            pattern.bind(&ops).is_some()
        };
        if matches {
            // Popping from the back `size` times yields the suffix in
            // reverse order already; pushing those straight back reverses
            // the matched run in place.
            let mut reversed = Vec::with_capacity(size);
            for _ in 0..size {
                reversed.push(buffer.pop_back().expect("size checked above"));
            }
            for op in reversed {
                buffer.push_back(op);
            }
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirw_ir::Kind;

    #[test]
    fn reverses_matched_suffix() {
        let ops = vec![
            Operator::new(Kind::Z, vec![0], String::new(), 0).unwrap(),
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 1).unwrap(),
        ];
        let result = run(ops, System::Ibm).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].kind(), Kind::Cx);
        assert_eq!(result[1].kind(), Kind::Z);
    }
}
