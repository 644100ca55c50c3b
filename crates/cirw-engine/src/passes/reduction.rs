//! Reduction pass: `reversible` and `hadamard` rule families, applied
//! against the buffer's suffix each step (§4.C "Reduction pass").

use std::collections::VecDeque;

use cirw_ir::pattern::Pattern;
use cirw_ir::Operator;

use crate::error::EngineResult;
use crate::passes::{slide_window, suffix_refs};
use crate::rules::{self, RuleFamily, System};

pub fn run(operators: Vec<Operator>, system: System) -> EngineResult<Vec<Operator>> {
    let reversible = rules::load(system, RuleFamily::Reversible)?;
    let hadamard = rules::load(system, RuleFamily::Hadamard)?;
    let families: [&[Pattern]; 2] = [reversible, hadamard];

    let sizes = families.iter().flat_map(|f| f.iter()).map(Pattern::size);
    let max_rule_size = sizes.clone().max().unwrap_or(1);
    let min_rule_size = sizes.min().unwrap_or(1);

    let mut next_index = operators.iter().map(Operator::creation_index).max().map(|m| m + 1).unwrap_or(0);

    Ok(slide_window(operators, max_rule_size, min_rule_size, move |buffer| {
        try_reduce(buffer, &families, &mut next_index)
    }))
}

fn try_reduce(buffer: &mut VecDeque<Operator>, families: &[&[Pattern]], next_index: &mut u64) -> bool {
    for family in families {
        for pattern in family.iter() {
            let size = pattern.size();
            if size == 0 || buffer.len() < size {
                continue;
            }
            let ops = suffix_refs(buffer, size);
            if let Some(books) = pattern.bind(&ops) {
                for _ in 0..size {
                    buffer.pop_back();
                }
                for template in &pattern.dst {
                    let operands = Pattern::resolve_operands(template, &books);
                    let op = Operator::new(template.kind, operands, template.angle.clone(), *next_index)
                        .expect("rule template arity matches its kind");
                    *next_index += 1;
                    buffer.push_back(op);
                }
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirw_ir::Kind;

    #[test]
    fn cancels_adjacent_cx_pair() {
        // seed scenario 2: draft "cc", both cx operands [0,1] -> empty
        let ops = vec![
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 0).unwrap(),
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 1).unwrap(),
        ];
        let result = run(ops, System::Ibm).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn reduces_hadamard_z_sandwich() {
        // seed scenario 1: draft "hsh" -> "S" via h;s;h -> sdg
        let ops = vec![
            Operator::new(Kind::H, vec![0], String::new(), 0).unwrap(),
            Operator::new(Kind::S, vec![0], String::new(), 1).unwrap(),
            Operator::new(Kind::H, vec![0], String::new(), 2).unwrap(),
        ];
        let result = run(ops, System::Ibm).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].kind(), Kind::Sdg);
    }
}
