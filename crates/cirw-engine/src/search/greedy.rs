//! Greedy plan search (§4.E "Greedy plan").

use cirw_ir::Operator;

use crate::candidate::{Candidate, Metric};
use crate::error::EngineResult;
use crate::plan::Plan;

pub fn plan(mut candidates: Vec<Candidate>, metric: Metric, operators: &[Operator]) -> EngineResult<Plan> {
    candidates.sort_by(|a, b| a.begin().cmp(&b.begin()).then(a.size().cmp(&b.size())).then(a.end().cmp(&b.end())));

    let mut selected: Vec<Candidate> = Vec::new();
    let mut saving: i64 = 0;

    for candidate in candidates {
        if selected.iter().any(|s| s.conflicts_with(&candidate)) {
            continue;
        }
        saving += candidate.delta(metric, operators)?;
        selected.push(candidate);
    }

    Ok(Plan::new(selected, saving))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirw_ir::pattern::{Pattern, RawRule};
    use cirw_ir::Kind;

    fn pattern(src_json: &str, dst_json: &str) -> &'static Pattern {
        let raw = RawRule {
            src: serde_json::from_str(src_json).unwrap(),
            dst: serde_json::from_str(dst_json).unwrap(),
        };
        Box::leak(Box::new(Pattern::from_raw(raw).unwrap()))
    }

    #[test]
    fn greedy_accumulates_disjoint_candidates() {
        // seed scenario 5: "xcxhxcx" with conflicting matches at {0,1,2} and
        // {4,5,6} -- both disjoint, greedy must take both.
        let p = pattern(r#"[["x",[0]],["cx",[0,1]],["x",[0]]]"#, r#"[["cx",[0,1]]]"#);
        let ops: Vec<Operator> = vec![
            Operator::new(Kind::X, vec![0], String::new(), 0).unwrap(),
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 1).unwrap(),
            Operator::new(Kind::X, vec![0], String::new(), 2).unwrap(),
            Operator::new(Kind::H, vec![2], String::new(), 3).unwrap(),
            Operator::new(Kind::X, vec![0], String::new(), 4).unwrap(),
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 5).unwrap(),
            Operator::new(Kind::X, vec![0], String::new(), 6).unwrap(),
        ];
        let a = Candidate::validate(p, vec![0, 1, 2], &ops).unwrap();
        let b = Candidate::validate(p, vec![4, 5, 6], &ops).unwrap();
        let result = plan(vec![a, b], Metric::Cycle, &ops).unwrap();
        assert_eq!(result.candidates().len(), 2);
    }

    proptest::proptest! {
        #[test]
        fn selected_candidates_are_pairwise_disjoint(
            starts in proptest::collection::vec(0usize..30, 1..12),
        ) {
            let p = pattern(r#"[["x",[0]]]"#, "[]");
            let mut ops = Vec::new();
            for i in 0..40 {
                ops.push(Operator::new(Kind::X, vec![0], String::new(), i as u64).unwrap());
            }

            let candidates: Vec<Candidate> = starts
                .iter()
                .map(|&s| Candidate::validate(p, vec![s], &ops).unwrap())
                .collect();

            let result = plan(candidates, Metric::Cycle, &ops).unwrap();
            let selected = result.candidates();
            for i in 0..selected.len() {
                for j in (i + 1)..selected.len() {
                    prop_assert!(!selected[i].conflicts_with(&selected[j]));
                }
            }
        }
    }
}
