//! Candidate validation and cost estimation (§4.E).

use std::cell::Cell;

use rustc_hash::FxHashSet;

use cirw_ir::pattern::Pattern;
use cirw_ir::Operator;

use crate::error::EngineResult;

/// Which cost model `Candidate::delta` evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Cycle,
    Depth,
}

/// Depth-delta simulation excises this many operators on each side of the
/// candidate's span before re-measuring depth (§4.E "Cost").
const DEPTH_WINDOW: usize = 20;

/// A pattern bound to a specific, validated, non-contiguous position list
/// in a circuit's draft.
pub struct Candidate {
    pattern: &'static Pattern,
    positions: Vec<usize>,
    cycle_saving: i64,
    depth_delta: Cell<Option<i64>>,
}

impl Candidate {
    /// Validate a position list produced by [`crate::positioning::find_positions`]
    /// against `operators` and build a `Candidate` iff it survives both
    /// checks in §4.E: pattern binding, and the position-sensitivity rule
    /// over every intervening operator not in the position list.
    pub fn validate(pattern: &'static Pattern, positions: Vec<usize>, operators: &[Operator]) -> Option<Candidate> {
        let ops: Vec<&Operator> = positions.iter().map(|&i| &operators[i]).collect();
        pattern.bind(&ops)?;

        let mut q_target: FxHashSet<u32> = FxHashSet::default();
        let mut q_all: FxHashSet<u32> = FxHashSet::default();
        for (op, template) in ops.iter().zip(pattern.src.iter()) {
            for (slot, &qubit) in op.operands().iter().enumerate() {
                q_all.insert(qubit);
                if !template.kind.is_control_slot(slot) {
                    q_target.insert(qubit);
                }
            }
        }

        let begin = *positions.first()?;
        let end = *positions.last()?;
        let in_pattern: FxHashSet<usize> = positions.iter().copied().collect();

        for idx in begin..=end {
            if in_pattern.contains(&idx) {
                continue;
            }
            let op = &operators[idx];
            if op.is_abandoned() {
                continue;
            }
            // Generalized sensitivity rule: a control-slot operand must not
            // land in Q_target, a target-slot operand must not land in
            // Q_all. For 1-qubit gates every slot is "target", which
            // reduces to the spec's literal 1-operand case; for 2-qubit
            // gates slot 0 is control and slot 1 is target, the literal
            // 2-operand case; 3-qubit gates (ccx) extend the same rule.
            for (slot, &qubit) in op.operands().iter().enumerate() {
                let rejects = if op.kind().is_control_slot(slot) {
                    q_target.contains(&qubit)
                } else {
                    q_all.contains(&qubit)
                };
                if rejects {
                    return None;
                }
            }
        }

        Some(Candidate {
            pattern,
            positions,
            cycle_saving: pattern.cycle_saving(),
            depth_delta: Cell::new(None),
        })
    }

    pub fn pattern(&self) -> &'static Pattern {
        self.pattern
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn begin(&self) -> usize {
        self.positions[0]
    }

    pub fn end(&self) -> usize {
        *self.positions.last().expect("candidate always has at least one position")
    }

    pub fn size(&self) -> usize {
        self.positions.len()
    }

    /// Two candidates conflict iff their position sets intersect (§4.E).
    pub fn conflicts_with(&self, other: &Candidate) -> bool {
        let theirs: FxHashSet<usize> = other.positions.iter().copied().collect();
        self.positions.iter().any(|p| theirs.contains(p))
    }

    /// `candidate.delta(metric, circuit)` (§4.E "Cost"). The depth metric's
    /// result is memoized after first computation.
    pub fn delta(&self, metric: Metric, operators: &[Operator]) -> EngineResult<i64> {
        match metric {
            Metric::Cycle => Ok(self.cycle_saving),
            Metric::Depth => {
                if let Some(cached) = self.depth_delta.get() {
                    return Ok(cached);
                }
                let value = self.compute_depth_delta(operators)?;
                self.depth_delta.set(Some(value));
                Ok(value)
            }
        }
    }

    fn compute_depth_delta(&self, operators: &[Operator]) -> EngineResult<i64> {
        let window_start = self.begin().saturating_sub(DEPTH_WINDOW);
        let window_end = (self.end() + 1 + DEPTH_WINDOW).min(operators.len());

        let mut window: Vec<Operator> = operators[window_start..window_end].to_vec();
        let depth_before = cirw_ir::CircuitInfo::compute(&window)?.depth;

        let local_positions: Vec<usize> = self.positions.iter().map(|&p| p - window_start).collect();
        let local = Candidate {
            pattern: self.pattern,
            positions: local_positions,
            cycle_saving: self.cycle_saving,
            depth_delta: Cell::new(None),
        };
        local.apply(&mut window)?;

        let depth_after = cirw_ir::CircuitInfo::compute(&window)?.depth;
        Ok(depth_after as i64 - depth_before as i64 + 1)
    }

    /// Apply this candidate's rewrite in place (§4.E "Apply" steps 1-2):
    /// re-bind to get fresh `books`, then for each destination template
    /// (paired slot-for-slot with a source position) call `change`; any
    /// source position beyond the destination's length is abandoned.
    /// Assumes `pattern.dst.len() <= pattern.src.len()`, true of every rule
    /// family loaded for non-local pattern search (reduction/commutation
    /// rules never grow the operator count at a single site — growth is
    /// the expansion pass's job, which runs its own per-operator rewrite).
    pub fn apply(&self, operators: &mut [Operator]) -> EngineResult<()> {
        let ops: Vec<&Operator> = self.positions.iter().map(|&i| &operators[i]).collect();
        let books = self.pattern.bind(&ops).expect("candidate was validated at construction");

        for (i, &pos) in self.positions.iter().enumerate() {
            if let Some(template) = self.pattern.dst.get(i) {
                let operands = Pattern::resolve_operands(template, &books);
                operators[pos].change(template.kind, operands, template.angle.clone())?;
            } else {
                let creation_index = operators[pos].creation_index();
                operators[pos] = Operator::abandoned(creation_index);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cirw_ir::pattern::RawRule;
    use cirw_ir::Kind;

    fn pattern(src_json: &str, dst_json: &str) -> &'static Pattern {
        let raw = RawRule {
            src: serde_json::from_str(src_json).unwrap(),
            dst: serde_json::from_str(dst_json).unwrap(),
        };
        Box::leak(Box::new(Pattern::from_raw(raw).unwrap()))
    }

    #[test]
    fn validates_non_local_cc_cancellation() {
        let p = pattern(r#"[["cx",[0,1]],["cx",[0,1]]]"#, "[]");
        let ops = vec![
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 0).unwrap(),
            Operator::new(Kind::H, vec![2], String::new(), 1).unwrap(),
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 2).unwrap(),
        ];
        let candidate = Candidate::validate(p, vec![0, 2], &ops);
        assert!(candidate.is_some());
    }

    #[test]
    fn rejects_when_intervening_operator_touches_target_qubit() {
        let p = pattern(r#"[["cx",[0,1]],["cx",[0,1]]]"#, "[]");
        let ops = vec![
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 0).unwrap(),
            Operator::new(Kind::H, vec![1], String::new(), 1).unwrap(),
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 2).unwrap(),
        ];
        assert!(Candidate::validate(p, vec![0, 2], &ops).is_none());
    }

    #[test]
    fn apply_abandons_extra_source_positions() {
        let p = pattern(r#"[["cx",[0,1]],["cx",[0,1]]]"#, "[]");
        let mut ops = vec![
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 0).unwrap(),
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 1).unwrap(),
        ];
        let candidate = Candidate::validate(p, vec![0, 1], &ops).unwrap();
        candidate.apply(&mut ops).unwrap();
        assert!(ops[0].is_abandoned());
        assert!(ops[1].is_abandoned());
    }

    #[test]
    fn conflicting_candidates_share_a_position() {
        let p = pattern(r#"[["cx",[0,1]],["cx",[0,1]]]"#, "[]");
        let ops = vec![
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 0).unwrap(),
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 1).unwrap(),
            Operator::new(Kind::Cx, vec![0, 1], String::new(), 2).unwrap(),
        ];
        let a = Candidate::validate(p, vec![0, 1], &ops).unwrap();
        let b = Candidate::validate(p, vec![1, 2], &ops).unwrap();
        assert!(a.conflicts_with(&b));
    }
}
