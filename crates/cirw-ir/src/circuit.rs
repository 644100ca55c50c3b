//! The circuit: an ordered operator sequence plus its derived draft string,
//! and [`CircuitInfo`], the read-only summary derived from it.

use rustc_hash::FxHashSet;

use crate::error::{IrError, IrResult};
use crate::kind::Kind;
use crate::operator::Operator;
use crate::parser::{self, ParsedCircuit};

/// Internal cap on qubit index used by depth computation (§7
/// `QubitIndexOutOfRange`). Distinct from any particular hardware's qubit
/// count; it exists only to bound the per-qubit layer-depth array.
pub const MAX_QUBITS: u32 = 1000;

/// `depth_size` categories from §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthSize {
    Small,
    Medium,
    Large,
}

impl DepthSize {
    pub fn classify(depth: usize) -> DepthSize {
        if depth <= 100 {
            DepthSize::Small
        } else if depth < 1000 {
            DepthSize::Medium
        } else {
            DepthSize::Large
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DepthSize::Small => "small",
            DepthSize::Medium => "medium",
            DepthSize::Large => "large",
        }
    }
}

/// A derived, read-only summary of an operator sequence (§3).
#[derive(Debug, Clone)]
pub struct CircuitInfo {
    pub size: usize,
    pub qubits_num: usize,
    pub sqg: Vec<Kind>,
    pub mqg: Vec<Kind>,
    pub sqg_num: usize,
    pub mqg_num: usize,
    pub depth: usize,
    pub depth_size: DepthSize,
    pub cycle: usize,
}

impl CircuitInfo {
    /// Parse `source` and compute its info directly, without building a
    /// full [`Circuit`]. Lets a batch driver apply the `depth_size` filter
    /// before paying for expansion/migration/optimization on a file it may
    /// end up skipping anyway.
    pub fn from_source(path: &str, source: &str) -> IrResult<CircuitInfo> {
        let ParsedCircuit { operators, .. } = parser::parse(path, source)?;
        CircuitInfo::compute(&operators)
    }

    pub fn compute(operators: &[Operator]) -> IrResult<CircuitInfo> {
        let mut qubits = FxHashSet::default();
        let mut sqg = FxHashSet::default();
        let mut mqg = FxHashSet::default();
        let mut sqg_num = 0usize;
        let mut mqg_num = 0usize;
        let mut cycle = 0usize;

        for op in operators {
            if op.is_abandoned() {
                continue;
            }
            if op.kind().num_qubits() == 1 {
                sqg.insert(op.kind());
                sqg_num += 1;
            } else {
                mqg.insert(op.kind());
                mqg_num += 1;
            }
            cycle += op.kind().num_qubits() as usize;
            qubits.extend(op.operands().iter().copied());
        }

        let depth = compute_depth(operators)?;

        Ok(CircuitInfo {
            size: operators.len(),
            qubits_num: qubits.len(),
            sqg: sqg.into_iter().collect(),
            mqg: mqg.into_iter().collect(),
            sqg_num,
            mqg_num,
            depth,
            depth_size: DepthSize::classify(depth),
            cycle,
        })
    }
}

/// Per-qubit layer depth simulation (§3, §7): each operator advances every
/// qubit it touches to one past the deepest of those qubits' current layers.
fn compute_depth(operators: &[Operator]) -> IrResult<usize> {
    let mut layers = vec![0usize; MAX_QUBITS as usize];

    for op in operators {
        if op.is_abandoned() {
            continue;
        }
        for &q in op.operands() {
            if q >= MAX_QUBITS {
                return Err(IrError::QubitIndexOutOfRange { index: q, cap: MAX_QUBITS });
            }
        }
        let layer = op.operands().iter().map(|&q| layers[q as usize]).max().unwrap_or(0) + 1;
        for &q in op.operands() {
            layers[q as usize] = layer;
        }
    }

    Ok(layers.into_iter().max().unwrap_or(0))
}

/// An ordered gate sequence with its draft string kept in sync, a header
/// of opaque lines, and a system tag (§3).
#[derive(Debug, Clone)]
pub struct Circuit {
    header: Vec<String>,
    operators: Vec<Operator>,
    draft: String,
    system: String,
    origin: Option<CircuitInfo>,
}

impl Circuit {
    /// Parse `source` and build a circuit with no optimization applied yet;
    /// the draft is computed directly from the parsed operators.
    pub fn from_source(path: &str, source: &str, system: impl Into<String>) -> IrResult<Circuit> {
        let ParsedCircuit { header, operators } = parser::parse(path, source)?;
        let draft = draft_of(&operators);
        Ok(Circuit { header, operators, draft, system: system.into(), origin: None })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn set_system(&mut self, system: impl Into<String>) {
        self.system = system.into();
    }

    pub fn len(&self) -> usize {
        self.draft.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draft.is_empty()
    }

    /// Replace the live operator sequence and recompute the draft. Used by
    /// every pass that produces a new operator stream (§4.C, §9's
    /// "build functionally and swap in" note).
    pub fn set_operators(&mut self, operators: Vec<Operator>) {
        self.draft = draft_of(&operators);
        self.operators = operators;
    }

    /// Drop `Abandon` operators and recompute the draft (I1 maintenance
    /// after a plan application, §4.E step 3).
    pub fn update(&mut self) {
        self.operators.retain(|op| !op.is_abandoned());
        self.draft = draft_of(&self.operators);
        debug_assert_eq!(self.draft.len(), self.operators.len());
    }

    /// Snapshot the current operator sequence as the frozen *origin* info
    /// (§3 lifecycle: frozen at load, never recomputed).
    pub fn freeze_origin(&mut self) -> IrResult<()> {
        self.origin = Some(CircuitInfo::compute(&self.operators)?);
        Ok(())
    }

    pub fn origin(&self) -> Option<&CircuitInfo> {
        self.origin.as_ref()
    }

    pub fn info(&self) -> IrResult<CircuitInfo> {
        CircuitInfo::compute(&self.operators)
    }

    /// Render the full QASM-style output: header followed by every live
    /// operator's rendering.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        for op in &self.operators {
            out.push_str(&op.output());
        }
        out
    }
}

fn draft_of(operators: &[Operator]) -> String {
    operators.iter().map(|op| op.kind().code()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\n";

    #[test]
    fn draft_matches_operators_without_optimization() {
        let source = format!("{HEADER}h q[0];\ncx q[0],q[1];\n");
        let circuit = Circuit::from_source("t.qasm", &source, "IBM").unwrap();
        assert_eq!(circuit.draft().len(), circuit.operators().len());
        for (i, op) in circuit.operators().iter().enumerate() {
            assert_eq!(circuit.draft().chars().nth(i).unwrap(), op.kind().code());
        }
    }

    #[test]
    fn update_drops_abandoned_operators() {
        let source = format!("{HEADER}h q[0];\ncx q[0],q[1];\n");
        let mut circuit = Circuit::from_source("t.qasm", &source, "IBM").unwrap();
        let mut ops = circuit.operators().to_vec();
        ops[0] = Operator::abandoned(0);
        circuit.set_operators(ops);
        circuit.update();
        assert_eq!(circuit.len(), 1);
    }

    #[test]
    fn depth_size_categories() {
        assert_eq!(DepthSize::classify(100).as_str(), "small");
        assert_eq!(DepthSize::classify(101).as_str(), "medium");
        assert_eq!(DepthSize::classify(999).as_str(), "medium");
        assert_eq!(DepthSize::classify(1000).as_str(), "large");
    }

    #[test]
    fn qubit_over_cap_errors() {
        let ops = vec![Operator::new(Kind::H, vec![MAX_QUBITS], String::new(), 0).unwrap()];
        assert!(matches!(compute_depth(&ops), Err(IrError::QubitIndexOutOfRange { .. })));
    }
}
