//! Single gate operations: the atoms the rewrite engine rewrites.

use crate::error::{IrError, IrResult};
use crate::kind::Kind;

/// A single gate applied to an ordered list of qubits, with an optional angle.
///
/// `creation_index` is a monotonic counter assigned at construction, used
/// only for diagnostics (it plays no role in matching or rewriting).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    kind: Kind,
    operands: Vec<u32>,
    angle: String,
    creation_index: u64,
}

impl Operator {
    /// Build an operator, validating that `operands.len()` matches `kind`'s arity.
    pub fn new(kind: Kind, operands: Vec<u32>, angle: String, creation_index: u64) -> IrResult<Self> {
        let expected = kind.num_qubits();
        if operands.len() as u32 != expected {
            return Err(IrError::ArityMismatch {
                kind: kind.token().to_string(),
                expected,
                got: operands.len(),
            });
        }
        Ok(Operator { kind, operands, angle, creation_index })
    }

    /// Build an `Abandon`-kind operator, which always has zero operands.
    pub fn abandoned(creation_index: u64) -> Self {
        Operator { kind: Kind::Abandon, operands: Vec::new(), angle: String::new(), creation_index }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn operands(&self) -> &[u32] {
        &self.operands
    }

    pub fn angle(&self) -> &str {
        &self.angle
    }

    pub fn creation_index(&self) -> u64 {
        self.creation_index
    }

    pub fn is_abandoned(&self) -> bool {
        self.kind == Kind::Abandon
    }

    /// Mutate this operator's kind/operands/angle in place. Arity is
    /// re-validated against the new kind.
    pub fn change(&mut self, kind: Kind, operands: Vec<u32>, angle: String) -> IrResult<()> {
        let expected = kind.num_qubits();
        if operands.len() as u32 != expected {
            return Err(IrError::ArityMismatch {
                kind: kind.token().to_string(),
                expected,
                got: operands.len(),
            });
        }
        self.kind = kind;
        self.operands = operands;
        self.angle = angle;
        Ok(())
    }

    /// Render as a QASM-style line: `kind[(angle)] q[i0],q[i1],...;\n`.
    /// `Abandon` operators and operators with no operands render empty,
    /// since they carry nothing meaningful to reproduce.
    pub fn output(&self) -> String {
        if self.kind == Kind::Abandon || self.operands.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        out.push_str(self.kind.token());
        if self.kind.is_rotation() && !self.angle.is_empty() {
            out.push('(');
            out.push_str(&self.angle);
            out.push(')');
        }
        out.push(' ');
        let operands: Vec<String> = self.operands.iter().map(|q| format!("q[{q}]")).collect();
        out.push_str(&operands.join(","));
        out.push_str(";\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_arity() {
        assert!(Operator::new(Kind::H, vec![0], String::new(), 0).is_ok());
        assert!(matches!(
            Operator::new(Kind::H, vec![0, 1], String::new(), 0),
            Err(IrError::ArityMismatch { .. })
        ));
    }

    #[test]
    fn change_validates_new_arity() {
        let mut op = Operator::new(Kind::H, vec![0], String::new(), 0).unwrap();
        assert!(op.change(Kind::Cx, vec![0, 1], String::new()).is_ok());
        assert_eq!(op.kind(), Kind::Cx);
        assert!(op.change(Kind::H, vec![0, 1], String::new()).is_err());
    }

    #[test]
    fn output_renders_angle_for_rotations() {
        let op = Operator::new(Kind::Rx, vec![2], "pi/2".to_string(), 0).unwrap();
        assert_eq!(op.output(), "rx(pi/2) q[2];\n");
    }

    #[test]
    fn output_of_abandon_is_empty() {
        let op = Operator::abandoned(0);
        assert_eq!(op.output(), "");
    }
}
