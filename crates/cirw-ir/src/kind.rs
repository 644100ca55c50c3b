//! Gate kinds, their qubit arity, and the kind/code bijection.
//!
//! The draft string and every pattern operator signature are built out of
//! single-character *codes*; this module is the one place that bijection is
//! defined, so that both the circuit and the pattern loader agree on it.

use std::fmt;

/// A gate kind recognized by the rewrite engine.
///
/// `Abandon` is the sentinel used to mark an operator for erasure on the
/// next [`crate::circuit::Circuit::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Kind {
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
    Cx,
    Ccx,
    Swap,
    Rx,
    Ry,
    Rz,
    U1,
    U2,
    U3,
    Abandon,
}

impl Kind {
    /// The fixed qubit arity of this kind: 1, 2, or 3. `Abandon` has arity 0.
    pub fn num_qubits(self) -> u32 {
        match self {
            Kind::X | Kind::Y | Kind::Z | Kind::H | Kind::S | Kind::Sdg | Kind::T | Kind::Tdg
            | Kind::Rx | Kind::Ry | Kind::Rz | Kind::U1 | Kind::U2 | Kind::U3 => 1,
            Kind::Cx | Kind::Swap => 2,
            Kind::Ccx => 3,
            Kind::Abandon => 0,
        }
    }

    /// Whether this kind carries an angle parameter.
    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            Kind::Rx | Kind::Ry | Kind::Rz | Kind::U1 | Kind::U2 | Kind::U3
        )
    }

    /// The QASM-style token used on read/write, e.g. `"cx"`.
    pub fn token(self) -> &'static str {
        match self {
            Kind::X => "x",
            Kind::Y => "y",
            Kind::Z => "z",
            Kind::H => "h",
            Kind::S => "s",
            Kind::Sdg => "sdg",
            Kind::T => "t",
            Kind::Tdg => "tdg",
            Kind::Cx => "cx",
            Kind::Ccx => "ccx",
            Kind::Swap => "swap",
            Kind::Rx => "rx",
            Kind::Ry => "ry",
            Kind::Rz => "rz",
            Kind::U1 => "u1",
            Kind::U2 => "u2",
            Kind::U3 => "u3",
            Kind::Abandon => "_",
        }
    }

    /// Parse a QASM-style token, stripping a trailing `(...)` angle clause if present.
    pub fn from_token(token: &str) -> Option<Kind> {
        let bare = token.split('(').next().unwrap_or(token);
        Some(match bare {
            "x" => Kind::X,
            "y" => Kind::Y,
            "z" => Kind::Z,
            "h" => Kind::H,
            "s" => Kind::S,
            "sdg" => Kind::Sdg,
            "t" => Kind::T,
            "tdg" => Kind::Tdg,
            "cx" | "cnot" => Kind::Cx,
            "ccx" | "toffoli" => Kind::Ccx,
            "swap" => Kind::Swap,
            "rx" => Kind::Rx,
            "ry" => Kind::Ry,
            "rz" => Kind::Rz,
            "u1" => Kind::U1,
            "u2" => Kind::U2,
            "u3" => Kind::U3,
            _ => return None,
        })
    }

    /// The single-character code used in draft strings and pattern signatures.
    pub fn code(self) -> char {
        match self {
            Kind::X => 'x',
            Kind::Y => 'y',
            Kind::Z => 'z',
            Kind::H => 'h',
            Kind::S => 's',
            Kind::Sdg => 'S',
            Kind::T => 't',
            Kind::Tdg => 'T',
            Kind::Cx => 'c',
            Kind::Ccx => 'C',
            Kind::Swap => 'w',
            Kind::Rx => 'X',
            Kind::Ry => 'Y',
            Kind::Rz => 'Z',
            Kind::U1 => '1',
            Kind::U2 => '2',
            Kind::U3 => '3',
            Kind::Abandon => '_',
        }
    }

    /// Inverse of [`Kind::code`].
    pub fn from_code(code: char) -> Option<Kind> {
        Some(match code {
            'x' => Kind::X,
            'y' => Kind::Y,
            'z' => Kind::Z,
            'h' => Kind::H,
            's' => Kind::S,
            'S' => Kind::Sdg,
            't' => Kind::T,
            'T' => Kind::Tdg,
            'c' => Kind::Cx,
            'C' => Kind::Ccx,
            'w' => Kind::Swap,
            'X' => Kind::Rx,
            'Y' => Kind::Ry,
            'Z' => Kind::Rz,
            '1' => Kind::U1,
            '2' => Kind::U2,
            '3' => Kind::U3,
            '_' => Kind::Abandon,
            _ => return None,
        })
    }

    /// Classify operand slot `index` (0-based) of a template with this kind
    /// as control (`true`) or target (`false`), per the positioning sensitivity
    /// rule: index 0 of a 2-qubit gate and the first two slots of a 3-qubit
    /// gate are control; everything else is target.
    pub fn is_control_slot(self, index: usize) -> bool {
        match self.num_qubits() {
            2 => index == 0,
            3 => index < 2,
            _ => false,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_bijection_round_trips() {
        let kinds = [
            Kind::X, Kind::Y, Kind::Z, Kind::H, Kind::S, Kind::Sdg, Kind::T, Kind::Tdg,
            Kind::Cx, Kind::Ccx, Kind::Swap, Kind::Rx, Kind::Ry, Kind::Rz, Kind::U1, Kind::U2,
            Kind::U3, Kind::Abandon,
        ];
        for kind in kinds {
            assert_eq!(Kind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn token_round_trips() {
        for kind in [Kind::Cx, Kind::H, Kind::Rx, Kind::Ccx] {
            assert_eq!(Kind::from_token(kind.token()), Some(kind));
        }
    }

    #[test]
    fn arity_matches_spec() {
        assert_eq!(Kind::H.num_qubits(), 1);
        assert_eq!(Kind::Cx.num_qubits(), 2);
        assert_eq!(Kind::Ccx.num_qubits(), 3);
    }

    #[test]
    fn control_slot_classification() {
        assert!(Kind::Cx.is_control_slot(0));
        assert!(!Kind::Cx.is_control_slot(1));
        assert!(Kind::Ccx.is_control_slot(0));
        assert!(Kind::Ccx.is_control_slot(1));
        assert!(!Kind::Ccx.is_control_slot(2));
        assert!(!Kind::H.is_control_slot(0));
    }
}
