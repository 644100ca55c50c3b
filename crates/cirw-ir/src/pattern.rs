//! Rewrite rules: a source template list that must match, and a destination
//! template list that replaces it.

use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::kind::Kind;
use crate::operator::Operator;

/// Letter-to-qubit binding produced by a successful [`Pattern::bind`].
///
/// Backed by a fixed-size array rather than a hashed map: bindings are a
/// small total function over the 26 lowercase letters, reset at the start
/// of every match, so there is no benefit to a heap-backed dictionary on
/// this hot path.
pub type Books = [Option<u32>; 26];

/// One operator slot within a pattern: a kind plus the letters its operands
/// are bound to, plus (for rotation kinds) an angle constraint/value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub kind: Kind,
    /// Letter index (0 = 'a', 1 = 'b', ...) per operand slot.
    pub operands: Vec<u8>,
    /// Empty means "no constraint" on a source template, or "no value" on
    /// a destination template that isn't a rotation.
    pub angle: String,
}

/// A raw `[kind, [operand_indices], angle?]` template as it appears in a
/// rule JSON file, before letter normalization.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawTemplateTuple")]
pub struct RawTemplate {
    pub kind_token: String,
    pub operands: Vec<u32>,
    pub angle: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTemplateTuple {
    NoAngle((String, Vec<u32>)),
    WithAngle((String, Vec<u32>, String)),
}

impl TryFrom<RawTemplateTuple> for RawTemplate {
    type Error = std::convert::Infallible;

    fn try_from(value: RawTemplateTuple) -> Result<Self, Self::Error> {
        Ok(match value {
            RawTemplateTuple::NoAngle((kind_token, operands)) => {
                RawTemplate { kind_token, operands, angle: String::new() }
            }
            RawTemplateTuple::WithAngle((kind_token, operands, angle)) => {
                RawTemplate { kind_token, operands, angle: normalize_angle(&angle) }
            }
        })
    }
}

/// A rewrite rule as deserialized straight from a rule JSON file: `{src, dst}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRule {
    pub src: Vec<RawTemplate>,
    pub dst: Vec<RawTemplate>,
}

/// Strip whitespace and a single wrapping `(...)`, per §4.B normalization.
pub fn normalize_angle(raw: &str) -> String {
    let trimmed: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if trimmed.starts_with('(') && trimmed.ends_with(')') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed
    }
}

/// A source→destination rewrite rule with letter-normalized operands.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub src: Vec<Template>,
    pub dst: Vec<Template>,
    /// Concatenation of source kind codes, e.g. `"Xcx"`.
    pub operator_signature: String,
}

impl Pattern {
    /// Build a pattern from a raw rule, normalizing numeric operand indices
    /// to letters in lexicographic order of first appearance across the
    /// whole rule (source scanned before destination), per §4.B.
    pub fn from_raw(raw: RawRule) -> Option<Pattern> {
        let mut next_letter: u8 = 0;
        let mut seen = rustc_hash::FxHashMap::default();

        let mut letter_of = |raw_index: u32| -> u8 {
            *seen.entry(raw_index).or_insert_with(|| {
                let letter = next_letter;
                next_letter += 1;
                letter
            })
        };

        let build = |templates: Vec<RawTemplate>, letter_of: &mut dyn FnMut(u32) -> u8| -> Option<Vec<Template>> {
            templates
                .into_iter()
                .map(|t| {
                    let kind = Kind::from_token(&t.kind_token)?;
                    let operands = t.operands.iter().map(|&i| letter_of(i)).collect();
                    Some(Template { kind, operands, angle: t.angle })
                })
                .collect()
        };

        let src = build(raw.src, &mut letter_of)?;
        let dst = build(raw.dst, &mut letter_of)?;

        let operator_signature: String = src.iter().map(|t| t.kind.code()).collect();

        Some(Pattern { src, dst, operator_signature })
    }

    /// Number of source template slots this pattern matches.
    pub fn size(&self) -> usize {
        self.src.len()
    }

    /// Source arity sum minus destination arity sum: the static "cycle"
    /// saving of applying this pattern once.
    pub fn cycle_saving(&self) -> i64 {
        let src_arity: i64 = self.src.iter().map(|t| t.kind.num_qubits() as i64).sum();
        let dst_arity: i64 = self.dst.iter().map(|t| t.kind.num_qubits() as i64).sum();
        src_arity - dst_arity
    }

    /// Whether `ops`'s kinds, in order, equal this pattern's source kinds.
    pub fn kinds_match(&self, ops: &[&Operator]) -> bool {
        ops.len() == self.src.len() && ops.iter().zip(&self.src).all(|(op, t)| op.kind() == t.kind)
    }

    /// The central matching primitive (§4.B): bind source letters to the
    /// qubits `ops` actually touches, enforcing the same-letter-same-qubit
    /// and distinct-letter-distinct-qubit rules and the per-template angle
    /// constraint. `ops` must already be known to match kinds (callers that
    /// skip [`Pattern::kinds_match`] get a `None` here instead).
    pub fn bind(&self, ops: &[&Operator]) -> Option<Books> {
        if !self.kinds_match(ops) {
            return None;
        }

        let mut books: Books = [None; 26];

        for (template, op) in self.src.iter().zip(ops.iter()) {
            for (&letter, &qubit) in template.operands.iter().zip(op.operands().iter()) {
                match books[letter as usize] {
                    None => books[letter as usize] = Some(qubit),
                    Some(bound) if bound == qubit => {}
                    Some(_) => return None,
                }
            }
        }

        // Distinctness: every distinct letter that appears must bind to a
        // distinct qubit (no two different letters collapsing to one qubit).
        let mut seen_qubits: FxHashSet<u32> = FxHashSet::default();
        for slot in books.iter().flatten() {
            if !seen_qubits.insert(*slot) {
                return None;
            }
        }

        for (template, op) in self.src.iter().zip(ops.iter()) {
            if !template.angle.is_empty() && template.angle != normalize_angle(op.angle()) {
                return None;
            }
        }

        Some(books)
    }

    /// Resolve a destination template's operands through `books` into
    /// concrete qubit indices.
    pub fn resolve_operands(template: &Template, books: &Books) -> Vec<u32> {
        template
            .operands
            .iter()
            .map(|&letter| books[letter as usize].expect("destination letter must be bound by source match"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;

    fn rule(src_json: &str, dst_json: &str) -> Pattern {
        let raw = RawRule {
            src: serde_json::from_str(src_json).unwrap(),
            dst: serde_json::from_str(dst_json).unwrap(),
        };
        Pattern::from_raw(raw).unwrap()
    }

    #[test]
    fn reversible_cc_cancels() {
        let pattern = rule(r#"[["cx",[0,1]],["cx",[0,1]]]"#, "[]");
        assert_eq!(pattern.operator_signature, "cc");
        let a = Operator::new(Kind::Cx, vec![1, 3], String::new(), 0).unwrap();
        let b = Operator::new(Kind::Cx, vec![1, 3], String::new(), 1).unwrap();
        assert!(pattern.bind(&[&a, &b]).is_some());
    }

    #[test]
    fn distinctness_rejects_collapsed_letters() {
        // operand signature "abcb": pattern expects 4 distinct qubits a,b,c
        // bound from two 2-qubit gates; if both gates touch the same pair
        // of qubits, 'a' and 'c' collapse onto the same qubit and must fail.
        let pattern = rule(r#"[["cx",[0,1]],["cx",[2,1]]]"#, "[]");
        let a = Operator::new(Kind::Cx, vec![1, 3], String::new(), 0).unwrap();
        let b = Operator::new(Kind::Cx, vec![1, 3], String::new(), 1).unwrap();
        assert!(pattern.bind(&[&a, &b]).is_none());
    }

    #[test]
    fn angle_constraint_enforced_only_when_present() {
        let pattern = rule(r#"[["rx",[0],"pi/2"]]"#, "[]");
        let matching = Operator::new(Kind::Rx, vec![0], "pi/2".to_string(), 0).unwrap();
        let mismatching = Operator::new(Kind::Rx, vec![0], "pi/4".to_string(), 0).unwrap();
        assert!(pattern.bind(&[&matching]).is_some());
        assert!(pattern.bind(&[&mismatching]).is_none());
    }

    #[test]
    fn angle_normalization_strips_whitespace_and_parens() {
        assert_eq!(normalize_angle(" ( pi / 2 ) "), "pi/2");
        assert_eq!(normalize_angle("pi/2"), "pi/2");
    }

    proptest::proptest! {
        /// Binding a repeated letter to two operands forces them equal;
        /// binding two distinct letters to the same operand must fail.
        #[test]
        fn bind_is_monotone_in_letters(a in 0u32..4, b in 0u32..4) {
            // Pattern: two single-qubit gates sharing letter 'a'.
            let same_letter = rule(r#"[["h",[0]],["h",[0]]]"#, "[]");
            let op_a = Operator::new(Kind::H, vec![a], String::new(), 0).unwrap();
            let op_b = Operator::new(Kind::H, vec![b], String::new(), 1).unwrap();
            let result = same_letter.bind(&[&op_a, &op_b]);
            if a == b {
                prop_assert!(result.is_some());
            } else {
                prop_assert!(result.is_none());
            }

            // Pattern: two single-qubit gates with distinct letters 'a','b'.
            let distinct_letters = rule(r#"[["h",[0]],["h",[1]]]"#, "[]");
            let result = distinct_letters.bind(&[&op_a, &op_b]);
            if a == b {
                prop_assert!(result.is_none());
            } else {
                prop_assert!(result.is_some());
            }
        }
    }
}
