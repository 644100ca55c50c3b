//! Circuit file ingestion: the external circuit file format from §6.
//!
//! A file is a header of two or more opaque lines, preserved verbatim on
//! output, followed by one gate line per operator:
//! `KIND[(angle)] q[i0],q[i1],...;`. Lines that are register declarations
//! (no `[` before the first `;`, or simply don't parse as a gate line) are
//! folded into the header instead of erroring, matching the reference
//! implementation's forgiving preprocessing step.

use crate::error::{IrError, IrResult};
use crate::kind::Kind;
use crate::operator::Operator;
use crate::pattern::normalize_angle;

/// The result of reading a circuit file: header lines plus the operator
/// stream in file order.
pub struct ParsedCircuit {
    pub header: Vec<String>,
    pub operators: Vec<Operator>,
}

/// Parse `source` (the full contents of a circuit file) into a header and
/// an operator stream, assigning each operator a monotonically increasing
/// creation index in file order.
pub fn parse(path: &str, source: &str) -> IrResult<ParsedCircuit> {
    let mut lines = source.lines();
    let mut header = Vec::new();
    // Preserve the first two lines unconditionally, matching the reference
    // parser's fixed two-line skip for `OPENQASM ...;` and `include ...;`.
    for _ in 0..2 {
        match lines.next() {
            Some(line) => header.push(line.to_string()),
            None => {
                return Err(IrError::Parse {
                    path: path.to_string(),
                    line: header.len() + 1,
                    message: "file ended before header was complete".to_string(),
                })
            }
        }
    }

    let mut operators = Vec::new();
    let mut creation_index = 0u64;

    for (offset, raw_line) in lines.enumerate() {
        let line_no = offset + 3;
        let trimmed: String = raw_line.chars().filter(|c| !c.is_whitespace()).collect();
        if trimmed.is_empty() {
            continue;
        }
        let trimmed = trimmed.strip_suffix(';').unwrap_or(&trimmed);

        match parse_gate_line(trimmed, creation_index) {
            Some(Ok(op)) => {
                operators.push(op);
                creation_index += 1;
            }
            Some(Err(message)) => {
                return Err(IrError::Parse { path: path.to_string(), line: line_no, message })
            }
            // Doesn't look like a gate line at all (e.g. `qreg q[4]`):
            // keep it as header, matching the reference preprocessor.
            None => header.push(raw_line.to_string()),
        }
    }

    Ok(ParsedCircuit { header, operators })
}

/// Try to parse one semicolon-stripped, whitespace-stripped line as a gate
/// operation. Returns `None` if the line has no `[` at all (so is not a
/// gate line), `Some(Err(..))` if it looks like one but is malformed.
fn parse_gate_line(line: &str, creation_index: u64) -> Option<Result<Operator, String>> {
    let bracket = line.find('[')?;
    // The kind token ends one character before the bracket, e.g.
    // "u2(pi/2,-pi/2)q[0]": bracket is at 'q[0]', so kind ends at 'q'.
    if bracket == 0 {
        return Some(Err("operand list has no preceding kind token".to_string()));
    }
    let kind_end = bracket - 1;
    let kind_token = &line[..kind_end];
    let operand_text = &line[kind_end..];

    let (bare_kind, angle) = match kind_token.split_once('(') {
        Some((bare, rest)) => {
            let angle = rest.strip_suffix(')').unwrap_or(rest);
            (bare, normalize_angle(angle))
        }
        None => (kind_token, String::new()),
    };

    if is_reserved_declaration(bare_kind) {
        // Register declarations and similar directives are preserved into
        // the header verbatim, per §6, not treated as operator lines.
        return None;
    }

    let kind = match Kind::from_token(bare_kind) {
        Some(kind) => kind,
        None => return Some(Err(format!("unknown gate kind '{bare_kind}'"))),
    };

    let operands = match parse_operands(operand_text) {
        Ok(operands) => operands,
        Err(message) => return Some(Err(message)),
    };

    match Operator::new(kind, operands, angle, creation_index) {
        Ok(op) => Some(Ok(op)),
        Err(IrError::ArityMismatch { kind, expected, got }) => {
            Some(Err(format!("'{kind}' expects {expected} operands, got {got}")))
        }
        Err(other) => Some(Err(other.to_string())),
    }
}

/// Reserved declaration keywords that belong in the header, not the
/// operator stream, even though they carry a bracketed operand list.
fn is_reserved_declaration(kind_token: &str) -> bool {
    matches!(kind_token, "qreg" | "creg" | "barrier" | "measure" | "reset")
}

/// Parse `q[2],q[4]` into `[2, 4]`.
fn parse_operands(text: &str) -> Result<Vec<u32>, String> {
    text.split(',')
        .map(|chunk| {
            let chunk = chunk.trim();
            let inner = chunk
                .strip_prefix("q[")
                .and_then(|rest| rest.strip_suffix(']'))
                .ok_or_else(|| format!("malformed operand '{chunk}'"))?;
            inner.parse::<u32>().map_err(|_| format!("non-numeric operand '{chunk}'"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\n";

    #[test]
    fn parses_simple_gate_lines() {
        let source = format!("{HEADER}h q[0];\ncx q[0],q[1];\n");
        let parsed = parse("t.qasm", &source).unwrap();
        assert_eq!(parsed.header.len(), 2);
        assert_eq!(parsed.operators.len(), 2);
        assert_eq!(parsed.operators[0].kind(), Kind::H);
        assert_eq!(parsed.operators[1].operands(), &[0, 1]);
    }

    #[test]
    fn register_declarations_fold_into_header() {
        let source = format!("{HEADER}qreg q[4];\ncreg c[4];\nh q[0];\n");
        let parsed = parse("t.qasm", &source).unwrap();
        assert_eq!(parsed.header.len(), 4);
        assert_eq!(parsed.operators.len(), 1);
    }

    #[test]
    fn parses_angle_with_commas() {
        let source = format!("{HEADER}u2(pi/2,-pi/2) q[0];\n");
        let parsed = parse("t.qasm", &source).unwrap();
        assert_eq!(parsed.operators[0].angle(), "pi/2,-pi/2");
    }

    #[test]
    fn unknown_kind_is_parse_error() {
        let source = format!("{HEADER}frobnicate q[0];\n");
        assert!(parse("t.qasm", &source).is_err());
    }
}
