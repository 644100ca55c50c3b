//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while parsing, constructing, or measuring a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Malformed input at file ingestion: a missing `[`, an unterminated
    /// line, or a token that doesn't resolve to a known [`crate::kind::Kind`].
    #[error("parse error at {path}:{line}: {message}")]
    Parse {
        /// Path of the file being read.
        path: String,
        /// 1-based line number within the file.
        line: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// `Operator::change` received an operand count that disagrees with the
    /// new kind's fixed arity.
    #[error("arity mismatch changing to '{kind}': expected {expected} operands, got {got}")]
    ArityMismatch {
        /// Token of the kind being changed to.
        kind: String,
        /// Arity required by that kind.
        expected: u32,
        /// Number of operands actually supplied.
        got: usize,
    },

    /// A depth computation encountered an operand above the internal qubit cap.
    #[error("qubit index {index} is over the internal cap of {cap}")]
    QubitIndexOutOfRange {
        /// The offending qubit index.
        index: u32,
        /// The internal cap that was exceeded.
        cap: u32,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
