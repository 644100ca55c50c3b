//! Error types for the engine crate.

use thiserror::Error;

use cirw_ir::IrError;

/// Errors surfaced by the rewrite engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// Propagated from circuit construction or depth computation.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// The load-time `depth_size` filter rejected a file (§7). Non-fatal:
    /// the batch driver catches this and skips the file.
    #[error("circuit depth size '{actual}' does not match requested filter '{requested}'")]
    DepthSizeMismatch {
        /// The circuit's actual depth-size category.
        actual: String,
        /// The filter requested by the caller.
        requested: String,
    },

    /// Neither `SRC_to_DST.json` nor the swap-fallback `DST_to_SRC.json`
    /// exists for a requested migration. Aborts engine initialization.
    #[error("no migration rule file for {source} -> {target} (checked swap fallback too)")]
    RuleFileMissing {
        /// Source system requested.
        source: String,
        /// Target system requested.
        target: String,
    },

    /// A rule JSON resource failed to parse.
    #[error("malformed rule file '{resource}': {message}")]
    MalformedRuleFile {
        /// Logical resource name, e.g. `"IBM/reversible.json"`.
        resource: String,
        /// Underlying parse failure description.
        message: String,
    },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
