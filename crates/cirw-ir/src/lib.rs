//! cirw circuit data model: operators, kinds, patterns, and circuits.
//!
//! This crate holds the shared vocabulary of the rewrite engine — it has no
//! knowledge of rewrite passes, positioning, or plan search (those live in
//! `cirw-engine`). What it defines is:
//!
//! - [`kind::Kind`]: the fixed gate-kind/code bijection.
//! - [`operator::Operator`]: a single gate application.
//! - [`pattern::Pattern`]: a source→destination rewrite rule with
//!   letter-bound operands.
//! - [`circuit::Circuit`] / [`circuit::CircuitInfo`]: an ordered operator
//!   sequence with its draft string, and the derived metrics over it.
//! - [`parser`]: ingestion of the textual circuit file format.
//!
//! # Example
//!
//! ```rust
//! use cirw_ir::Circuit;
//!
//! let source = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nh q[0];\ncx q[0],q[1];\n";
//! let circuit = Circuit::from_source("bell.qasm", source, "IBM").unwrap();
//! assert_eq!(circuit.draft(), "hc");
//! ```

pub mod circuit;
pub mod error;
pub mod kind;
pub mod operator;
pub mod parser;
pub mod pattern;

pub use circuit::{Circuit, CircuitInfo, DepthSize, MAX_QUBITS};
pub use error::{IrError, IrResult};
pub use kind::Kind;
pub use operator::Operator;
pub use pattern::{Books, Pattern, RawRule, RawTemplate, Template};
