//! cirw rewrite engine: pattern matching, positioning, candidate search, and
//! the rewrite passes built on top of `cirw-ir`'s data model.
//!
//! # Architecture
//!
//! ```text
//! Circuit (draft string + operator stream)
//!       │
//!       ▼
//! ┌───────────────┐
//! │ rules::load   │ ◄── embedded JSON rule files, memoized per system
//! └───────────────┘
//!       │
//!       ├── positioning::find_positions   (draft string -> candidate sites)
//!       ├── candidate::Candidate          (validated rewrite at a site)
//!       ├── plan::Plan / Plan s           (disjoint candidate sets, ranked)
//!       │
//!       ▼
//! passes::{reduction, commutation, expansion, migration}
//!       │
//!       ▼
//! search::{greedy, random, mcm}   (turn a pass's candidates into one plan)
//!       │
//!       ▼
//! engine::execute()               (outer optimize/search/apply loop)
//! ```

pub mod candidate;
pub mod engine;
pub mod error;
pub mod passes;
pub mod plan;
pub mod positioning;
pub mod rules;
pub mod search;

pub use candidate::{Candidate, Metric};
pub use engine::{execute, DepthSizeFilter, RunOptions, SystemPair};
pub use error::{EngineError, EngineResult};
pub use plan::{Plan, Plans};
pub use rules::{RuleFamily, System};
pub use search::Strategy;
