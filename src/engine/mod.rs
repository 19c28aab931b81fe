//! The decision pipeline.
//!
//! ## Modules
//!
//! - `context`: synthesises a self-contained [`DecisionContext`] per `act`
//! - `decision`: the preflop/postflop heuristic engine and sanitisation
//! - `search`: UCB1 refinement of high-stakes decisions

pub mod context;
pub mod decision;
pub mod search;

pub use context::{build_context, DecisionContext};
pub use decision::{sanitize, Decision, DecisionEngine};
pub use search::MonteCarloActionSearch;
