//! # holdem-bot
//!
//! A heads-up no-limit Texas Hold'em playing agent. It connects to a game
//! server over a websocket, observes the hand in progress, and chooses a
//! legal action within the per-decision time budget.
//!
//! ## Architecture
//!
//! ```text
//! events ──► tracker ──► context builder ──► engine ──► (search) ──► action
//!                ▲            ▲    ▲
//!                │            │    └── analysis (strength, draws, texture,
//!                │            │                  odds, equity vs range)
//!            protocol    opponent model
//! ```
//!
//! ## Modules
//!
//! - [`poker`]: cards, hand evaluation, and range tables
//! - [`analysis`]: strength/draw/texture/odds/equity primitives
//! - [`model`]: per-seat opponent statistics and range estimation
//! - [`state`]: table config, snapshots, hand history, event tracker
//! - [`engine`]: decision context, heuristic planners, UCB1 refinement
//! - [`protocol`]: serde types for the JSON wire format
//! - [`bot`]: the websocket session driver
//! - [`hand_log`]: per-hand JSONL persistence

pub mod analysis;
pub mod bot;
pub mod engine;
pub mod error;
pub mod hand_log;
pub mod model;
pub mod poker;
pub mod protocol;
pub mod state;

pub use bot::HoldemBot;
pub use error::BotError;
