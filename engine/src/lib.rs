//! snapcall Engine - Precomputed poker hand rank tables
//!
//! This crate classifies 5-card hands, collapses them into 7,462 dense strength
//! ranks, and escalates those ranks to 6- and 7-card sets in a sharded
//! open-addressing table that can be saved to and loaded from disk.
//!
//! The engine is platform-agnostic and has zero UI dependencies.

pub mod builder;
pub mod card;
pub mod classifier;
pub mod combinations;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod indexer;
pub mod strength;
pub mod table;

pub use builder::{BuildSummary, Cancellation, LogProgress, Pass, PassTally, Progress, TableBuilder};
pub use card::{cards_of, mask_of, parse_cards, Card};
pub use classifier::{best_strength, classify};
pub use config::EvaluatorConfig;
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use strength::{Category, HandStrength};
pub use table::RankTable;
