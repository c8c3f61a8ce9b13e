//! Lookup-table hand evaluator
//!
//! `Evaluator` owns a finished `RankTable` and answers `evaluate(mask) -> rank`
//! with a single probe sequence. Ranks are dense: 0 is the weakest 5-card hand,
//! 7461 the royal flush, and 6- and 7-card sets carry the rank of their best
//! 5-card subset.
//!
//! The table is either generated on construction or loaded from a file written
//! by `save`.

use crate::builder::{BuildSummary, Cancellation, LogProgress, Progress, TableBuilder};
use crate::card::{mask_of, parse_cards, Card};
use crate::config::EvaluatorConfig;
use crate::error::{Error, Result};
use crate::table::RankTable;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;

/// Read-only rank lookup over a prebuilt table
#[derive(Debug, Clone)]
pub struct Evaluator {
    table: RankTable,
    summary: Option<BuildSummary>,
}

impl Evaluator {
    /// Load or generate a table as described by `config`, logging progress
    pub fn new(config: EvaluatorConfig) -> Result<Self> {
        let progress = LogProgress::verbose(config.verbose);
        Self::with_progress(config, &progress, Cancellation::new())
    }

    /// Like `new`, with a caller-supplied progress observer and cancellation token
    pub fn with_progress(config: EvaluatorConfig, progress: &dyn Progress, cancel: Cancellation) -> Result<Self> {
        config.validate()?;
        let start = Instant::now();
        let evaluator = match &config.source_file {
            Some(path) => {
                log::info!("loading rank table from {}", path.display());
                Self::load(path)?
            }
            None => {
                log::info!(
                    "generating rank table for {} hands ({} MiB)",
                    config.expected_entries(),
                    config.estimated_table_bytes()? >> 20
                );
                let (table, summary) = TableBuilder::new(config.clone(), progress, cancel)?.build()?;
                log::info!(
                    "{} equivalence classes, {} probe misses",
                    summary.classes,
                    summary.misses
                );
                Evaluator {
                    table,
                    summary: Some(summary),
                }
            }
        };
        log::info!("hand evaluator ready in {:.2}s", start.elapsed().as_secs_f64());
        Ok(evaluator)
    }

    /// Wrap an existing table
    pub fn from_table(table: RankTable) -> Self {
        Evaluator { table, summary: None }
    }

    /// Read a table written by `save`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io("open", path, e))?;
        let table = RankTable::read_from(&mut BufReader::new(file)).map_err(|e| Error::io("read", path, e))?;
        log::debug!(
            "loaded {} shards x {} words from {}",
            table.shard_count(),
            table.shard_size(),
            path.display()
        );
        Ok(Self::from_table(table))
    }

    /// Write the table in its fixed binary layout
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        log::info!("saving rank table to {}", path.display());
        let file = File::create(path).map_err(|e| Error::io("create", path, e))?;
        self.table
            .write_to(&mut BufWriter::new(file))
            .map_err(|e| Error::io("write", path, e))
    }

    /// Rank of a 5-, 6- or 7-card set; `NotFound` if the table never stored it
    pub fn evaluate(&self, mask: u64) -> Result<u32> {
        self.table.get(mask)
    }

    pub fn evaluate_cards(&self, cards: &[Card]) -> Result<u32> {
        let mask = mask_of(cards);
        if mask.count_ones() as usize != cards.len() {
            return Err(Error::Validation("hand contains duplicate cards".to_string()));
        }
        self.evaluate(mask)
    }

    /// Evaluate a card list such as `"AS KD 7H 7C 2S"`
    pub fn evaluate_str(&self, cards: &str) -> Result<u32> {
        self.evaluate_cards(&parse_cards(cards)?)
    }

    /// Replace the stored rank of a card set.
    ///
    /// Hook for refinement passes (e.g. Monte Carlo estimates for partial hands)
    /// that run after the core table is built.
    pub fn override_rank(&mut self, mask: u64, rank: u32) -> Result<()> {
        self.table.set(mask, rank)
    }

    /// Build statistics, present only for tables generated in this process
    pub fn summary(&self) -> Option<&BuildSummary> {
        self.summary.as_ref()
    }

    pub fn table(&self) -> &RankTable {
        &self.table
    }
}

/// Deterministic pseudo-random card sets of `cards` cards each
pub fn random_hands(count: usize, cards: u32, seed: u64) -> Vec<u64> {
    let mut state = seed;
    let mut lcg_next = || {
        state = state.wrapping_mul(1103515245).wrapping_add(12345) & 0x7fffffff;
        state % 52
    };

    let mut hands = Vec::with_capacity(count);
    for _ in 0..count {
        let mut mask = 0u64;
        while mask.count_ones() < cards {
            mask |= 1u64 << lcg_next();
        }
        hands.push(mask);
    }
    hands
}

/// Benchmark helper for CLI
///
/// Looks up every hand once after a warm-up and returns (evals_per_sec, duration_ms).
pub fn benchmark_throughput(evaluator: &Evaluator, hands: &[u64]) -> Result<(f64, u64)> {
    // Warm-up
    for &mask in hands.iter().take(10_000) {
        evaluator.evaluate(mask)?;
    }

    // Timed run
    let start = Instant::now();
    let mut checksum = 0u64;
    for &mask in hands {
        checksum = checksum.wrapping_add(evaluator.evaluate(mask)? as u64);
    }
    let duration = start.elapsed();
    std::hint::black_box(checksum);

    let evals_per_sec = hands.len() as f64 / duration.as_secs_f64();
    let duration_ms = duration.as_millis() as u64;

    Ok((evals_per_sec, duration_ms))
}
