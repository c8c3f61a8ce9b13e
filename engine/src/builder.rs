//! Rank table construction
//!
//! Three passes share one `RankTable`:
//! 1. Five cards: classify every hand, index the distinct strengths, then store
//!    each hand's dense rank.
//! 2. Six cards: each hand takes the best rank among its six 5-card subsets.
//! 3. Seven cards: each hand takes the best rank among its seven 6-card subsets.
//!
//! Hands are processed in fixed-size chunks. Within a chunk, ranks are computed
//! in parallel against the immutable table (subset lookups only touch entries of
//! the previous pass), then written with one rayon task per shard. Keys of
//! different card counts never collide, so no merge step is needed.

use crate::classifier::classify;
use crate::combinations::{binomial, drop_one, Combinations};
use crate::config::EvaluatorConfig;
use crate::error::{Error, Result};
use crate::indexer::{EquivalenceIndex, EQUIVALENCE_CLASSES};
use crate::strength::HandStrength;
use crate::table::RankTable;
use rayon::prelude::*;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Hands processed between progress reports and cancellation checks
pub const CHUNK_SIZE: usize = 1 << 20;

/// Stage of table construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Collecting the distinct 5-card strengths
    Equivalence,
    FiveCard,
    SixCard,
    SevenCard,
}

impl Pass {
    /// Cards per hand enumerated by this pass
    pub fn cards(self) -> u32 {
        match self {
            Pass::Equivalence | Pass::FiveCard => 5,
            Pass::SixCard => 6,
            Pass::SevenCard => 7,
        }
    }

    /// Hands enumerated by this pass
    pub fn hands(self) -> u64 {
        binomial(52, self.cards() as u64)
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pass::Equivalence => f.write_str("equivalence classes"),
            pass => write!(f, "{}-card table", pass.cards()),
        }
    }
}

/// Observer for long-running construction
///
/// Called from the builder thread only, between chunks.
pub trait Progress: Sync {
    fn started(&self, _pass: Pass, _total: u64) {}
    fn advanced(&self, _pass: Pass, _done: u64, _total: u64) {}
    fn finished(&self, _pass: Pass, _elapsed: Duration) {}
}

/// Discards all progress events
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Progress for Silent {}

/// Reports progress through the `log` facade
#[derive(Debug, Clone, Copy)]
pub struct LogProgress {
    level: log::Level,
}

impl LogProgress {
    pub fn new(level: log::Level) -> Self {
        LogProgress { level }
    }

    /// `info` when verbose, `debug` otherwise
    pub fn verbose(verbose: bool) -> Self {
        Self::new(if verbose { log::Level::Info } else { log::Level::Debug })
    }
}

impl Progress for LogProgress {
    fn started(&self, pass: Pass, total: u64) {
        log::log!(self.level, "generating {} ({} hands)", pass, total);
    }

    fn advanced(&self, pass: Pass, done: u64, total: u64) {
        log::log!(
            self.level,
            "{}: {} / {} ({:.1}%)",
            pass,
            done,
            total,
            done as f64 * 100.0 / total as f64
        );
    }

    fn finished(&self, pass: Pass, elapsed: Duration) {
        log::log!(self.level, "{} done in {:.2}s", pass, elapsed.as_secs_f64());
    }
}

/// Shared flag that stops construction at the next chunk boundary
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// What a completed build produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Distinct 5-card strengths found
    pub classes: usize,
    /// Entries written per card count (5, 6, 7)
    pub entries: [u64; 3],
    /// Probe misses taken by all passes. Unlike `RankTable::misses` this does not saturate.
    pub misses: u64,
}

/// Hands written and probe misses taken by one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassTally {
    pub hands: u64,
    pub misses: u64,
}

/// Builds a `RankTable` for the phases enabled in an `EvaluatorConfig`
pub struct TableBuilder<'a> {
    config: EvaluatorConfig,
    progress: &'a dyn Progress,
    cancel: Cancellation,
}

impl<'a> TableBuilder<'a> {
    /// Validates the config up front so bad phase combinations fail before any work
    pub fn new(config: EvaluatorConfig, progress: &'a dyn Progress, cancel: Cancellation) -> Result<Self> {
        config.validate()?;
        Ok(TableBuilder {
            config,
            progress,
            cancel,
        })
    }

    /// Run every enabled pass into one freshly allocated table
    pub fn build(&self) -> Result<(RankTable, BuildSummary)> {
        let mut table = RankTable::with_capacity(self.config.table_capacity())?;
        let mut summary = BuildSummary::default();

        let index = self.index_strengths()?;
        summary.classes = index.len();
        if index.len() != EQUIVALENCE_CLASSES {
            return Err(Error::Invariant(format!(
                "found {} strength classes, expected {}",
                index.len(),
                EQUIVALENCE_CLASSES
            )));
        }
        let mut tallies = vec![self.store_five_card(&mut table, &index)?];
        if self.config.six_card {
            tallies.push(self.escalate(&mut table, Pass::SixCard, Combinations::new(6))?);
        }
        if self.config.seven_card {
            tallies.push(self.escalate(&mut table, Pass::SevenCard, Combinations::new(7))?);
        }
        for (entries, tally) in summary.entries.iter_mut().zip(&tallies) {
            *entries = tally.hands;
        }
        summary.misses = tallies.iter().map(|tally| tally.misses).sum();
        Ok((table, summary))
    }

    /// Classify all 5-card hands and collect their distinct strengths
    pub fn index_strengths(&self) -> Result<EquivalenceIndex> {
        let mut index = EquivalenceIndex::new();
        self.run_pass(Pass::Equivalence, Combinations::new(5), |chunk| {
            let strengths = chunk
                .par_iter()
                .map(|&mask| classify(mask))
                .collect::<Result<Vec<HandStrength>>>()?;
            for strength in strengths {
                index.insert_unique(strength);
            }
            Ok(0)
        })?;
        log::debug!("{} unique hand strengths", index.len());
        Ok(index)
    }

    fn store_five_card(&self, table: &mut RankTable, index: &EquivalenceIndex) -> Result<PassTally> {
        self.run_pass(Pass::FiveCard, Combinations::new(5), |chunk| {
            let pairs = chunk
                .par_iter()
                .map(|&mask| -> Result<(u64, u32)> { Ok((mask, index.rank_of(&classify(mask)?)?)) })
                .collect::<Result<Vec<(u64, u32)>>>()?;
            table.extend_parallel(&pairs)
        })
    }

    /// Store, for every mask, the best rank among its one-card-smaller subsets.
    ///
    /// Every subset must already be in the table.
    pub fn escalate<I>(&self, table: &mut RankTable, pass: Pass, masks: I) -> Result<PassTally>
    where
        I: Iterator<Item = u64>,
    {
        self.run_pass(pass, masks, |chunk| {
            let pairs = {
                let table = &*table;
                chunk
                    .par_iter()
                    .map(|&mask| best_subset_rank(table, mask).map(|rank| (mask, rank)))
                    .collect::<Result<Vec<(u64, u32)>>>()?
            };
            table.extend_parallel(&pairs)
        })
    }

    /// Drive `work` over `masks` in chunks with progress and cancellation.
    ///
    /// `work` returns the probe misses its chunk took.
    fn run_pass<I, F>(&self, pass: Pass, mut masks: I, mut work: F) -> Result<PassTally>
    where
        I: Iterator<Item = u64>,
        F: FnMut(&[u64]) -> Result<u64>,
    {
        let start = Instant::now();
        let total = masks.size_hint().1.map_or(pass.hands(), |upper| upper as u64).min(pass.hands());
        self.progress.started(pass, total);
        let mut tally = PassTally::default();
        let mut chunk = Vec::with_capacity(CHUNK_SIZE);
        loop {
            self.cancel.check()?;
            chunk.clear();
            chunk.extend(masks.by_ref().take(CHUNK_SIZE));
            if chunk.is_empty() {
                break;
            }
            tally.misses += work(&chunk)?;
            tally.hands += chunk.len() as u64;
            self.progress.advanced(pass, tally.hands, total.max(tally.hands));
        }
        self.progress.finished(pass, start.elapsed());
        Ok(tally)
    }
}

/// Highest stored rank among the sub-masks of `mask` with one card removed
pub fn best_subset_rank(table: &RankTable, mask: u64) -> Result<u32> {
    drop_one(mask).try_fold(0u32, |best, subset| -> Result<u32> {
        Ok(best.max(table.get(subset)?))
    })
}
