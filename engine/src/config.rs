//! Evaluator configuration
//!
//! Every phase beyond five cards is opt-in: the seven-card table alone is
//! several gigabytes and takes minutes to hours to build.

use crate::combinations::binomial;
use crate::error::{Error, Result};
use crate::table::RankTable;
use std::path::PathBuf;

/// Number of distinct 5-card hands
pub const FIVE_CARD_HANDS: u64 = 2_598_960;
/// Number of distinct 6-card hands
pub const SIX_CARD_HANDS: u64 = 20_358_520;
/// Number of distinct 7-card hands
pub const SEVEN_CARD_HANDS: u64 = 133_784_560;

pub const DEFAULT_LOAD_FACTOR: f64 = 1.25;

/// Options controlling how an `Evaluator` obtains its table
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorConfig {
    /// Load an existing table from this file instead of generating one
    pub source_file: Option<PathBuf>,
    pub five_card: bool,
    pub six_card: bool,
    pub seven_card: bool,
    /// Slot headroom over the expected entry count
    pub load_factor: f64,
    /// Report build progress at `info` instead of `debug`
    pub verbose: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        EvaluatorConfig {
            source_file: None,
            five_card: true,
            six_card: false,
            seven_card: false,
            load_factor: DEFAULT_LOAD_FACTOR,
            verbose: false,
        }
    }
}

impl EvaluatorConfig {
    /// Config that loads a previously saved table
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        EvaluatorConfig {
            source_file: Some(path.into()),
            ..Self::default()
        }
    }

    /// Enable every phase up to and including `cards` (5, 6 or 7)
    pub fn up_to(cards: u32) -> Self {
        EvaluatorConfig {
            five_card: cards >= 5,
            six_card: cards >= 6,
            seven_card: cards >= 7,
            ..Self::default()
        }
    }

    pub fn with_phases(mut self, five: bool, six: bool, seven: bool) -> Self {
        self.five_card = five;
        self.six_card = six;
        self.seven_card = seven;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check phase dependencies and capacity before any work starts
    pub fn validate(&self) -> Result<()> {
        if self.six_card && !self.five_card {
            return Err(Error::Configuration(
                "six card evaluation requires five card evaluation".to_string(),
            ));
        }
        if self.seven_card && !self.six_card {
            return Err(Error::Configuration(
                "seven card evaluation requires six card evaluation".to_string(),
            ));
        }
        if self.source_file.is_some() {
            return Ok(());
        }
        if !self.five_card {
            return Err(Error::Configuration("no table phase enabled".to_string()));
        }
        if !self.load_factor.is_finite() || self.load_factor <= 1.0 {
            return Err(Error::Configuration(format!(
                "load factor must be a finite value above 1.0, got {}",
                self.load_factor
            )));
        }
        RankTable::layout(self.table_capacity()).map(|_| ())
    }

    /// Sum of combination counts over enabled phases
    pub fn expected_entries(&self) -> u64 {
        [(self.five_card, 5), (self.six_card, 6), (self.seven_card, 7)]
            .iter()
            .filter(|(enabled, _)| *enabled)
            .map(|&(_, k)| binomial(52, k))
            .sum()
    }

    /// Key/value pairs to allocate: expected entries scaled by the load factor
    pub fn table_capacity(&self) -> u64 {
        (self.expected_entries() as f64 * self.load_factor).ceil() as u64
    }

    /// Memory the generated table will occupy, known before generation starts
    pub fn estimated_table_bytes(&self) -> Result<u64> {
        let (size, count) = RankTable::layout(self.table_capacity())?;
        Ok(size as u64 * count as u64 * 8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvaluatorConfig::default();
        assert!(config.five_card && !config.six_card && !config.seven_card);
        assert_eq!(config.load_factor, 1.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_phase_counts_match_combinations() {
        assert_eq!(FIVE_CARD_HANDS, binomial(52, 5));
        assert_eq!(SIX_CARD_HANDS, binomial(52, 6));
        assert_eq!(SEVEN_CARD_HANDS, binomial(52, 7));
        assert_eq!(
            EvaluatorConfig::up_to(7).expected_entries(),
            FIVE_CARD_HANDS + SIX_CARD_HANDS + SEVEN_CARD_HANDS
        );
    }

    #[test]
    fn test_rejects_broken_phase_chain() {
        let six_only = EvaluatorConfig::default().with_phases(false, true, false);
        assert!(matches!(six_only.validate(), Err(Error::Configuration(_))));

        let seven_without_six = EvaluatorConfig::default().with_phases(true, false, true);
        assert!(matches!(seven_without_six.validate(), Err(Error::Configuration(_))));

        let nothing = EvaluatorConfig::default().with_phases(false, false, false);
        assert!(matches!(nothing.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_rejects_bad_load_factor() {
        for lf in [0.5, 1.0, f64::NAN, f64::INFINITY] {
            let config = EvaluatorConfig::default().with_load_factor(lf);
            assert!(matches!(config.validate(), Err(Error::Configuration(_))), "load factor {}", lf);
        }
        // Seven-card sizing overflows the 32-bit header at an extreme load factor
        let huge = EvaluatorConfig::up_to(7).with_load_factor(20.0);
        assert!(matches!(huge.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_resource_ceiling() {
        let five = EvaluatorConfig::default().estimated_table_bytes().unwrap();
        let seven = EvaluatorConfig::up_to(7).estimated_table_bytes().unwrap();
        assert!(five >= FIVE_CARD_HANDS * 2 * 8);
        assert!(seven > 3_000_000_000, "seven-card table is gigabytes: {}", seven);
    }
}
