//! Equivalence class indexer
//!
//! Collects the distinct strengths seen over the 5-card universe in sorted order.
//! A strength's position in that order is its dense rank: 0 for the weakest high
//! card, `len() - 1` for the royal flush.

use crate::error::{Error, Result};
use crate::strength::HandStrength;

/// Number of distinct 5-card strength classes
pub const EQUIVALENCE_CLASSES: usize = 7_462;

/// Sorted, duplicate-free sequence of hand strengths
#[derive(Debug, Clone, Default)]
pub struct EquivalenceIndex {
    classes: Vec<HandStrength>,
}

impl EquivalenceIndex {
    pub fn new() -> Self {
        EquivalenceIndex {
            classes: Vec::with_capacity(EQUIVALENCE_CLASSES),
        }
    }

    /// Binary-insert a strength; returns its position if it was new, `None` if already present
    pub fn insert_unique(&mut self, strength: HandStrength) -> Option<usize> {
        match self.classes.binary_search(&strength) {
            Ok(_) => None,
            Err(position) => {
                self.classes.insert(position, strength);
                Some(position)
            }
        }
    }

    /// Dense rank of a strength.
    ///
    /// A miss means a hand was classified without being indexed first, which is a
    /// builder defect rather than a caller error.
    pub fn rank_of(&self, strength: &HandStrength) -> Result<u32> {
        self.classes
            .binary_search(strength)
            .map(|position| position as u32)
            .map_err(|_| Error::Invariant(format!("strength {} missing from equivalence index", strength)))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Strength of the class with the given rank
    pub fn get(&self, rank: u32) -> Option<&HandStrength> {
        self.classes.get(rank as usize)
    }
}
