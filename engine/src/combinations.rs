//! Enumeration of card sets over the 52-card deck
//!
//! Every pass of the table builder walks all k-card masks in increasing numeric
//! order, always over the same 0-based deck positions.

use crate::card::DECK_SIZE;

/// Number of ways to choose `k` items from `n`
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1u64, |acc, i| acc * (n - i) / (i + 1))
}

/// All masks with exactly `k` of the 52 deck bits set, in ascending order.
///
/// Uses Gosper's hack to step from one mask to the next of equal popcount.
#[derive(Debug, Clone)]
pub struct Combinations {
    next: u64,
    limit: u64,
}

impl Combinations {
    pub fn new(k: u32) -> Self {
        assert!(k >= 1 && k <= DECK_SIZE, "k must be 1-52");
        Combinations {
            next: (1u64 << k) - 1,
            limit: 1u64 << DECK_SIZE,
        }
    }
}

impl Iterator for Combinations {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.next;
        if current >= self.limit {
            return None;
        }
        let lowest = current & current.wrapping_neg();
        let ripple = current + lowest;
        self.next = (((ripple ^ current) >> 2) / lowest) | ripple;
        Some(current)
    }
}

/// Sub-masks of `mask` with exactly one card removed, lowest card first
pub fn drop_one(mask: u64) -> impl Iterator<Item = u64> {
    let mut rest = mask;
    std::iter::from_fn(move || {
        if rest == 0 {
            return None;
        }
        let bit = rest & rest.wrapping_neg();
        rest ^= bit;
        Some(mask ^ bit)
    })
}
