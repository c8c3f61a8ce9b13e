//! Hand strength: category plus tie-breaking kickers
//!
//! Strengths compare lexicographically, category first and kickers element-wise,
//! which is exactly the derived ordering of the types below.

use crate::card::rank_char;
use std::fmt;

/// Hand category in strictly increasing order of strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::HighCard,
        Category::Pair,
        Category::TwoPair,
        Category::ThreeOfAKind,
        Category::Straight,
        Category::Flush,
        Category::FullHouse,
        Category::FourOfAKind,
        Category::StraightFlush,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        };
        f.write_str(name)
    }
}

/// Up to five rank values (0-12) in tie-break order.
///
/// Unused slots stay zero. Two kicker lists are only ever compared within the
/// same category, where their lengths agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kickers {
    ranks: [u8; 5],
    len: u8,
}

impl Kickers {
    pub fn push(&mut self, rank: u8) {
        debug_assert!(self.len < 5, "at most five kickers");
        self.ranks[self.len as usize] = rank;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.ranks[..self.len as usize]
    }
}

impl FromIterator<u8> for Kickers {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut kickers = Kickers::default();
        for rank in iter {
            kickers.push(rank);
        }
        kickers
    }
}

/// Strength of a 5-card hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandStrength {
    category: Category,
    kickers: Kickers,
}

impl HandStrength {
    pub fn new(category: Category, kickers: Kickers) -> Self {
        HandStrength { category, kickers }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn kickers(&self) -> &[u8] {
        self.kickers.as_slice()
    }
}

impl fmt::Display for HandStrength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} [", self.category)?;
        for (i, &rank) in self.kickers().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", rank_char(rank))?;
        }
        f.write_str("]")
    }
}
