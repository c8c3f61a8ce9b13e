//! Card codec
//!
//! A card is a (rank, suit) pair packed into its deck position `rank * 4 + suit`.
//! The position doubles as the bit index inside a 64-bit card-set mask, and each
//! rank and suit carries a prime used for multiplicative fingerprints.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Number of cards in the deck; only the low 52 bits of a mask are meaningful
pub const DECK_SIZE: u32 = 52;

/// Mask with every deck position set
pub const FULL_DECK: u64 = (1u64 << DECK_SIZE) - 1;

/// Prime numbers for each rank (2-A, where 2=index 0, A=index 12)
pub const RANK_PRIMES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// Prime numbers for each suit (spades, hearts, diamonds, clubs)
pub const SUIT_PRIMES: [u32; 4] = [43, 47, 53, 59];

const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];
const SUIT_CHARS: [char; 4] = ['S', 'H', 'D', 'C'];

/// A playing card stored as its deck position (0-51)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card(u8);

impl Card {
    /// Create a card from rank (0=2 .. 12=A) and suit (0=S, 1=H, 2=D, 3=C)
    pub fn new(rank: u8, suit: u8) -> Self {
        assert!(rank < 13 && suit < 4, "Card rank must be 0-12 and suit 0-3");
        Card(rank * 4 + suit)
    }

    /// Create a card from its deck position (0-51)
    pub fn from_index(index: u8) -> Self {
        assert!((index as u32) < DECK_SIZE, "Card index must be 0-51");
        Card(index)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn rank(self) -> u8 {
        self.0 / 4
    }

    pub fn suit(self) -> u8 {
        self.0 % 4
    }

    /// Single-bit mask for this card
    pub fn bit(self) -> u64 {
        1u64 << self.0
    }

    pub fn prime_rank(self) -> u32 {
        RANK_PRIMES[self.rank() as usize]
    }

    pub fn prime_suit(self) -> u32 {
        SUIT_PRIMES[self.suit() as usize]
    }
}

impl FromStr for Card {
    type Err = Error;

    /// Parse `"<rank><suit>"`, e.g. `"TS"` or `"ah"` (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars().map(|c| c.to_ascii_uppercase());
        let (r, u) = match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(u), None) => (r, u),
            _ => {
                return Err(Error::Validation(format!(
                    "card string {:?} must be exactly two characters",
                    s
                )))
            }
        };
        let rank = RANK_CHARS
            .iter()
            .position(|&c| c == r)
            .ok_or_else(|| Error::Validation(format!("unknown rank {:?} in card {:?}", r, s)))?;
        let suit = SUIT_CHARS
            .iter()
            .position(|&c| c == u)
            .ok_or_else(|| Error::Validation(format!("unknown suit {:?} in card {:?}", u, s)))?;
        Ok(Card::new(rank as u8, suit as u8))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}",
            RANK_CHARS[self.rank() as usize],
            SUIT_CHARS[self.suit() as usize]
        )
    }
}

/// Character used to print a rank value (0-12)
pub fn rank_char(rank: u8) -> char {
    RANK_CHARS[rank as usize]
}

/// Combine cards into a card-set mask
pub fn mask_of(cards: &[Card]) -> u64 {
    cards.iter().fold(0u64, |acc, card| acc | card.bit())
}

/// Cards present in a mask, in ascending deck position (rank, then suit)
pub fn cards_of(mask: u64) -> impl Iterator<Item = Card> {
    let mut rest = mask & FULL_DECK;
    std::iter::from_fn(move || {
        if rest == 0 {
            return None;
        }
        let index = rest.trailing_zeros() as u8;
        rest &= rest - 1;
        Some(Card(index))
    })
}

/// Parse a whitespace- or comma-separated list of cards, rejecting duplicates
pub fn parse_cards(s: &str) -> Result<Vec<Card>> {
    let mut cards = Vec::new();
    let mut seen = 0u64;
    for token in s.split(|c: char| c.is_whitespace() || c == ',').filter(|t| !t.is_empty()) {
        let card: Card = token.parse()?;
        if seen & card.bit() != 0 {
            return Err(Error::Validation(format!("duplicate card {}", card)));
        }
        seen |= card.bit();
        cards.push(card);
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_encoding() {
        let two_spades: Card = "2S".parse().unwrap();
        let ace_clubs: Card = "AC".parse().unwrap();
        assert_eq!(two_spades.index(), 0);
        assert_eq!(ace_clubs.index(), 51, "A=12, C=3 -> 12*4+3");
        assert_eq!(ace_clubs.bit(), 1u64 << 51);
        assert_eq!(Card::new(8, 1).to_string(), "TH");
    }

    #[test]
    fn test_parse_case_insensitive() {
        let lower: Card = "kd".parse().unwrap();
        let upper: Card = "KD".parse().unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.rank(), 11);
        assert_eq!(lower.suit(), 2);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "A", "ASX", "1S", "AX", "10S"] {
            let err = bad.parse::<Card>().unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{:?} should fail validation", bad);
        }
    }

    #[test]
    fn test_primes() {
        let card: Card = "AH".parse().unwrap();
        assert_eq!(card.prime_rank(), 41);
        assert_eq!(card.prime_suit(), 47);
    }

    #[test]
    fn test_mask_round_trip() {
        let cards = parse_cards("AS, KH 2c").unwrap();
        let mask = mask_of(&cards);
        assert_eq!(mask.count_ones(), 3);
        let back: Vec<Card> = cards_of(mask).collect();
        assert_eq!(back.len(), 3);
        assert_eq!(back[0].to_string(), "2C", "cards come back in deck order");
        assert_eq!(mask_of(&back), mask);
    }

    #[test]
    fn test_parse_cards_rejects_duplicates() {
        assert!(matches!(parse_cards("AS as"), Err(Error::Validation(_))));
    }
}
