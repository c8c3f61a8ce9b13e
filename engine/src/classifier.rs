//! Hand classifier using prime product fingerprints
//!
//! This module classifies 5-card hands into a `HandStrength`:
//! - Product of rank primes identifies the ten straights in O(1)
//! - Product of suit primes identifies the four flushes in O(1)
//! - Rank group counts resolve pairs, trips and quads
//!
//! `best_strength` extends this to 6 and 7 cards by exhaustive 5-card subsets.
//! The table builder never calls it; it is the reference the lookup table is
//! checked against.

use crate::card::{cards_of, mask_of, Card, DECK_SIZE, FULL_DECK};
use crate::error::{Error, Result};
use crate::strength::{Category, HandStrength, Kickers};

/// Rank prime products of every straight, indexed by high card (5-high wheel first).
/// The wheel uses the ace's normal prime: 41 * 2 * 3 * 5 * 7.
pub const STRAIGHT_PRODUCTS: [u32; 10] = [
    8_610,      // 5-high (A-2-3-4-5)
    2_310,      // 6-high
    15_015,     // 7-high
    85_085,     // 8-high
    323_323,    // 9-high
    1_062_347,  // T-high
    2_800_733,  // J-high
    6_678_671,  // Q-high
    14_535_931, // K-high
    31_367_009, // A-high
];

/// Suit prime products of every flush: each suit prime to the fifth power
pub const FLUSH_PRODUCTS: [u32; 4] = [
    147_008_443, // 43^5 spades
    229_345_007, // 47^5 hearts
    418_195_493, // 53^5 diamonds
    714_924_299, // 59^5 clubs
];

const WHEEL: usize = 0;

/// Classify a 5-card hand given as a card-set mask
pub fn classify(mask: u64) -> Result<HandStrength> {
    if mask & !FULL_DECK != 0 {
        return Err(Error::Validation(format!(
            "card set {:#x} has bits beyond the {}-card deck",
            mask, DECK_SIZE
        )));
    }
    let count = mask.count_ones();
    if count != 5 {
        return Err(Error::Validation(format!(
            "classification needs exactly 5 cards, got {}",
            count
        )));
    }

    // Deck positions ascend by rank then suit, which is the same order as
    // prime_rank * 100 + prime_suit.
    let mut cards = [Card::from_index(0); 5];
    for (slot, card) in cards.iter_mut().zip(cards_of(mask)) {
        *slot = card;
    }
    Ok(classify_sorted(&cards))
}

/// Classify five distinct cards in any order
pub fn classify_cards(cards: &[Card]) -> Result<HandStrength> {
    let mask = mask_of(cards);
    if mask.count_ones() as usize != cards.len() {
        return Err(Error::Validation("hand contains duplicate cards".to_string()));
    }
    classify(mask)
}

fn classify_sorted(cards: &[Card; 5]) -> HandStrength {
    let rank_product: u32 = cards.iter().map(|c| c.prime_rank()).product();
    let suit_product: u32 = cards.iter().map(|c| c.prime_suit()).product();

    let straight = STRAIGHT_PRODUCTS.iter().position(|&p| p == rank_product);
    let flush = FLUSH_PRODUCTS.contains(&suit_product);

    // Group by rank, ascending; the most recent pair seen is the higher one
    let mut counts = [0u8; 13];
    for card in cards {
        counts[card.rank() as usize] += 1;
    }
    let mut four_of_a_kind = None;
    let mut three_of_a_kind = None;
    let mut one_pair = None;
    let mut two_pair = None;
    for (rank, &count) in counts.iter().enumerate() {
        let rank = rank as u8;
        match count {
            4 => four_of_a_kind = Some(rank),
            3 => three_of_a_kind = Some(rank),
            2 => {
                two_pair = one_pair;
                one_pair = Some(rank);
            }
            _ => {}
        }
    }

    let mut descending = [0u8; 5];
    for (slot, card) in descending.iter_mut().zip(cards.iter().rev()) {
        *slot = card.rank();
    }
    let all: Kickers = descending.iter().copied().collect();
    let with_lead = |lead: &[u8]| -> Kickers {
        let mut kickers: Kickers = lead.iter().copied().collect();
        for &r in descending.iter().filter(|r| !lead.contains(r)) {
            kickers.push(r);
        }
        kickers
    };

    if let (Some(high), true) = (straight, flush) {
        return HandStrength::new(Category::StraightFlush, straight_kickers(descending, high));
    }
    if let Some(quads) = four_of_a_kind {
        return HandStrength::new(Category::FourOfAKind, with_lead(&[quads]));
    }
    if let (Some(trips), Some(pair)) = (three_of_a_kind, one_pair) {
        return HandStrength::new(Category::FullHouse, [trips, pair].into_iter().collect());
    }
    if flush {
        return HandStrength::new(Category::Flush, all);
    }
    if let Some(high) = straight {
        return HandStrength::new(Category::Straight, straight_kickers(descending, high));
    }
    if let Some(trips) = three_of_a_kind {
        return HandStrength::new(Category::ThreeOfAKind, with_lead(&[trips]));
    }
    if let (Some(high), Some(low)) = (one_pair, two_pair) {
        return HandStrength::new(Category::TwoPair, with_lead(&[high, low]));
    }
    if let Some(pair) = one_pair {
        return HandStrength::new(Category::Pair, with_lead(&[pair]));
    }
    HandStrength::new(Category::HighCard, all)
}

/// Straight kickers are the ranks high to low; the wheel plays its ace low
fn straight_kickers(mut descending: [u8; 5], high: usize) -> Kickers {
    if high == WHEEL {
        descending.rotate_left(1);
    }
    descending.into_iter().collect()
}

/// Best 5-card strength contained in a set of 5 to 7 cards
///
/// Checks every 5-card combination (21 for seven cards).
pub fn best_strength(mask: u64) -> Result<HandStrength> {
    let count = mask.count_ones() as usize;
    if !(5..=7).contains(&count) || mask & !FULL_DECK != 0 {
        return Err(Error::Validation(format!(
            "best-hand search needs 5 to 7 cards, got {}",
            count
        )));
    }
    let all_cards: Vec<Card> = cards_of(mask).collect();
    let n = all_cards.len();
    let mut best: Option<HandStrength> = None;

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                for l in (k + 1)..n {
                    for m in (l + 1)..n {
                        let five_cards = [all_cards[i], all_cards[j], all_cards[k], all_cards[l], all_cards[m]];
                        let strength = classify_sorted(&five_cards);
                        if best.map_or(true, |b| strength > b) {
                            best = Some(strength);
                        }
                    }
                }
            }
        }
    }

    best.ok_or_else(|| Error::Invariant("no 5-card subset found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{parse_cards, RANK_PRIMES, SUIT_PRIMES};
    use crate::combinations::Combinations;

    fn hand(s: &str) -> u64 {
        mask_of(&parse_cards(s).unwrap())
    }

    fn classify_str(s: &str) -> HandStrength {
        classify(hand(s)).unwrap()
    }

    #[test]
    fn test_product_tables() {
        let wheel = RANK_PRIMES[12] * RANK_PRIMES[..4].iter().product::<u32>();
        assert_eq!(STRAIGHT_PRODUCTS[0], wheel);
        for high in 4..=12usize {
            let product: u32 = RANK_PRIMES[high - 4..=high].iter().product();
            assert_eq!(STRAIGHT_PRODUCTS[high - 3], product, "{}-rank high straight", high);
        }
        for (suit, &prime) in SUIT_PRIMES.iter().enumerate() {
            assert_eq!(FLUSH_PRODUCTS[suit], prime.pow(5));
        }
    }

    #[test]
    fn test_royal_flush() {
        let s = classify_str("TS JS QS KS AS");
        assert_eq!(s.category(), Category::StraightFlush);
        assert_eq!(s.kickers(), &[12, 11, 10, 9, 8]);
    }

    #[test]
    fn test_four_of_a_kind() {
        let s = classify_str("2C 2D 2H 2S 3C");
        assert_eq!(s.category(), Category::FourOfAKind);
        assert_eq!(s.kickers(), &[0, 1]);
    }

    #[test]
    fn test_full_house() {
        let s = classify_str("2C 2D 3H 3S 3C");
        assert_eq!(s.category(), Category::FullHouse);
        assert_eq!(s.kickers(), &[1, 0]);
    }

    #[test]
    fn test_flush() {
        let s = classify_str("2C 7C 9C JC AC");
        assert_eq!(s.category(), Category::Flush);
        assert_eq!(s.kickers(), &[12, 9, 7, 5, 0]);
    }

    #[test]
    fn test_six_high_straight() {
        let s = classify_str("2C 3D 4H 5S 6C");
        assert_eq!(s.category(), Category::Straight);
        assert_eq!(s.kickers(), &[4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_wheel_is_lowest_straight() {
        let wheel = classify_str("AC 2D 3H 4S 5C");
        assert_eq!(wheel.category(), Category::Straight);
        assert_eq!(wheel.kickers(), &[3, 2, 1, 0, 12], "ace plays low");
        assert!(wheel < classify_str("2C 3D 4H 5S 6C"));
        assert!(wheel > classify_str("AC AD KH KS QC"), "still beats two pair");

        let steel_wheel = classify_str("AH 2H 3H 4H 5H");
        assert_eq!(steel_wheel.category(), Category::StraightFlush);
        assert!(steel_wheel < classify_str("2D 3D 4D 5D 6D"));
    }

    #[test]
    fn test_three_of_a_kind_kickers_descending() {
        let s = classify_str("9C 9D 9H 2S KC");
        assert_eq!(s.category(), Category::ThreeOfAKind);
        assert_eq!(s.kickers(), &[7, 11, 0]);
    }

    #[test]
    fn test_two_pair() {
        let s = classify_str("4C 4D JH JS 7C");
        assert_eq!(s.category(), Category::TwoPair);
        assert_eq!(s.kickers(), &[9, 2, 5]);
    }

    #[test]
    fn test_pair_and_high_card() {
        let pair = classify_str("QC QD 3H 8S 5C");
        assert_eq!(pair.category(), Category::Pair);
        assert_eq!(pair.kickers(), &[10, 6, 3, 1]);

        let high = classify_str("2C 4D 6H 8S TC");
        assert_eq!(high.category(), Category::HighCard);
        assert_eq!(high.kickers(), &[8, 6, 4, 2, 0]);
    }

    #[test]
    fn test_wrong_card_count() {
        assert!(matches!(classify(hand("AS KS QS JS")), Err(Error::Validation(_))));
        assert!(matches!(classify(hand("AS KS QS JS TS 9S")), Err(Error::Validation(_))));
        assert!(matches!(classify(1u64 << 60 | 0b1111), Err(Error::Validation(_))));
    }

    #[test]
    fn test_classify_cards_order_independent() {
        let a = classify_cards(&parse_cards("KH 2S 9D 2C KC").unwrap()).unwrap();
        let b = classify_cards(&parse_cards("2C KC 2S KH 9D").unwrap()).unwrap();
        assert_eq!(a, b);
        assert!(classify_cards(&parse_cards("KH 2S 9D 2C").unwrap()).is_err());
    }

    #[test]
    fn test_best_strength_seven_cards() {
        let best = best_strength(hand("AS KS QS JS TS 2D 2C")).unwrap();
        assert_eq!(best.category(), Category::StraightFlush);

        let best = best_strength(hand("2C 2D 2H 9S 9C 5D 5H")).unwrap();
        assert_eq!(best.category(), Category::FullHouse);
        assert_eq!(best.kickers(), &[0, 7], "deuces full of nines, not fives");
    }

    /// Independent rule check: counts ranks and suits instead of prime products
    fn reference_category(mask: u64) -> Category {
        let cards: Vec<Card> = cards_of(mask).collect();
        let mut rank_counts = [0u8; 13];
        let mut suit_counts = [0u8; 4];
        for card in &cards {
            rank_counts[card.rank() as usize] += 1;
            suit_counts[card.suit() as usize] += 1;
        }
        let flush = suit_counts.contains(&5);
        let present: u16 = (0..13).filter(|&r| rank_counts[r] > 0).fold(0, |acc, r| acc | 1 << r);
        let straight = present.count_ones() == 5
            && (present >> present.trailing_zeros() == 0b11111 || present == 0b1_0000_0000_1111);
        let mut groups: Vec<u8> = rank_counts.iter().copied().filter(|&c| c > 0).collect();
        groups.sort_unstable_by(|a, b| b.cmp(a));

        match (straight, flush, groups.as_slice()) {
            (true, true, _) => Category::StraightFlush,
            (_, _, [4, ..]) => Category::FourOfAKind,
            (_, _, [3, 2]) => Category::FullHouse,
            (_, true, _) => Category::Flush,
            (true, _, _) => Category::Straight,
            (_, _, [3, ..]) => Category::ThreeOfAKind,
            (_, _, [2, 2, ..]) => Category::TwoPair,
            (_, _, [2, ..]) => Category::Pair,
            _ => Category::HighCard,
        }
    }

    #[test]
    fn test_all_hands_match_reference() {
        let mut per_category = [0u32; 9];
        for mask in Combinations::new(5) {
            let strength = classify(mask).unwrap();
            assert_eq!(
                strength.category(),
                reference_category(mask),
                "category mismatch for {:#x}",
                mask
            );
            per_category[strength.category() as usize] += 1;
        }
        // Standard 5-card frequencies, HighCard first
        assert_eq!(
            per_category,
            [1_302_540, 1_098_240, 123_552, 54_912, 10_200, 5_108, 3_744, 624, 40]
        );
    }
}
