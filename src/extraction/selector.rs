//! Picks one price out of the candidates an extractor produced
//!
//! Steps, in order:
//! 1. minor-unit correction (`250000` kuruş → `2500.00`)
//! 2. drop non-positive values
//! 3. drop values above 10× the median, unless that drops everything
//! 4. prefer values ≥ 100, unless none qualify
//! 5. take the minimum
//!
//! The minimum is deliberate: pages list the crossed-out original next to
//! the discounted price, and the lower one is what the shopper pays.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::common::types::PriceCandidate;

/// Values at or above this may be expressed in minor units
pub const MINOR_UNIT_THRESHOLD: Decimal = dec!(100000);
/// A corrected value above this means the original was already a real price
pub const MINOR_UNIT_CAP: Decimal = dec!(100000000);
/// Candidates above `OUTLIER_FACTOR × median` are discarded
pub const OUTLIER_FACTOR: Decimal = dec!(10);
/// Smaller values are usually shipping fees, ratings or counters
pub const PRICE_FLOOR: Decimal = dec!(100);

const HUNDRED: Decimal = dec!(100);
const TWO: Decimal = dec!(2);

/// Divide by 100 when the value looks like a price written in minor units
pub fn correct_minor_unit(value: Decimal) -> Decimal {
    if value < MINOR_UNIT_THRESHOLD || !(value % HUNDRED).is_zero() {
        return value;
    }
    let corrected = value / HUNDRED;
    if corrected > MINOR_UNIT_CAP {
        value
    } else {
        corrected
    }
}

/// Median of an ascending slice; mean of the middle pair for even lengths
pub fn median(sorted: &[Decimal]) -> Option<Decimal> {
    let len = sorted.len();
    if len == 0 {
        return None;
    }
    let mid = len / 2;
    if len % 2 == 1 {
        Some(sorted[mid])
    } else {
        let (low, high) = (sorted[mid - 1], sorted[mid]);
        // low + high can overflow near Decimal::MAX
        Some(low + (high - low) / TWO)
    }
}

/// Choose the most plausible price, or `None` if nothing survives
pub fn select_best(candidates: &[Decimal]) -> Option<Decimal> {
    let mut sorted: Vec<Decimal> = candidates
        .iter()
        .copied()
        .map(correct_minor_unit)
        .filter(|v| v.is_sign_positive() && !v.is_zero())
        .collect();
    sorted.sort();

    let median = median(&sorted)?;
    let ceiling = median.checked_mul(OUTLIER_FACTOR).unwrap_or(Decimal::MAX);

    let mut plausible: Vec<Decimal> = sorted.iter().copied().filter(|v| *v <= ceiling).collect();
    if plausible.is_empty() {
        plausible = sorted;
    }

    let above_floor: Vec<Decimal> = plausible
        .iter()
        .copied()
        .filter(|v| *v >= PRICE_FLOOR)
        .collect();
    let pool = if above_floor.is_empty() {
        plausible
    } else {
        above_floor
    };

    pool.into_iter().min()
}

/// [`select_best`] over tagged candidates, keeping the winner's source
pub fn select_candidate(candidates: &[PriceCandidate]) -> Option<PriceCandidate> {
    let values: Vec<Decimal> = candidates.iter().map(|c| c.value).collect();
    let price = select_best(&values)?;
    candidates
        .iter()
        .find(|c| correct_minor_unit(c.value) == price)
        .map(|c| PriceCandidate {
            value: price,
            source: c.source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::ExtractorKind;
    use std::str::FromStr;

    #[test]
    fn test_minor_unit_correction() {
        assert_eq!(correct_minor_unit(dec!(250000)), dec!(2500.00));
        assert_eq!(correct_minor_unit(dec!(100050)), dec!(100050));
        assert_eq!(correct_minor_unit(dec!(999999999)), dec!(999999999));
        assert_eq!(correct_minor_unit(dec!(99900)), dec!(99900));
    }

    #[test]
    fn test_minor_unit_cap() {
        // corrected value would be 200,000,000
        assert_eq!(correct_minor_unit(dec!(20000000000)), dec!(20000000000));
        assert_eq!(correct_minor_unit(dec!(10000000000)), dec!(100000000));
    }

    #[test]
    fn test_outlier_rejection() {
        let candidates = [dec!(499), dec!(4999), dec!(50000000)];
        assert_eq!(select_best(&candidates), Some(dec!(499)));
    }

    #[test]
    fn test_floor_filter() {
        assert_eq!(select_best(&[dec!(4999), dec!(12)]), Some(dec!(4999)));
    }

    #[test]
    fn test_floor_falls_back_when_everything_is_small() {
        assert_eq!(select_best(&[dec!(49.90), dec!(12)]), Some(dec!(12)));
    }

    #[test]
    fn test_minimum_of_discount_and_original() {
        assert_eq!(select_best(&[dec!(1499.00), dec!(1299.90)]), Some(dec!(1299.90)));
    }

    #[test]
    fn test_empty_and_non_positive() {
        assert_eq!(select_best(&[]), None);
        assert_eq!(select_best(&[dec!(0), dec!(-5)]), None);
    }

    #[test]
    fn test_deterministic() {
        let candidates = [dec!(1299), dec!(4.5), dec!(129900), dec!(1499), dec!(99999999)];
        let first = select_best(&candidates);
        for _ in 0..10 {
            assert_eq!(select_best(&candidates), first);
        }
        let mut reversed = candidates;
        reversed.reverse();
        assert_eq!(select_best(&reversed), first);
    }

    #[test]
    fn test_huge_candidates_do_not_overflow() {
        let low = Decimal::from_str("50000000000000000000000000001").unwrap();
        let high = Decimal::from_str("50000000000000000000000000003").unwrap();
        assert_eq!(select_best(&[low, high]), Some(low));
        assert_eq!(select_best(&[Decimal::MAX, Decimal::MAX]), Some(Decimal::MAX));
        assert!(median(&[low, high]).is_some());
    }

    #[test]
    fn test_candidate_keeps_winning_source() {
        let candidates = [
            PriceCandidate {
                value: dec!(1499.00),
                source: ExtractorKind::StructuredData,
            },
            PriceCandidate {
                value: dec!(129990),
                source: ExtractorKind::EmbeddedState,
            },
        ];
        let best = select_candidate(&candidates).unwrap();
        assert_eq!(best.value, dec!(1299.90));
        assert_eq!(best.source, ExtractorKind::EmbeddedState);
        assert_eq!(select_candidate(&[]), None);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[dec!(1), dec!(3), dec!(9)]), Some(dec!(3)));
        assert_eq!(median(&[dec!(1), dec!(3)]), Some(dec!(2)));
    }
}
