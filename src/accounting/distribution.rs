//! Per-spool fill breakdown.
//!
//! Leftover filament is poured into the spool slots starting from the last
//! one, so the measured spool (index 0) is the last to receive material and
//! the first to show a deficit.

use crate::models::{SpoolState, SpoolStatus};

/// Spread `amount_g` over `spool_count` slots of `capacity_g` each, filling
/// from the last slot backward.
///
/// Amount beyond `capacity_g × spool_count` is dropped. With a non-positive
/// capacity every slot reads 0 %. When `is_insufficient` is set, slot 0 is
/// reported as [`SpoolStatus::Insufficient`].
pub fn distribute(
    amount_g: f64,
    capacity_g: f64,
    spool_count: usize,
    is_insufficient: bool,
) -> Vec<SpoolState> {
    let mut slots = vec![
        SpoolState {
            index: 0,
            percentage_full: 0.0,
            status: SpoolStatus::Empty,
        };
        spool_count
    ];

    let mut left = amount_g.max(0.0);
    for index in (0..spool_count).rev() {
        let (fill, percentage_full) = if capacity_g > 0.0 {
            let fill = left.min(capacity_g);
            (fill, fill / capacity_g * 100.0)
        } else {
            (0.0, 0.0)
        };
        left -= fill;
        slots[index] = SpoolState {
            index,
            percentage_full,
            status: SpoolStatus::from_percentage(percentage_full),
        };
    }

    if is_insufficient {
        if let Some(first) = slots.first_mut() {
            first.status = SpoolStatus::Insufficient;
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distributed_grams(slots: &[SpoolState], capacity: f64) -> f64 {
        slots
            .iter()
            .map(|s| s.percentage_full / 100.0 * capacity)
            .sum()
    }

    #[test]
    fn fills_last_slot_first() {
        let slots = distribute(1500.0, 1000.0, 3, false);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[2].percentage_full, 100.0);
        assert_eq!(slots[2].status, SpoolStatus::Full);
        assert_eq!(slots[1].percentage_full, 50.0);
        assert_eq!(slots[1].status, SpoolStatus::Partial);
        assert_eq!(slots[0].percentage_full, 0.0);
        assert_eq!(slots[0].status, SpoolStatus::Empty);
    }

    #[test]
    fn indices_match_positions() {
        let slots = distribute(10.0, 1000.0, 4, false);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.index, i);
        }
    }

    #[test]
    fn total_distributed_is_capped_by_stock() {
        for (amount, count) in [(0.0, 1), (250.0, 2), (3999.0, 4), (5000.0, 3), (1000.0, 1)] {
            let slots = distribute(amount, 1000.0, count, false);
            let expected = f64::min(amount, 1000.0 * count as f64);
            let got = distributed_grams(&slots, 1000.0);
            assert!(
                (got - expected).abs() < 1e-6,
                "amount {amount} over {count}: expected {expected}, got {got}"
            );
        }
    }

    #[test]
    fn insufficient_marks_first_slot_only() {
        let slots = distribute(0.0, 1000.0, 2, true);
        assert_eq!(slots[0].status, SpoolStatus::Insufficient);
        assert_eq!(slots[1].status, SpoolStatus::Empty);
    }

    #[test]
    fn negative_amount_distributes_nothing() {
        let slots = distribute(-50.0, 1000.0, 2, false);
        assert!(slots.iter().all(|s| s.percentage_full == 0.0));
    }

    #[test]
    fn zero_capacity_reads_empty() {
        let slots = distribute(500.0, 0.0, 2, false);
        assert!(slots
            .iter()
            .all(|s| s.percentage_full == 0.0 && s.status == SpoolStatus::Empty));
    }
}
