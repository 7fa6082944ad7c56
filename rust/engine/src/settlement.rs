//! Settlement hook: the record a completed match hands to the external payout
//! pipeline, and the rake arithmetic that pipeline applies to it.

use serde::{Deserialize, Serialize};

use crate::game::{EndReason, Match, Seat, TurnResult};

/// Final outcome of a match as consumed by the wallet side.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// `None` is a draw
    pub winner: Option<Seat>,
    pub reason: EndReason,
    pub stake: u32,
    /// Score of each seat: its most recent turn result, 0 if it never played
    pub seat_one_chips: u32,
    pub seat_two_chips: u32,
    pub turn_results: Vec<TurnResult>,
}

impl SettlementRecord {
    pub fn chips_for(&self, seat: Seat) -> u32 {
        match seat {
            Seat::One => self.seat_one_chips,
            Seat::Two => self.seat_two_chips,
        }
    }
}

impl Match {
    /// The settlement record, available once the match is over.
    pub fn settlement(&self) -> Option<SettlementRecord> {
        let result = self.result.filter(|_| self.match_over)?;
        let chips = |seat| self.last_result(seat).map_or(0, |r| r.final_chips);
        Some(SettlementRecord {
            winner: result.winner,
            reason: result.reason,
            stake: self.settings.stake,
            seat_one_chips: chips(Seat::One),
            seat_two_chips: chips(Seat::Two),
            turn_results: self.results.clone(),
        })
    }
}

/// Rake rate by stake, in basis points.
pub trait RakePolicy {
    fn rake_bps(&self, stake: u32) -> u32;
}

/// Applies from `min_stake` (inclusive) up to the next tier.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct RakeTier {
    pub min_stake: u32,
    pub bps: u32,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RakeSchedule {
    tiers: Vec<RakeTier>,
}

impl RakeSchedule {
    /// Tiers are sorted by `min_stake`; stakes below the first tier pay no rake.
    pub fn new(mut tiers: Vec<RakeTier>) -> Self {
        tiers.sort_by_key(|t| t.min_stake);
        Self { tiers }
    }

    pub fn tiers(&self) -> &[RakeTier] {
        &self.tiers
    }
}

impl Default for RakeSchedule {
    fn default() -> Self {
        Self::new(vec![
            RakeTier { min_stake: 0, bps: 100 },
            RakeTier { min_stake: 250, bps: 200 },
            RakeTier { min_stake: 1000, bps: 300 },
            RakeTier { min_stake: 5000, bps: 500 },
        ])
    }
}

impl RakePolicy for RakeSchedule {
    fn rake_bps(&self, stake: u32) -> u32 {
        self.tiers
            .iter()
            .rev()
            .find(|t| stake >= t.min_stake)
            .map_or(0, |t| t.bps)
    }
}

/// Wallet movements implied by a settlement.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub pot: u64,
    pub rake: u64,
    pub seat_one: u64,
    pub seat_two: u64,
}

/// Splits the pot (both stakes) for `record`.
///
/// # Examples
///
/// ```
/// use duel21_engine::game::{EndReason, Seat};
/// use duel21_engine::settlement::{compute_payout, RakeSchedule, SettlementRecord};
///
/// let record = SettlementRecord {
///     winner: Some(Seat::Two),
///     reason: EndReason::Completed,
///     stake: 500,
///     seat_one_chips: 80,
///     seat_two_chips: 140,
///     turn_results: vec![],
/// };
/// let payout = compute_payout(&record, &RakeSchedule::default());
/// assert_eq!(payout.pot, 1000);
/// assert_eq!(payout.rake, 20);
/// assert_eq!((payout.seat_one, payout.seat_two), (0, 980));
/// ```
pub fn compute_payout<P: RakePolicy + ?Sized>(record: &SettlementRecord, policy: &P) -> Payout {
    let stake = u64::from(record.stake);
    let pot = stake * 2;
    match record.winner {
        None => Payout {
            pot,
            rake: 0,
            seat_one: stake,
            seat_two: stake,
        },
        Some(winner) => {
            let rake = pot * u64::from(policy.rake_bps(record.stake)) / 10_000;
            let credit = pot - rake;
            let (seat_one, seat_two) = match winner {
                Seat::One => (credit, 0),
                Seat::Two => (0, credit),
            };
            Payout {
                pot,
                rake,
                seat_one,
                seat_two,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_inclusive() {
        let s = RakeSchedule::default();
        assert_eq!(s.rake_bps(249), 100);
        assert_eq!(s.rake_bps(250), 200);
        assert_eq!(s.rake_bps(5000), 500);
    }

    #[test]
    fn unsorted_tiers_are_ordered() {
        let s = RakeSchedule::new(vec![
            RakeTier { min_stake: 100, bps: 50 },
            RakeTier { min_stake: 10, bps: 10 },
        ]);
        assert_eq!(s.rake_bps(5), 0);
        assert_eq!(s.rake_bps(50), 10);
        assert_eq!(s.rake_bps(150), 50);
    }

    #[test]
    fn rake_rounds_down() {
        let record = SettlementRecord {
            winner: Some(Seat::One),
            reason: EndReason::Forfeit,
            stake: 75,
            seat_one_chips: 0,
            seat_two_chips: 0,
            turn_results: vec![],
        };
        let p = compute_payout(&record, &RakeSchedule::default());
        // 150 * 1% = 1.5
        assert_eq!(p.rake, 1);
        assert_eq!(p.seat_one, 149);
    }
}
