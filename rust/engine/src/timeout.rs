//! Default actions applied when the decision clock runs out.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::betting::{
    advance_cursor, after_wild_assignment, decide_insurance, dealer_next, place_bets, resolve_all,
    settle_round, DEFAULT_WILD_RANK,
};
use crate::clock::TimeSource;
use crate::deck::Shuffler;
use crate::engine::Engine;
use crate::errors::EngineError;
use crate::game::{Match, Phase};
use crate::hand::HandStatus;

impl<S: Shuffler, T: TimeSource> Engine<S, T> {
    /// Applies the current phase's default action if its decision clock has expired.
    ///
    /// The clock is cleared before the default runs, inside the same transaction, so a
    /// second call for the same expiry finds nothing to do. Returns whether a default
    /// was applied.
    pub fn apply_default_if_expired(&mut self, m: &mut Match) -> Result<bool, EngineError> {
        if !m.clock.has_expired(self.time.now(), &m.settings.clock) {
            return Ok(false);
        }
        self.transact(m, "apply default", |engine, m, now| {
            if !m.clock.has_expired(now, &m.settings.clock) {
                return Ok(false);
            }
            let phase = m.phase;
            m.clock.clear();
            info!(phase = ?phase, turn = m.current_turn, "decision timed out");
            engine.apply_default(m, now)?;
            Ok(true)
        })
    }

    /// Applies defaults until the clock is no longer expired, as a sweep would after a
    /// long pause. Hitting `max_iterations` means the clock failed to clear.
    pub fn drain_expired(&mut self, m: &mut Match, max_iterations: usize) -> Result<usize, EngineError> {
        for applied in 0..max_iterations {
            if !self.apply_default_if_expired(m)? {
                return Ok(applied);
            }
        }
        if !m.clock.has_expired(self.time.now(), &m.settings.clock) {
            return Ok(max_iterations);
        }
        warn!(max_iterations, phase = ?m.phase, "decision clock did not clear");
        Err(EngineError::ClockNotCleared {
            iterations: max_iterations,
        })
    }

    fn apply_default(&mut self, m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
        match m.phase {
            Phase::Choice => self.apply_choice(m, true, now),
            Phase::WaitingBets => {
                let minimum = m.settings.min_bet.max(1);
                if m.active_turn()?.chips() >= minimum {
                    place_bets(m, &[minimum], now)
                } else {
                    self.end_turn(m, now)
                }
            }
            Phase::Insurance => {
                let boxes = m.active_turn()?.round()?.boxes.len();
                decide_insurance(m, &vec![false; boxes], now)
            }
            Phase::PlayerTurn => {
                let hand = m
                    .turn_mut()?
                    .round_mut()?
                    .current_hand_mut()
                    .ok_or(EngineError::HandNotActive)?;
                hand.status = HandStatus::Stand;
                advance_cursor(m, now)
            }
            Phase::WildChoice => {
                let hand = m
                    .turn_mut()?
                    .round_mut()?
                    .current_hand_mut()
                    .ok_or(EngineError::HandNotActive)?;
                resolve_all(hand.cards_mut(), DEFAULT_WILD_RANK);
                after_wild_assignment(m, now)
            }
            Phase::DealerTurn => settle_round(m, now),
            Phase::DealerWildChoice => {
                let round = m.turn_mut()?.round_mut()?;
                resolve_all(&mut round.dealer_cards, DEFAULT_WILD_RANK);
                dealer_next(m, now)
            }
            Phase::RoundResult => self.continue_after_round(m, now).map(|_| ()),
            Phase::CardDraw | Phase::TurnStart | Phase::MatchOver => Ok(()),
        }
    }
}
