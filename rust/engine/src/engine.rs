use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::clock::{ClockPolicy, SystemClock, TimeSource};
use crate::deck::{Deck, SecureShuffle, Shuffler};
use crate::errors::EngineError;
use crate::game::{EndReason, GameMode, Match, MatchResult, MatchSettings, Phase, Seat, TurnResult, TurnSlot};
use crate::opener::{draw_round, opener_deck};
use crate::turn::{Turn, TURN_STARTING_CHIPS};

/// Largest accepted [`EngineConfig::turn_stake`].
pub const MAX_TURN_STAKE: u32 = 1_000_000_000;

/// Table parameters shared by every match an engine creates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chips added to a player's carried total when their turn starts
    pub turn_stake: u32,
    /// Smallest accepted box bet, also the default bet on timeout
    pub min_bet: u32,
    pub clock: ClockPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            turn_stake: TURN_STARTING_CHIPS,
            min_bet: 1,
            clock: ClockPolicy::default(),
        }
    }
}

/// Drives [`Match`] aggregates through their phases.
///
/// The engine owns the randomness and the time source; the match itself is plain data.
/// Every public operation is a transaction: it works on a draft of the match and only
/// writes it back when the whole transition succeeds, so a rejected action leaves the
/// caller's match untouched.
///
/// # Examples
///
/// ```
/// use duel21_engine::clock::SystemClock;
/// use duel21_engine::deck::SecureShuffle;
/// use duel21_engine::engine::{Engine, EngineConfig};
/// use duel21_engine::game::{GameMode, Phase};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let shuffler = SecureShuffle::new(ChaCha20Rng::seed_from_u64(7));
/// let mut engine = Engine::new(shuffler, SystemClock, EngineConfig::default());
///
/// let mut m = engine.create_match(50, GameMode::Classic, false).unwrap();
/// assert_eq!(m.phase(), Phase::Choice);
///
/// let chooser = m.chooser().unwrap();
/// engine.make_choice(&mut m, chooser, true).unwrap();
/// assert_eq!(m.phase(), Phase::WaitingBets);
/// assert_eq!(m.turn().unwrap().chips(), 100);
/// ```
#[derive(Debug)]
pub struct Engine<S, T = SystemClock> {
    pub(crate) shuffler: S,
    pub(crate) time: T,
    config: EngineConfig,
}

impl Engine<SecureShuffle<StdRng>, SystemClock> {
    /// Engine seeded from the operating system, for real matches.
    pub fn from_entropy(config: EngineConfig) -> Self {
        Engine::new(SecureShuffle::new(StdRng::from_os_rng()), SystemClock, config)
    }
}

impl Engine<SecureShuffle<ChaCha20Rng>, SystemClock> {
    /// Deterministic engine for simulations and replays.
    pub fn seeded(seed: u64, config: EngineConfig) -> Self {
        Engine::new(
            SecureShuffle::new(ChaCha20Rng::seed_from_u64(seed)),
            SystemClock,
            config,
        )
    }
}

impl<S: Shuffler, T: TimeSource> Engine<S, T> {
    pub fn new(shuffler: S, time: T, config: EngineConfig) -> Self {
        Self {
            shuffler,
            time,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn time(&self) -> &T {
        &self.time
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.time.now()
    }

    /// Creates a match and runs the opening high-card draw. The match is returned in
    /// [`Phase::Choice`], waiting on the draw winner.
    pub fn create_match(
        &mut self,
        stake: u32,
        mode: GameMode,
        extended: bool,
    ) -> Result<Match, EngineError> {
        if stake == 0 {
            return Err(EngineError::InvalidStake);
        }
        if self.config.turn_stake > MAX_TURN_STAKE {
            return Err(EngineError::TurnStakeTooLarge {
                turn_stake: self.config.turn_stake,
                max: MAX_TURN_STAKE,
            });
        }
        let settings = MatchSettings {
            stake,
            mode,
            extended,
            turn_stake: self.config.turn_stake,
            min_bet: self.config.min_bet.max(1),
            clock: self.config.clock,
        };
        let deck = opener_deck(&mut self.shuffler, mode.uses_wild_cards());
        let mut m = Match::new(settings, deck);
        let now = self.time.now();
        let winner = draw_round(&mut m.opener, &mut self.shuffler, mode.uses_wild_cards())
            .inspect_err(|e| error!(error = %e, "opening draw failed"))?;
        m.chooser = Some(winner);
        m.enter(Phase::Choice, now);
        info!(
            stake,
            mode = %mode,
            extended,
            draws = m.opener.draws.len(),
            chooser = ?winner,
            "match created"
        );
        Ok(m)
    }

    /// The draw winner decides whether they play the first turn as player
    /// (`goes_first_as_player`) or as bank.
    pub fn make_choice(
        &mut self,
        m: &mut Match,
        actor: Seat,
        goes_first_as_player: bool,
    ) -> Result<(), EngineError> {
        self.transact(m, "make choice", |engine, m, now| {
            m.expect_phase(Phase::Choice, "make choice")?;
            m.expect_decider(actor)?;
            engine.apply_choice(m, goes_first_as_player, now)
        })
    }

    /// Leaves the round result. Ends the turn when the cut card has been passed or the
    /// player can no longer cover the minimum bet, otherwise opens the next round. Returns whether the turn
    /// ended.
    pub fn next_round_or_end_turn(&mut self, m: &mut Match) -> Result<bool, EngineError> {
        self.transact(m, "continue", |engine, m, now| {
            m.expect_phase(Phase::RoundResult, "continue")?;
            engine.continue_after_round(m, now)
        })
    }

    /// The acting player stops the turn between rounds and keeps the current stack,
    /// either while bets are open or on the round result.
    pub fn end_turn_early(&mut self, m: &mut Match, actor: Seat) -> Result<(), EngineError> {
        self.transact(m, "end turn", |engine, m, now| {
            if m.match_over {
                return Err(EngineError::MatchOver);
            }
            if !matches!(m.phase, Phase::WaitingBets | Phase::RoundResult) {
                return Err(EngineError::WrongPhase {
                    action: "end turn",
                    phase: m.phase,
                });
            }
            let expected = m.active_turn()?.acting_player;
            if actor != expected {
                return Err(EngineError::NotYourTurn { expected, actor });
            }
            info!(player = ?actor, chips = m.active_turn()?.chips(), "turn ended early");
            engine.end_turn(m, now)
        })
    }

    /// Ends the match immediately in favour of the other seat.
    pub fn forfeit(&mut self, m: &mut Match, seat: Seat) -> Result<(), EngineError> {
        self.transact(m, "forfeit", |_, m, now| {
            if m.match_over {
                return Err(EngineError::MatchOver);
            }
            m.result = Some(MatchResult {
                winner: Some(seat.other()),
                reason: EndReason::Forfeit,
            });
            m.match_over = true;
            m.enter(Phase::MatchOver, now);
            info!(forfeited_by = ?seat, "match forfeited");
            Ok(())
        })
    }

    /// Runs `f` on a draft of the match and commits it only on success.
    pub(crate) fn transact<O, F>(
        &mut self,
        m: &mut Match,
        action: &'static str,
        f: F,
    ) -> Result<O, EngineError>
    where
        F: FnOnce(&mut Self, &mut Match, DateTime<Utc>) -> Result<O, EngineError>,
    {
        let now = self.time.now();
        let mut draft = m.clone();
        match f(self, &mut draft, now) {
            Ok(out) => {
                *m = draft;
                Ok(out)
            }
            Err(e) => {
                if e.is_internal() {
                    error!(action, phase = ?m.phase, error = %e, "transition failed");
                } else {
                    debug!(action, phase = ?m.phase, error = %e, "action rejected");
                }
                Err(e)
            }
        }
    }

    pub(crate) fn apply_choice(
        &mut self,
        m: &mut Match,
        goes_first_as_player: bool,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let chooser = m.chooser.ok_or(EngineError::MissingChooser)?;
        let first = if goes_first_as_player {
            chooser
        } else {
            chooser.other()
        };
        m.turns = (0..m.total_turns())
            .map(|i| {
                let player = if i % 2 == 0 { first } else { first.other() };
                TurnSlot {
                    acting_player: player,
                    acting_bank: player.other(),
                }
            })
            .collect();
        debug!(chooser = ?chooser, first_player = ?first, "seating chosen");
        m.enter(Phase::TurnStart, now);
        self.enter_turn(m, now)
    }

    /// Sets up the turn at `current_turn` with a fresh shoe. The starting stack is the
    /// player's last recorded total plus the turn stake.
    pub(crate) fn enter_turn(&mut self, m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
        m.expect_phase(Phase::TurnStart, "start a turn")?;
        let slot = m.current_slot().ok_or(EngineError::MissingTurn)?;
        let carried = m
            .last_result(slot.acting_player)
            .map_or(0, |r| r.final_chips);
        let starting = carried
            .checked_add(m.settings.turn_stake)
            .ok_or(EngineError::ChipOverflow)?;
        let deck = Deck::shoe(&mut self.shuffler, m.mode().uses_wild_cards());
        m.turn = Some(Turn::new(slot.acting_player, slot.acting_bank, deck, starting));
        info!(
            turn = m.current_turn,
            player = ?slot.acting_player,
            bank = ?slot.acting_bank,
            starting_chips = starting,
            "turn started"
        );
        m.enter(Phase::WaitingBets, now);
        Ok(())
    }

    pub(crate) fn continue_after_round(
        &mut self,
        m: &mut Match,
        now: DateTime<Utc>,
    ) -> Result<bool, EngineError> {
        let min_bet = m.settings.min_bet.max(1);
        let turn = m.turn_mut()?;
        if turn.cut_card_reached || turn.chips() < min_bet {
            self.end_turn(m, now)?;
            return Ok(true);
        }
        turn.round = None;
        m.enter(Phase::WaitingBets, now);
        Ok(false)
    }

    /// Records the acting player's result and moves to the next turn or the end of
    /// the match.
    pub(crate) fn end_turn(&mut self, m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
        let turn = m.turn.take().ok_or(EngineError::MissingTurn)?;
        let result = TurnResult {
            turn_index: m.current_turn,
            seat: turn.acting_player,
            starting_chips: turn.starting_chips,
            final_chips: turn.chips(),
        };
        info!(
            turn = result.turn_index,
            player = ?result.seat,
            final_chips = result.final_chips,
            rounds = turn.rounds_played,
            "turn ended"
        );
        m.results.push(result);
        m.current_turn += 1;
        if m.current_turn < m.turns.len() {
            m.enter(Phase::TurnStart, now);
            self.enter_turn(m, now)
        } else {
            complete_match(m, now);
            Ok(())
        }
    }
}

/// Each seat is scored by its most recent turn result; equal scores are a draw.
pub fn decide_winner(m: &Match) -> Option<Seat> {
    let score = |seat| m.last_result(seat).map_or(0, |r: &TurnResult| r.final_chips);
    let (one, two) = (score(Seat::One), score(Seat::Two));
    match one.cmp(&two) {
        std::cmp::Ordering::Greater => Some(Seat::One),
        std::cmp::Ordering::Less => Some(Seat::Two),
        std::cmp::Ordering::Equal => None,
    }
}

fn complete_match(m: &mut Match, now: DateTime<Utc>) {
    let winner = decide_winner(m);
    m.result = Some(MatchResult {
        winner,
        reason: EndReason::Completed,
    });
    m.match_over = true;
    m.enter(Phase::MatchOver, now);
    info!(winner = ?winner, turns = m.results.len(), "match completed");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> Engine<SecureShuffle<ChaCha20Rng>> {
        Engine::seeded(11, EngineConfig::default())
    }

    #[test]
    fn zero_stake_is_rejected() {
        assert_eq!(
            engine().create_match(0, GameMode::Classic, false).unwrap_err(),
            EngineError::InvalidStake
        );
    }

    #[test]
    fn choice_alternates_roles() {
        let mut e = engine();
        let mut m = e.create_match(10, GameMode::Wild, true).unwrap();
        let chooser = m.chooser().unwrap();
        e.make_choice(&mut m, chooser, false).unwrap();
        assert_eq!(m.turns().len(), 8);
        assert_eq!(m.turns()[0].acting_player, chooser.other());
        assert_eq!(m.turns()[1].acting_player, chooser);
        assert!(m.turns().iter().all(|s| s.acting_bank == s.acting_player.other()));
    }

    #[test]
    fn only_the_chooser_may_choose() {
        let mut e = engine();
        let mut m = e.create_match(10, GameMode::Classic, false).unwrap();
        let other = m.chooser().unwrap().other();
        let before = m.clone();
        assert!(matches!(
            e.make_choice(&mut m, other, true),
            Err(EngineError::NotYourTurn { .. })
        ));
        assert_eq!(m, before);
    }

    #[test]
    fn forfeit_awards_the_other_seat() {
        let mut e = engine();
        let mut m = e.create_match(10, GameMode::Classic, false).unwrap();
        e.forfeit(&mut m, Seat::Two).unwrap();
        assert_eq!(
            m.result(),
            Some(MatchResult {
                winner: Some(Seat::One),
                reason: EndReason::Forfeit
            })
        );
        assert_eq!(e.forfeit(&mut m, Seat::One), Err(EngineError::MatchOver));
    }

    #[test]
    fn oversized_turn_stake_is_rejected() {
        let config = EngineConfig {
            turn_stake: MAX_TURN_STAKE + 1,
            ..EngineConfig::default()
        };
        let mut e = Engine::seeded(11, config);
        assert_eq!(
            e.create_match(10, GameMode::Classic, false).unwrap_err(),
            EngineError::TurnStakeTooLarge {
                turn_stake: MAX_TURN_STAKE + 1,
                max: MAX_TURN_STAKE
            }
        );
    }

    #[test]
    fn only_the_acting_player_ends_the_turn_early() {
        let mut e = engine();
        let mut m = e.create_match(10, GameMode::Classic, false).unwrap();
        let chooser = m.chooser().unwrap();
        assert!(matches!(
            e.end_turn_early(&mut m, chooser),
            Err(EngineError::WrongPhase { .. })
        ));
        e.make_choice(&mut m, chooser, true).unwrap();
        assert_eq!(
            e.end_turn_early(&mut m, chooser.other()),
            Err(EngineError::NotYourTurn {
                expected: chooser,
                actor: chooser.other()
            })
        );
        e.end_turn_early(&mut m, chooser).unwrap();
        assert_eq!(m.current_turn_index(), 1);
        assert_eq!(m.results()[0].final_chips, 100);
        assert_eq!(m.turn().unwrap().acting_player, chooser.other());
        assert_eq!(m.phase(), Phase::WaitingBets);
    }
}
