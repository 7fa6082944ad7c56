use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::clock::{ClockPolicy, DecisionClock, DecisionKind};
use crate::deck::Deck;
use crate::errors::EngineError;
use crate::turn::Turn;

/// One of the two participants of a match.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    pub fn both() -> [Seat; 2] {
        [Seat::One, Seat::Two]
    }
}

/// Rule variant of a match.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Standard shoe, dealer draws to 17 automatically
    Classic,
    /// Four wild cards in the shoe, dealer draws automatically
    Wild,
    /// Standard shoe, the acting bank plays the dealer hand
    Interactive,
    /// Wild cards and an acting bank that plays the dealer hand
    InteractiveWild,
}

impl GameMode {
    pub fn uses_wild_cards(self) -> bool {
        matches!(self, GameMode::Wild | GameMode::InteractiveWild)
    }

    pub fn dealer_is_interactive(self) -> bool {
        matches!(self, GameMode::Interactive | GameMode::InteractiveWild)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Wild => "wild",
            GameMode::Interactive => "interactive",
            GameMode::InteractiveWild => "interactive-wild",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(GameMode::Classic),
            "wild" | "joker" => Ok(GameMode::Wild),
            "interactive" => Ok(GameMode::Interactive),
            "interactive-wild" | "interactive_wild" => Ok(GameMode::InteractiveWild),
            other => Err(format!("unknown game mode: {}", other)),
        }
    }
}

/// Every state a match can be in. Transitions match on this exhaustively.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    CardDraw,
    Choice,
    TurnStart,
    WaitingBets,
    Insurance,
    PlayerTurn,
    WildChoice,
    DealerTurn,
    DealerWildChoice,
    RoundResult,
    MatchOver,
}

impl Phase {
    /// Decision the clock waits for while in this phase.
    pub fn decision_kind(self) -> Option<DecisionKind> {
        match self {
            Phase::Choice => Some(DecisionKind::Choice),
            Phase::WaitingBets => Some(DecisionKind::Bets),
            Phase::Insurance => Some(DecisionKind::Insurance),
            Phase::PlayerTurn => Some(DecisionKind::PlayerAction),
            Phase::WildChoice => Some(DecisionKind::WildChoice),
            Phase::DealerTurn => Some(DecisionKind::DealerAction),
            Phase::DealerWildChoice => Some(DecisionKind::DealerWildChoice),
            Phase::RoundResult => Some(DecisionKind::RoundResult),
            Phase::CardDraw | Phase::TurnStart | Phase::MatchOver => None,
        }
    }
}

/// Role pairing of one turn.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct TurnSlot {
    pub acting_player: Seat,
    pub acting_bank: Seat,
}

/// Chips a seat finished a turn with.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub turn_index: usize,
    pub seat: Seat,
    pub starting_chips: u32,
    pub final_chips: u32,
}

impl TurnResult {
    pub fn delta(&self) -> i64 {
        i64::from(self.final_chips) - i64::from(self.starting_chips)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    Completed,
    Forfeit,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// `None` is a draw
    pub winner: Option<Seat>,
    pub reason: EndReason,
}

/// One exchange of the opening high-card draw.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct DrawPair {
    pub one: Card,
    pub two: Card,
}

/// Pre-match high-card draw deciding who chooses the seating.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Opener {
    pub(crate) draw_deck: Deck,
    pub draws: Vec<DrawPair>,
    pub winner: Option<Seat>,
}

/// Static parameters agreed when the match is created.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    pub stake: u32,
    pub mode: GameMode,
    pub extended: bool,
    pub turn_stake: u32,
    pub min_bet: u32,
    pub clock: ClockPolicy,
}

impl MatchSettings {
    /// 4 turns, or 8 for the extended variant.
    pub fn total_turns(&self) -> usize {
        if self.extended {
            8
        } else {
            4
        }
    }
}

/// The match aggregate. All mutation goes through [`crate::engine::Engine`]; callers
/// persist it however they like (it is plain serde data).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub(crate) phase: Phase,
    pub(crate) settings: MatchSettings,
    pub(crate) opener: Opener,
    pub(crate) chooser: Option<Seat>,
    pub(crate) turns: Vec<TurnSlot>,
    pub(crate) current_turn: usize,
    pub(crate) results: Vec<TurnResult>,
    pub(crate) turn: Option<Turn>,
    pub(crate) match_over: bool,
    pub(crate) result: Option<MatchResult>,
    pub(crate) clock: DecisionClock,
}

impl Match {
    pub(crate) fn new(settings: MatchSettings, draw_deck: Deck) -> Self {
        Self {
            phase: Phase::CardDraw,
            settings,
            opener: Opener {
                draw_deck,
                draws: Vec::new(),
                winner: None,
            },
            chooser: None,
            turns: Vec::new(),
            current_turn: 0,
            results: Vec::new(),
            turn: None,
            match_over: false,
            result: None,
            clock: DecisionClock::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }
    pub fn mode(&self) -> GameMode {
        self.settings.mode
    }
    pub fn stake(&self) -> u32 {
        self.settings.stake
    }
    pub fn opener(&self) -> &Opener {
        &self.opener
    }
    pub fn chooser(&self) -> Option<Seat> {
        self.chooser
    }
    pub fn turns(&self) -> &[TurnSlot] {
        &self.turns
    }
    pub fn total_turns(&self) -> usize {
        self.settings.total_turns()
    }
    pub fn current_turn_index(&self) -> usize {
        self.current_turn
    }
    pub fn results(&self) -> &[TurnResult] {
        &self.results
    }
    pub fn turn(&self) -> Option<&Turn> {
        self.turn.as_ref()
    }
    pub fn is_over(&self) -> bool {
        self.match_over
    }
    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }
    pub fn clock(&self) -> &DecisionClock {
        &self.clock
    }

    /// Role pairing of the turn being played, if any.
    pub fn current_slot(&self) -> Option<TurnSlot> {
        self.turns.get(self.current_turn).copied()
    }

    /// Most recent turn result recorded for `seat`.
    pub fn last_result(&self, seat: Seat) -> Option<&TurnResult> {
        self.results.iter().rev().find(|r| r.seat == seat)
    }

    /// Seat whose decision the current phase is waiting on.
    pub fn decider(&self) -> Option<Seat> {
        let slot = self.current_slot();
        match self.phase {
            Phase::Choice => self.chooser,
            Phase::WaitingBets | Phase::Insurance | Phase::PlayerTurn | Phase::WildChoice => {
                slot.map(|s| s.acting_player)
            }
            Phase::DealerTurn | Phase::DealerWildChoice => slot.map(|s| s.acting_bank),
            Phase::CardDraw | Phase::TurnStart | Phase::RoundResult | Phase::MatchOver => None,
        }
    }

    pub(crate) fn turn_mut(&mut self) -> Result<&mut Turn, EngineError> {
        self.turn.as_mut().ok_or(EngineError::MissingTurn)
    }

    pub(crate) fn active_turn(&self) -> Result<&Turn, EngineError> {
        self.turn.as_ref().ok_or(EngineError::MissingTurn)
    }

    /// Enters `phase`, restarting the decision clock for it (or clearing it when the
    /// phase waits on nobody).
    pub(crate) fn enter(&mut self, phase: Phase, now: chrono::DateTime<chrono::Utc>) {
        self.phase = phase;
        match phase.decision_kind() {
            Some(kind) => self.clock.start(kind, now),
            None => self.clock.clear(),
        }
        tracing::debug!(phase = ?phase, turn = self.current_turn, "phase entered");
    }

    pub(crate) fn expect_phase(&self, phase: Phase, action: &'static str) -> Result<(), EngineError> {
        if self.match_over {
            return Err(EngineError::MatchOver);
        }
        if self.phase != phase {
            return Err(EngineError::WrongPhase {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    pub(crate) fn expect_decider(&self, actor: Seat) -> Result<(), EngineError> {
        match self.decider() {
            Some(expected) if expected != actor => Err(EngineError::NotYourTurn { expected, actor }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_mode_parses_aliases() {
        assert_eq!("joker".parse::<GameMode>(), Ok(GameMode::Wild));
        assert_eq!("Interactive".parse::<GameMode>(), Ok(GameMode::Interactive));
        assert!("poker".parse::<GameMode>().is_err());
    }

    #[test]
    fn phases_serialize_in_screaming_case() {
        let s = serde_json::to_string(&Phase::DealerWildChoice).unwrap();
        assert_eq!(s, "\"DEALER_WILD_CHOICE\"");
    }

    #[test]
    fn informational_phases_have_no_decision() {
        assert_eq!(Phase::TurnStart.decision_kind(), None);
        assert_eq!(Phase::MatchOver.decision_kind(), None);
        assert_eq!(
            Phase::RoundResult.decision_kind(),
            Some(DecisionKind::RoundResult)
        );
    }
}
