use thiserror::Error;

use crate::game::{Phase, Seat};

/// Failure of a single transition attempt.
///
/// Validation variants describe an action the current state does not allow; the
/// aggregate is left exactly as it was. Internal variants indicate a broken invariant
/// (see [`EngineError::is_internal`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Cannot {action} during {phase:?}")]
    WrongPhase { action: &'static str, phase: Phase },
    #[error("It's not seat {actor:?}'s decision (expected seat {expected:?})")]
    NotYourTurn { expected: Seat, actor: Seat },
    #[error("Must place 1-{max} bets, got {count}")]
    InvalidBetCount { count: usize, max: usize },
    #[error("Invalid bet amount: {amount}, minimum: {minimum}")]
    InvalidBetAmount { amount: u32, minimum: u32 },
    #[error("Insufficient chips: {required} required, {available} available")]
    InsufficientChips { required: u32, available: u32 },
    #[error("Hand is not active")]
    HandNotActive,
    #[error("Cannot split: {0}")]
    CannotSplit(&'static str),
    #[error("Cannot double: {0}")]
    CannotDouble(&'static str),
    #[error("Expected {expected} insurance decisions, got {actual}")]
    InsuranceDecisionCount { expected: usize, actual: usize },
    #[error("Expected {expected} wild card values, got {actual}")]
    WildValueCount { expected: usize, actual: usize },
    #[error("Invalid wild card value: {0} (must be 1-13)")]
    InvalidWildValue(u8),
    #[error("Stake must be positive")]
    InvalidStake,
    #[error("Match is already over")]
    MatchOver,
    #[error("Turn stake {turn_stake} exceeds the maximum of {max}")]
    TurnStakeTooLarge { turn_stake: u32, max: u32 },

    #[error("Deck exhausted at position {position}")]
    DeckExhausted { position: usize },
    #[error("No turn in progress")]
    MissingTurn,
    #[error("No round in progress")]
    MissingRound,
    #[error("Opening draw has no winner")]
    MissingChooser,
    #[error("Opening draw still tied after {attempts} attempts")]
    OpenerStalemate { attempts: usize },
    #[error("Chip total overflowed")]
    ChipOverflow,
    #[error("Decision clock still expired after {iterations} default actions")]
    ClockNotCleared { iterations: usize },
}

impl EngineError {
    /// Whether the error signals a defect rather than a rejected action.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            EngineError::DeckExhausted { .. }
                | EngineError::MissingTurn
                | EngineError::MissingRound
                | EngineError::MissingChooser
                | EngineError::OpenerStalemate { .. }
                | EngineError::ClockNotCleared { .. }
                | EngineError::ChipOverflow
        )
    }
}
