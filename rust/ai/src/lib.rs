//! # duel21-ai: automated opponents for duel21 matches
//!
//! Opponents read the same role-scoped [`MatchView`] a human client gets and answer
//! with a [`Decision`]; [`submit`] routes the decision to the matching engine
//! operation.
//!
//! ## Core Components
//!
//! - [`AIOpponent`] - Trait defining the interface for AI decision-making
//! - [`baseline`] - Rule-based opponents (basic strategy and a cautious variant)
//! - [`random`] - Uniformly random legal moves, for exercising the engine
//! - [`create_ai`] - Factory function for creating AI opponents
//!
//! ## Quick Start
//!
//! ```rust
//! use duel21_ai::{create_ai, play_once};
//! use duel21_engine::engine::{Engine, EngineConfig};
//! use duel21_engine::game::{GameMode, Phase};
//!
//! let ai = create_ai("baseline").expect("known opponent");
//! let mut engine = Engine::seeded(42, EngineConfig::default());
//! let mut m = engine.create_match(100, GameMode::Classic, false).unwrap();
//!
//! let chooser = m.chooser().unwrap();
//! assert!(play_once(&mut engine, &mut m, chooser, ai.as_ref()).unwrap());
//! assert_eq!(m.phase(), Phase::WaitingBets);
//! ```
//!
//! ## AI Types
//!
//! - `"baseline"` - basic strategy player, dealer hits below 17
//! - `"cautious"` - never risks a bust, takes insurance
//! - `"random"` - random legal moves (seedable)

use duel21_engine::clock::TimeSource;
use duel21_engine::deck::Shuffler;
use duel21_engine::engine::Engine;
use duel21_engine::errors::EngineError;
use duel21_engine::game::{Match, Seat};
use duel21_engine::rules::{DealerAction, PlayerAction};
use duel21_engine::view::{HandView, MatchView, RoundView, project_view};

pub mod baseline;
pub mod random;

/// An answer to the decision the viewer currently owes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Draw winner: play the first turn as player (`true`) or as bank
    Choice(bool),
    Bets(Vec<u32>),
    Insurance(Vec<bool>),
    Play(PlayerAction),
    /// Values `1..=13` for the current hand's pending wild cards
    Wilds(Vec<u8>),
    Dealer(DealerAction),
    DealerWilds(Vec<u8>),
    /// Acting player stops the turn between rounds
    EndTurn,
}

/// Trait defining the interface for AI opponents.
///
/// # Example Implementation
///
/// ```rust
/// use duel21_ai::{AIOpponent, Decision};
/// use duel21_engine::game::Phase;
/// use duel21_engine::rules::PlayerAction;
/// use duel21_engine::view::MatchView;
///
/// struct AlwaysStand;
///
/// impl AIOpponent for AlwaysStand {
///     fn decide(&self, view: &MatchView) -> Option<Decision> {
///         (view.is_my_turn && view.phase == Phase::PlayerTurn)
///             .then_some(Decision::Play(PlayerAction::Stand))
///     }
///
///     fn name(&self) -> &str {
///         "AlwaysStand"
///     }
/// }
/// ```
pub trait AIOpponent: Send + Sync {
    /// The decision for `view`, or `None` when the viewer owes nothing (or has no
    /// legal move, in which case the clock default applies).
    fn decide(&self, view: &MatchView) -> Option<Decision>;

    fn name(&self) -> &str;
}

/// Factory function to create AI opponents by type string.
///
/// ```rust
/// use duel21_ai::create_ai;
///
/// assert_eq!(create_ai("baseline").unwrap().name(), "BaselineAI");
/// assert!(create_ai("oracle").is_none());
/// ```
pub fn create_ai(ai_type: &str) -> Option<Box<dyn AIOpponent>> {
    match ai_type {
        "baseline" => Some(Box::new(baseline::BaselineAI::new())),
        "cautious" => Some(Box::new(baseline::CautiousAI::new())),
        "random" => Some(Box::new(random::RandomAI::from_entropy())),
        _ => None,
    }
}

/// Names accepted by [`create_ai`].
pub const AI_TYPES: [&str; 3] = ["baseline", "cautious", "random"];

/// Sends `decision` to the engine on behalf of `seat`.
pub fn submit<S: Shuffler, T: TimeSource>(
    engine: &mut Engine<S, T>,
    m: &mut Match,
    seat: Seat,
    decision: &Decision,
) -> Result<(), EngineError> {
    match decision {
        Decision::Choice(first) => engine.make_choice(m, seat, *first),
        Decision::Bets(bets) => engine.place_bets(m, seat, bets),
        Decision::Insurance(take) => engine.handle_insurance(m, seat, take),
        Decision::Play(action) => engine.player_action(m, seat, *action),
        Decision::Wilds(values) => engine.assign_wild_values(m, seat, values),
        Decision::Dealer(action) => engine.dealer_action(m, seat, *action),
        Decision::DealerWilds(values) => engine.assign_dealer_wild_values(m, seat, values),
        Decision::EndTurn => engine.end_turn_early(m, seat),
    }
}

/// Lets `ai` take one decision for `seat`. Returns whether it acted.
pub fn play_once<S: Shuffler, T: TimeSource>(
    engine: &mut Engine<S, T>,
    m: &mut Match,
    seat: Seat,
    ai: &dyn AIOpponent,
) -> Result<bool, EngineError> {
    let view = project_view(m, seat, false);
    match ai.decide(&view) {
        Some(decision) => submit(engine, m, seat, &decision).map(|_| true),
        None => Ok(false),
    }
}

/// Round and hand under the cursor, if the viewer is deciding it.
pub(crate) fn current_hand(view: &MatchView) -> Option<(&RoundView, &HandView)> {
    let round = view.turn.as_ref()?.round.as_ref()?;
    let hand = round
        .boxes
        .get(round.cursor.box_index)?
        .get(round.cursor.hand_index)?;
    Some((round, hand))
}
