//! # duel21-engine: Head-to-Head Blackjack Duel Core
//!
//! A phase-driven state machine for a single two-player blackjack duel. The two seats
//! take turns as the player (betting up to three boxes) and as the bank (holding the
//! dealer hand); after a fixed number of turns the seat with the better final stack
//! wins the match stake.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) including wild cards
//! - [`deck`] - Double-deck shoe, secure shuffling seam and cut card
//! - [`hand`] - Hand valuation, soft aces and wild-card provisional values
//! - [`rules`] - Bet, split, double and settlement rules
//! - [`opener`] - High-card draw deciding who picks the seating
//! - [`game`] - The [`game::Match`] aggregate, phases and seats
//! - [`turn`] / [`round`] - Per-turn chip stack and per-round boxes and hands
//! - [`engine`] - Match creation and the turn lifecycle
//! - [`betting`] - The round state machine: bets, insurance, actions, dealer play
//! - [`clock`] / [`timeout`] - Decision clock and idempotent default actions
//! - [`view`] - Role-scoped client snapshots that hide the hole card
//! - [`settlement`] - Settlement record and rake arithmetic
//! - [`logger`] - JSONL match history
//! - [`errors`] - Error types for transitions
//!
//! ## Quick Start
//!
//! ```rust
//! use duel21_engine::engine::{Engine, EngineConfig};
//! use duel21_engine::game::{GameMode, Phase};
//! use duel21_engine::rules::PlayerAction;
//!
//! let mut engine = Engine::seeded(42, EngineConfig::default());
//! let mut m = engine.create_match(100, GameMode::Classic, false).unwrap();
//!
//! let chooser = m.chooser().unwrap();
//! engine.make_choice(&mut m, chooser, true).unwrap();
//! engine.place_bets(&mut m, chooser, &[10]).unwrap();
//!
//! if m.phase() == Phase::PlayerTurn {
//!     engine.player_action(&mut m, chooser, PlayerAction::Stand).unwrap();
//! }
//! assert!(m.turn().unwrap().chips() <= 125);
//! ```
//!
//! ## Rejected Actions
//!
//! Every transition is all-or-nothing. A rejected action returns a typed error and
//! leaves the match exactly as it was:
//!
//! ```rust
//! use duel21_engine::engine::{Engine, EngineConfig};
//! use duel21_engine::errors::EngineError;
//! use duel21_engine::game::GameMode;
//!
//! let mut engine = Engine::seeded(1, EngineConfig::default());
//! let mut m = engine.create_match(100, GameMode::Wild, false).unwrap();
//! let chooser = m.chooser().unwrap();
//!
//! let before = m.clone();
//! let err = engine.place_bets(&mut m, chooser, &[10]).unwrap_err();
//! assert!(matches!(err, EngineError::WrongPhase { .. }));
//! assert_eq!(m, before);
//! ```

pub mod betting;
pub mod cards;
pub mod clock;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod opener;
pub mod round;
pub mod rules;
pub mod settlement;
pub mod timeout;
pub mod turn;
pub mod view;
