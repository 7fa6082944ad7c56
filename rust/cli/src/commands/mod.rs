//! Command handler modules for the duel21 CLI.
//!
//! Each command lives in its own module with a public
//! `handle_COMMAND_command(...) -> Result<(), CliError>` entry point. Output streams
//! are passed in as `&mut dyn Write` so handlers can be tested against buffers.
//!
//! Matches run on a [`ManualClock`]: nothing here waits on wall time. When a seat has
//! no move to make, [`force_default`] moves the clock past the pending deadline and lets
//! the engine apply the phase's default action.

pub mod cfg;
pub mod play;
pub mod sim;
pub mod stats;

pub use cfg::handle_cfg_command;
pub use play::handle_play_command;
pub use sim::handle_sim_command;
pub use stats::handle_stats_command;

use chrono::{Duration, Utc};
use duel21_ai::random::RandomAI;
use duel21_ai::{AIOpponent, create_ai};
use duel21_engine::clock::ManualClock;
use duel21_engine::deck::SecureShuffle;
use duel21_engine::engine::{Engine, EngineConfig};
use duel21_engine::errors::EngineError;
use duel21_engine::game::Match;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

pub type CliEngine = Engine<SecureShuffle<ChaCha20Rng>, ManualClock>;

/// Most defaults applied by one [`force_default`] call.
const DRAIN_CAP: usize = 16;

pub fn build_engine(seed: u64, config: EngineConfig) -> CliEngine {
    Engine::new(
        SecureShuffle::new(ChaCha20Rng::seed_from_u64(seed)),
        ManualClock::new(Utc::now()),
        config,
    )
}

/// Opponent by name. The random opponent is seeded so seeded runs replay exactly.
pub fn opponent(name: &str, seed: u64) -> Option<Box<dyn AIOpponent>> {
    if name == "random" {
        return Some(Box::new(RandomAI::seeded(seed)));
    }
    create_ai(name)
}

/// Expires the pending decision and applies its default. Returns how many defaults ran.
pub fn force_default(engine: &mut CliEngine, m: &mut Match) -> Result<usize, EngineError> {
    let Some(kind) = m.clock().kind() else {
        return Ok(0);
    };
    let wait = m.settings().clock.duration(kind) + Duration::seconds(1);
    engine.time().advance(wait);
    engine.drain_expired(m, DRAIN_CAP)
}
