//! Simulation command: AI-vs-AI matches, optionally recorded as JSONL history.
//!
//! Match `i` is shuffled from `seed + i`, so a run with a fixed seed replays exactly.
//! Each resolved round is written as a `round` event and each finished match as a
//! `match` event carrying its settlement.
//!
//! # Examples
//!
//! ```no_run
//! use duel21_cli::commands::sim::{handle_sim_command, SimOptions};
//! use std::io;
//!
//! let opts = SimOptions {
//!     matches: 10,
//!     seed: Some(42),
//!     output: Some("data/duels.jsonl.zst".into()),
//!     ..SimOptions::default()
//! };
//! handle_sim_command(&opts, &mut io::stdout(), &mut io::stderr()).unwrap();
//! ```

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use duel21_ai::{AIOpponent, play_once};
use duel21_engine::engine::EngineConfig;
use duel21_engine::game::{EndReason, GameMode, Match, Phase, Seat};
use duel21_engine::logger::{HistoryEvent, MatchLogger, MatchRecord, RoundRecord};
use duel21_engine::settlement::{RakeSchedule, compute_payout};
use tracing::debug;

use super::{CliEngine, build_engine, force_default, opponent};
use crate::error::CliError;
use crate::io_utils::create_output;
use crate::ui;
use crate::validation::validate_matches;

/// Upper bound on engine calls per match before it is declared stuck.
const MAX_STEPS: usize = 100_000;

#[derive(Debug, Clone)]
pub struct SimOptions {
    pub matches: u64,
    /// Base seed; random when absent
    pub seed: Option<u64>,
    pub mode: GameMode,
    pub extended: bool,
    pub ai_a: String,
    pub ai_b: String,
    pub output: Option<String>,
    pub stake: u32,
    pub engine: EngineConfig,
    pub rake: RakeSchedule,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            matches: 1,
            seed: None,
            mode: GameMode::Classic,
            extended: false,
            ai_a: "baseline".into(),
            ai_b: "baseline".into(),
            output: None,
            stake: 100,
            engine: EngineConfig::default(),
            rake: RakeSchedule::default(),
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    matches: u64,
    rounds: u64,
    seat_one: u64,
    seat_two: u64,
    draws: u64,
    forfeits: u64,
    rake: u64,
}

pub fn handle_sim_command(
    opts: &SimOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if let Err(e) = validate_matches(opts.matches) {
        ui::write_error(err, &e)?;
        return Err(CliError::InvalidInput(e));
    }
    let base_seed = opts.seed.unwrap_or_else(rand::random);
    let one = resolve_opponent(&opts.ai_a, base_seed, err)?;
    let two = resolve_opponent(&opts.ai_b, base_seed.rotate_left(32), err)?;

    let date = Utc::now().format("%Y%m%d").to_string();
    let mut logger = match &opts.output {
        Some(path) => match create_output(Path::new(path)) {
            Ok(w) => MatchLogger::with_writer(w, &date),
            Err(e) => {
                ui::write_error(err, &e)?;
                return Err(CliError::Io(std::io::Error::other(e)));
            }
        },
        None => MatchLogger::detached(&date),
    };

    let mut tally = Tally::default();
    for i in 0..opts.matches {
        let seed = base_seed.wrapping_add(i);
        let mut engine = build_engine(seed, opts.engine);
        let mut m = engine.create_match(opts.stake, opts.mode, opts.extended)?;
        let id = logger.next_id();
        tally.rounds += run_match(&mut engine, &mut m, one.as_ref(), two.as_ref(), &id, &mut logger)?;

        let settlement = m
            .settlement()
            .ok_or_else(|| CliError::Engine(format!("match {} ended without a settlement", id)))?;
        let payout = compute_payout(&settlement, &opts.rake);
        tally.matches += 1;
        tally.rake += payout.rake;
        match settlement.winner {
            Some(Seat::One) => tally.seat_one += 1,
            Some(Seat::Two) => tally.seat_two += 1,
            None => tally.draws += 1,
        }
        if settlement.reason == EndReason::Forfeit {
            tally.forfeits += 1;
        }
        debug!(match_id = %id, seed, winner = ?settlement.winner, "match simulated");

        logger.write(&HistoryEvent::Match(MatchRecord {
            match_id: id,
            mode: opts.mode,
            extended: opts.extended,
            seed: Some(seed),
            settlement,
            ts: None,
            meta: Some(serde_json::json!({ "ai_a": opts.ai_a, "ai_b": opts.ai_b })),
        }))?;
    }

    writeln!(out, "Simulated: {} matches, {} rounds", tally.matches, tally.rounds)?;
    writeln!(out, "Seat One ({}): {} wins", opts.ai_a, tally.seat_one)?;
    writeln!(out, "Seat Two ({}): {} wins", opts.ai_b, tally.seat_two)?;
    writeln!(out, "Draws: {}", tally.draws)?;
    if tally.forfeits > 0 {
        writeln!(out, "Forfeits: {}", tally.forfeits)?;
    }
    writeln!(out, "Rake: {}", tally.rake)?;
    Ok(())
}

fn resolve_opponent(
    name: &str,
    seed: u64,
    err: &mut dyn Write,
) -> Result<Box<dyn AIOpponent>, CliError> {
    match opponent(name, seed) {
        Some(ai) => Ok(ai),
        None => {
            let msg = format!(
                "unknown ai '{}' (expected one of {})",
                name,
                duel21_ai::AI_TYPES.join(", ")
            );
            ui::write_error(err, &msg)?;
            Err(CliError::InvalidInput(msg))
        }
    }
}

/// Plays `m` to the end, logging each resolved round. Returns the rounds played.
fn run_match(
    engine: &mut CliEngine,
    m: &mut Match,
    one: &dyn AIOpponent,
    two: &dyn AIOpponent,
    match_id: &str,
    logger: &mut MatchLogger,
) -> Result<u64, CliError> {
    let mut rounds = 0;
    for _ in 0..MAX_STEPS {
        if m.is_over() {
            return Ok(rounds);
        }
        if m.phase() == Phase::RoundResult {
            if let Some(record) = RoundRecord::capture(m, match_id) {
                logger.write(&HistoryEvent::Round(record))?;
                rounds += 1;
            }
            engine.next_round_or_end_turn(m)?;
            continue;
        }
        let acted = match m.decider() {
            Some(Seat::One) => play_once(engine, m, Seat::One, one)?,
            Some(Seat::Two) => play_once(engine, m, Seat::Two, two)?,
            None => false,
        };
        if !acted && force_default(engine, m)? == 0 {
            return Err(CliError::Engine(format!(
                "match {} stalled in {:?}",
                match_id,
                m.phase()
            )));
        }
    }
    Err(CliError::Engine(format!("match {} did not finish", match_id)))
}
