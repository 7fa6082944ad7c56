//! # duel21 CLI Library
//!
//! Command-line front end for the duel21 blackjack duel engine: play a match against
//! an AI, simulate AI-vs-AI matches into JSONL history, and aggregate that history.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["duel21", "sim", "--matches", "10", "--seed", "42"];
//! let code = duel21_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play a match against an AI opponent on stdin
//! - `sim`: Simulate matches and optionally record their history
//! - `stats`: Aggregate statistics from JSONL match history
//! - `cfg`: Display the resolved configuration

use clap::Parser;
use std::io::Write;

pub mod cli;
pub mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod logging;
#[macro_use]
mod macros;
pub mod ui;
pub mod validation;

use cli::{Commands, Duel21Cli};
use commands::play::PlayOptions;
use commands::sim::SimOptions;
use commands::{handle_cfg_command, handle_play_command, handle_sim_command, handle_stats_command};
use duel21_engine::game::GameMode;

pub use config::{Config, ConfigError};
pub use error::{BatchValidationError, CliError};

const COMMANDS: &[&str] = &["play", "sim", "stats", "cfg"];

/// Parses `args` and runs the subcommand.
///
/// Returns the process exit code: [`exit_code::SUCCESS`] or [`exit_code::ERROR`].
///
/// # Example
///
/// ```
/// use std::io;
/// let args = vec!["duel21", "sim", "--matches", "1", "--seed", "42"];
/// let code = duel21_cli::run(args, &mut io::stdout(), &mut io::stderr());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match Duel21Cli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version go to stdout and succeed
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    write_or_exit!(err, "{}", e);
                    write_or_exit!(err, "duel21 blackjack duel CLI");
                    write_or_exit!(err, "Usage: duel21 <command> [options]\n");
                    write_or_exit!(err, "Commands:");
                    for c in COMMANDS {
                        write_or_exit!(err, "  {}", c);
                    }
                    write_or_exit!(err, "\nFor full help, run: duel21 --help");
                    exit_code::ERROR
                }
            };
        }
    };

    logging::init_logging(cli.verbose);

    if let Commands::Cfg = cli.cmd {
        return finish(handle_cfg_command(out, err), err);
    }

    let cfg = match config::load() {
        Ok(c) => c,
        Err(ConfigError::Invalid(msg)) => {
            let _ = ui::write_error(err, &msg);
            return exit_code::ERROR;
        }
        Err(e) => {
            let _ = ui::write_error(err, &format!("Invalid configuration: {}", e));
            return exit_code::ERROR;
        }
    };

    let result = match cli.cmd {
        Commands::Play {
            ai,
            mode,
            seed,
            stake,
            extended,
        } => {
            let mode = match resolve_mode(mode, &cfg, err) {
                Ok(m) => m,
                Err(code) => return code,
            };
            let opts = PlayOptions {
                ai: ai.unwrap_or_else(|| cfg.ai.clone()),
                mode,
                seed: seed.or(cfg.seed),
                stake: stake.unwrap_or(cfg.stake),
                extended: extended || cfg.extended,
                engine: cfg.engine_config(),
            };
            // Use stdin for real input (supports both TTY and piped stdin)
            let stdin = std::io::stdin();
            let mut stdin_lock = stdin.lock();
            handle_play_command(&opts, out, err, &mut stdin_lock)
        }
        Commands::Sim {
            matches,
            seed,
            mode,
            ai_a,
            ai_b,
            output,
            extended,
        } => {
            let mode = match resolve_mode(mode, &cfg, err) {
                Ok(m) => m,
                Err(code) => return code,
            };
            let opts = SimOptions {
                matches,
                seed: seed.or(cfg.seed),
                mode,
                extended: extended || cfg.extended,
                ai_a: ai_a.unwrap_or_else(|| cfg.ai.clone()),
                ai_b: ai_b.unwrap_or_else(|| cfg.ai.clone()),
                output,
                stake: cfg.stake,
                engine: cfg.engine_config(),
                rake: cfg.rake_schedule(),
            };
            handle_sim_command(&opts, out, err)
        }
        Commands::Stats { input } => handle_stats_command(input, &cfg.rake_schedule(), out, err),
        Commands::Cfg => handle_cfg_command(out, err),
    };
    finish(result, err)
}

fn resolve_mode(arg: Option<String>, cfg: &Config, err: &mut dyn Write) -> Result<GameMode, i32> {
    match arg {
        None => Ok(cfg.mode),
        Some(s) => s.parse().map_err(|e: String| {
            let _ = ui::write_error(err, &e);
            exit_code::ERROR
        }),
    }
}

fn finish(result: Result<(), CliError>, err: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            write_or_exit!(err, "Error: {}", e);
            exit_code::ERROR
        }
    }
}
