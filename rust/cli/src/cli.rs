//! Command-line argument definitions.
//!
//! Options left unset fall back to the resolved configuration (file, then env, then
//! defaults); see `duel21 cfg`.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "duel21", version, about = "Head-to-head blackjack duel CLI")]
pub struct Duel21Cli {
    /// Debug-level diagnostics on stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a match against an AI opponent on stdin
    Play {
        /// Opponent: baseline, cautious or random
        #[arg(long)]
        ai: Option<String>,
        /// classic, wild, interactive or interactive-wild
        #[arg(long)]
        mode: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        /// Match stake per seat
        #[arg(long)]
        stake: Option<u32>,
        /// Eight turns instead of four
        #[arg(long)]
        extended: bool,
    },
    /// Simulate AI-vs-AI matches and optionally record their history
    Sim {
        #[arg(long, default_value_t = 1)]
        matches: u64,
        /// Base seed; match i uses seed + i
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        mode: Option<String>,
        /// Opponent in seat One
        #[arg(long)]
        ai_a: Option<String>,
        /// Opponent in seat Two
        #[arg(long)]
        ai_b: Option<String>,
        /// JSONL history file; `.zst` compresses it
        #[arg(long)]
        output: Option<String>,
        #[arg(long)]
        extended: bool,
    },
    /// Aggregate a match history file
    Stats {
        #[arg(long)]
        input: String,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}
