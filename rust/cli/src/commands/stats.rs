//! Statistics aggregation over match history files.
//!
//! Accepts a single `.jsonl` / `.jsonl.zst` file or a directory searched recursively
//! for them. Every round is checked for chip conservation.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use duel21_engine::game::{EndReason, Seat};
use duel21_engine::logger::HistoryEvent;
use duel21_engine::settlement::{RakeSchedule, compute_payout};

use crate::error::{BatchValidationError, CliError};
use crate::io_utils::read_text_auto;
use crate::parse_json_or_continue;
use crate::ui;

#[derive(Default)]
struct StatsState {
    matches: u64,
    rounds: u64,
    seat_one: u64,
    seat_two: u64,
    draws: u64,
    forfeits: u64,
    rake: u64,
    skipped: u64,
    corrupted: u64,
    duplicates: u64,
    violations: Vec<BatchValidationError<String>>,
}

/// Aggregates match history. Fails on unreadable input, a file holding only broken
/// records, or any round that breaks chip conservation.
pub fn handle_stats_command(
    input: String,
    rake: &RakeSchedule,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = Path::new(&input);
    let mut state = StatsState::default();

    if path.is_dir() {
        let mut stack = vec![path.to_path_buf()];
        while let Some(d) = stack.pop() {
            let rd = match std::fs::read_dir(&d) {
                Ok(v) => v,
                Err(_) => continue,
            };
            for e in rd.filter_map(Result::ok) {
                let p = e.path();
                if p.is_dir() {
                    stack.push(p);
                } else if let Some(fname) = p.file_name().and_then(|f| f.to_str())
                    && (fname.ends_with(".jsonl") || fname.ends_with(".jsonl.zst"))
                {
                    match read_text_auto(&p.to_string_lossy()) {
                        Ok(content) => consume(&content, rake, &mut state, err)?,
                        Err(_) => state.corrupted += 1,
                    }
                }
            }
        }
    } else {
        match read_text_auto(&input) {
            Ok(s) => consume(&s, rake, &mut state, err)?,
            Err(e) => {
                ui::write_error(err, &format!("Failed to read {}: {}", input, e))?;
                return Err(CliError::Config(format!("Failed to read {}: {}", input, e)));
            }
        }
    }

    if state.corrupted > 0 {
        ui::write_error(err, &format!("Skipped {} corrupted record(s)", state.corrupted))?;
    }
    if state.skipped > 0 {
        ui::write_error(
            err,
            &format!("Discarded {} incomplete final line(s)", state.skipped),
        )?;
    }
    if state.duplicates > 0 {
        ui::display_warning(
            err,
            &format!("{} duplicate match_id(s) within a file counted once", state.duplicates),
        )?;
    }
    let empty = state.matches == 0 && state.rounds == 0;
    if !path.is_dir() && empty && (state.corrupted > 0 || state.skipped > 0) {
        ui::write_error(err, "Invalid record")?;
        return Err(CliError::InvalidInput("Invalid record".to_string()));
    }

    let summary = serde_json::json!({
        "matches": state.matches,
        "rounds": state.rounds,
        "winners": {
            "seat_one": state.seat_one,
            "seat_two": state.seat_two,
            "draws": state.draws,
        },
        "forfeits": state.forfeits,
        "rake": state.rake,
    });
    let json_output = serde_json::to_string_pretty(&summary)
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize stats: {}", e)))?;
    writeln!(out, "{}", json_output)?;

    if state.violations.is_empty() {
        return Ok(());
    }
    for v in &state.violations {
        ui::write_error(err, &v.to_string())?;
    }
    Err(CliError::InvalidInput(format!(
        "Statistics validation failed: {} round(s) break chip conservation",
        state.violations.len()
    )))
}

fn consume(
    content: &str,
    rake: &RakeSchedule,
    state: &mut StatsState,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let mut seen = HashSet::new();
    let has_trailing_nl = content.ends_with('\n');
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    for (i, line) in lines.iter().enumerate() {
        let last = i + 1 == lines.len();
        if last && !has_trailing_nl && serde_json::from_str::<serde_json::Value>(line).is_err() {
            state.skipped += 1;
            continue;
        }
        let event: HistoryEvent =
            parse_json_or_continue!(line, err, format!("record {}", i + 1), state.corrupted);
        match event {
            HistoryEvent::Round(r) => {
                state.rounds += 1;
                if !r.conserves_chips() {
                    state.violations.push(BatchValidationError {
                        item_context: format!("{} turn {} round {}", r.match_id, r.turn_index + 1, r.round),
                        message: format!(
                            "chip conservation violated ({} - {} + {} != {})",
                            r.chips_before, r.escrowed, r.paid_out, r.chips_after
                        ),
                    });
                }
            }
            HistoryEvent::Match(rec) => {
                if !seen.insert(rec.match_id.clone()) {
                    state.duplicates += 1;
                    continue;
                }
                state.matches += 1;
                match rec.settlement.winner {
                    Some(Seat::One) => state.seat_one += 1,
                    Some(Seat::Two) => state.seat_two += 1,
                    None => state.draws += 1,
                }
                if rec.settlement.reason == EndReason::Forfeit {
                    state.forfeits += 1;
                }
                state.rake += compute_payout(&rec.settlement, rake).rake;
            }
        }
    }
    Ok(())
}
