//! # Play Command
//!
//! A blackjack duel against an AI opponent. The human holds Seat One and types
//! commands on stdin; the AI holds Seat Two. Rejected commands are reported and the
//! prompt repeats. `q` or end of input forfeits the match.

use std::io::{BufRead, Write};

use duel21_ai::{AIOpponent, Decision, submit};
use duel21_engine::engine::EngineConfig;
use duel21_engine::game::{GameMode, Match, Phase, Seat};
use duel21_engine::view::project_view;

use super::{CliEngine, build_engine, force_default, opponent};
use crate::error::CliError;
use crate::formatters::{format_card, render_view};
use crate::io_utils::read_stdin_line;
use crate::ui;
use crate::validation::{HELP, ParseResult, PlayCommand, parse_play_command};

const HUMAN: Seat = Seat::One;

#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub ai: String,
    pub mode: GameMode,
    pub seed: Option<u64>,
    pub stake: u32,
    pub extended: bool,
    pub engine: EngineConfig,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            ai: "baseline".into(),
            mode: GameMode::Classic,
            seed: None,
            stake: 100,
            extended: false,
            engine: EngineConfig::default(),
        }
    }
}

/// Runs one interactive match.
///
/// # Examples
///
/// ```ignore
/// use duel21_cli::commands::play::{handle_play_command, PlayOptions};
/// use std::io::{stdin, stdout, stderr};
///
/// let mut input = stdin().lock();
/// handle_play_command(&PlayOptions::default(), &mut stdout(), &mut stderr(), &mut input).unwrap();
/// ```
pub fn handle_play_command(
    opts: &PlayOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let seed = opts.seed.unwrap_or_else(rand::random);
    let Some(ai) = opponent(&opts.ai, seed) else {
        let msg = format!("unknown ai '{}'", opts.ai);
        ui::write_error(err, &msg)?;
        return Err(CliError::InvalidInput(msg));
    };

    writeln!(
        out,
        "play: vs={} mode={} stake={} seed={}",
        opts.ai, opts.mode, opts.stake, seed
    )?;
    writeln!(out, "{}", HELP)?;

    let mut engine = build_engine(seed, opts.engine);
    let mut m = engine.create_match(opts.stake, opts.mode, opts.extended)?;
    for pair in &m.opener().draws {
        writeln!(out, "Draw: you {} vs {}", format_card(&pair.one), format_card(&pair.two))?;
    }

    while !m.is_over() {
        if m.phase() == Phase::RoundResult {
            writeln!(out, "{}", render_view(&project_view(&m, HUMAN, false)))?;
            engine.next_round_or_end_turn(&mut m)?;
            continue;
        }
        match m.decider() {
            Some(HUMAN) => {
                if !human_step(&mut engine, &mut m, out, err, stdin)? {
                    engine.forfeit(&mut m, HUMAN)?;
                    writeln!(out, "You forfeited the match.")?;
                }
            }
            Some(seat) => ai_step(&mut engine, &mut m, seat, ai.as_ref(), out)?,
            None => {
                if force_default(&mut engine, &mut m)? == 0 {
                    return Err(CliError::Engine(format!("match stalled in {:?}", m.phase())));
                }
            }
        }
    }

    writeln!(out, "{}", render_view(&project_view(&m, HUMAN, false)))?;
    writeln!(out, "Match over.")?;
    Ok(())
}

fn ai_step(
    engine: &mut CliEngine,
    m: &mut Match,
    seat: Seat,
    ai: &dyn AIOpponent,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    match ai.decide(&project_view(m, seat, false)) {
        Some(decision) => {
            writeln!(out, "{}: {:?}", ai.name(), decision)?;
            submit(engine, m, seat, &decision)?;
        }
        None => {
            writeln!(out, "{} has no move; applying the default.", ai.name())?;
            if force_default(engine, m)? == 0 {
                return Err(CliError::Engine(format!("match stalled in {:?}", m.phase())));
            }
        }
    }
    Ok(())
}

fn prompt_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Choice => "first/second",
        Phase::WaitingBets => "bet/end",
        Phase::Insurance => "ins",
        Phase::PlayerTurn => "hit/stand/double/split",
        Phase::WildChoice | Phase::DealerWildChoice => "wild",
        Phase::DealerTurn => "dhit/dstand",
        _ => "",
    }
}

/// Reads commands until one is accepted. Returns `false` when the player quits or
/// input ends.
fn human_step(
    engine: &mut CliEngine,
    m: &mut Match,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<bool, CliError> {
    writeln!(out, "{}", render_view(&project_view(m, HUMAN, false)))?;
    loop {
        ui::prompt(out, prompt_label(m.phase()))?;
        let Some(line) = read_stdin_line(stdin) else {
            return Ok(false);
        };
        let command = match parse_play_command(&line) {
            ParseResult::Command(c) => c,
            ParseResult::Quit => return Ok(false),
            ParseResult::Invalid(msg) => {
                ui::write_error(err, &msg)?;
                continue;
            }
        };
        let decision = match command {
            PlayCommand::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            PlayCommand::Next => {
                ui::write_error(err, "Nothing to continue; a decision is pending")?;
                continue;
            }
            PlayCommand::Choose { play_first } => Decision::Choice(play_first),
            PlayCommand::Bets(bets) => Decision::Bets(bets),
            PlayCommand::Insurance(flags) => Decision::Insurance(flags),
            PlayCommand::Play(action) => Decision::Play(action),
            PlayCommand::Wilds(values) if m.phase() == Phase::DealerWildChoice => {
                Decision::DealerWilds(values)
            }
            PlayCommand::Wilds(values) => Decision::Wilds(values),
            PlayCommand::Dealer(action) => Decision::Dealer(action),
            PlayCommand::EndTurn => Decision::EndTurn,
        };
        let chips = m.turn().map(|t| t.chips());
        match submit(engine, m, HUMAN, &decision) {
            Ok(()) => {
                if let (Decision::EndTurn, Some(chips)) = (&decision, chips) {
                    writeln!(out, "You ended your turn with {} chips.", chips)?;
                }
                return Ok(true);
            }
            Err(e) if e.is_internal() => return Err(e.into()),
            Err(e) => ui::write_error(err, &format!("Invalid action: {}", e))?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn play(input: &str, mode: GameMode) -> (Result<(), CliError>, String, String) {
        let opts = PlayOptions {
            mode,
            seed: Some(42),
            ..PlayOptions::default()
        };
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut stdin = Cursor::new(input.as_bytes().to_vec());
        let result = handle_play_command(&opts, &mut out, &mut err, &mut stdin);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_quit_forfeits() {
        let (result, out, _) = play("quit\n", GameMode::Classic);
        assert!(result.is_ok());
        assert!(out.contains("Match over."));
    }

    #[test]
    fn test_invalid_input_reprompts() {
        let (result, _, err) = play("fold\nq\n", GameMode::Classic);
        assert!(result.is_ok());
        assert!(err.contains("Unrecognized command 'fold'"));
    }

    #[test]
    fn test_scripted_session_always_ends() {
        let script = "first\nbet 5\nins n\nstand\nwild 7\ndstand\n".repeat(400);
        for mode in [GameMode::Classic, GameMode::InteractiveWild] {
            let (result, out, _) = play(&script, mode);
            assert!(result.is_ok());
            assert!(out.contains("Match over."));
        }
    }

    #[test]
    fn test_end_keeps_the_stack() {
        let script = format!("{}q\n", "first\nend\n".repeat(10));
        let (result, out, err) = play(&script, GameMode::Classic);
        assert!(result.is_ok());
        assert!(out.contains("You ended your turn with 100 chips."), "{}", err);
        assert!(out.contains("Match over."));
    }

    #[test]
    fn test_unknown_ai_is_rejected() {
        let opts = PlayOptions {
            ai: "oracle".into(),
            ..PlayOptions::default()
        };
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let mut stdin = Cursor::new(Vec::new());
        assert!(handle_play_command(&opts, &mut out, &mut err, &mut stdin).is_err());
    }
}
