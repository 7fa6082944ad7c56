//! Input parsing and validation for the interactive `play` command.
//!
//! Parsing only checks the shape of a line. Whether a command is legal in the
//! current phase is the engine's call, and its errors are shown back to the player.

use duel21_engine::rules::{DealerAction, PlayerAction};

/// A parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayCommand {
    /// `first` / `second`: play first or bank first after winning the draw
    Choose { play_first: bool },
    Bets(Vec<u32>),
    Insurance(Vec<bool>),
    Play(PlayerAction),
    /// Values `1..=13` for the pending wild cards, in order
    Wilds(Vec<u8>),
    Dealer(DealerAction),
    /// Stop the turn and keep the current stack
    EndTurn,
    /// Continue past a round result
    Next,
    Help,
}

/// Result of parsing one line of input.
#[derive(Debug, PartialEq)]
pub enum ParseResult {
    Command(PlayCommand),
    /// User entered `q` or `quit`
    Quit,
    Invalid(String),
}

pub const HELP: &str = "Commands: first | second | bet <n> [n] [n] | ins <y/n>... | \
hit | stand | double | split | wild <1-13>... | dhit | dstand | end | next | q";

/// Parses a line of `play` input (case-insensitive).
///
/// # Example
///
/// ```rust
/// # use duel21_cli::validation::{parse_play_command, ParseResult, PlayCommand};
/// use duel21_engine::rules::PlayerAction;
///
/// assert_eq!(
///     parse_play_command("bet 10 25"),
///     ParseResult::Command(PlayCommand::Bets(vec![10, 25]))
/// );
/// assert_eq!(
///     parse_play_command("H"),
///     ParseResult::Command(PlayCommand::Play(PlayerAction::Hit))
/// );
/// assert_eq!(parse_play_command("quit"), ParseResult::Quit);
/// assert!(matches!(parse_play_command("fold"), ParseResult::Invalid(_)));
/// ```
pub fn parse_play_command(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    let parts: Vec<&str> = input.split_whitespace().collect();

    let Some((&head, args)) = parts.split_first() else {
        return ParseResult::Invalid("Empty input".to_string());
    };

    if head == "q" || head == "quit" {
        return ParseResult::Quit;
    }

    let command = match head {
        "first" | "play" => PlayCommand::Choose { play_first: true },
        "second" | "bank" => PlayCommand::Choose { play_first: false },
        "h" | "hit" => PlayCommand::Play(PlayerAction::Hit),
        "s" | "stand" => PlayCommand::Play(PlayerAction::Stand),
        "d" | "double" => PlayCommand::Play(PlayerAction::Double),
        "p" | "split" => PlayCommand::Play(PlayerAction::Split),
        "dhit" => PlayCommand::Dealer(DealerAction::Hit),
        "dstand" => PlayCommand::Dealer(DealerAction::Stand),
        "end" => PlayCommand::EndTurn,
        "n" | "next" => PlayCommand::Next,
        "help" | "?" => PlayCommand::Help,
        "bet" => match parse_amounts(args) {
            Ok(bets) => PlayCommand::Bets(bets),
            Err(msg) => return ParseResult::Invalid(msg),
        },
        "ins" | "insurance" => match parse_flags(args) {
            Ok(flags) => PlayCommand::Insurance(flags),
            Err(msg) => return ParseResult::Invalid(msg),
        },
        "wild" | "w" => match parse_wild_values(args) {
            Ok(values) => PlayCommand::Wilds(values),
            Err(msg) => return ParseResult::Invalid(msg),
        },
        other => {
            return ParseResult::Invalid(format!("Unrecognized command '{}'. {}", other, HELP));
        }
    };
    ParseResult::Command(command)
}

fn parse_amounts(args: &[&str]) -> Result<Vec<u32>, String> {
    if args.is_empty() {
        return Err("Bet requires at least one amount (e.g., 'bet 10 20')".to_string());
    }
    args.iter()
        .map(|a| {
            a.parse::<u32>()
                .map_err(|_| format!("Invalid bet amount '{}'", a))
        })
        .collect()
}

fn parse_flags(args: &[&str]) -> Result<Vec<bool>, String> {
    if args.is_empty() {
        return Err("Insurance requires one y/n per box (e.g., 'ins y n')".to_string());
    }
    args.iter()
        .map(|a| match *a {
            "y" | "yes" => Ok(true),
            "n" | "no" => Ok(false),
            other => Err(format!("Expected y or n, got '{}'", other)),
        })
        .collect()
}

fn parse_wild_values(args: &[&str]) -> Result<Vec<u8>, String> {
    if args.is_empty() {
        return Err("Wild requires a value per wild card (e.g., 'wild 7')".to_string());
    }
    args.iter()
        .map(|a| match *a {
            "a" | "ace" => Ok(1),
            "j" => Ok(11),
            "q" => Ok(12),
            "k" => Ok(13),
            n => match n.parse::<u8>() {
                Ok(v) if (1..=13).contains(&v) => Ok(v),
                _ => Err(format!("Wild values are 1-13, got '{}'", n)),
            },
        })
        .collect()
}

/// Validates the simulation match count.
pub fn validate_matches(matches: u64) -> Result<(), String> {
    if matches == 0 {
        return Err("matches must be >= 1".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions_short_and_long() {
        assert_eq!(
            parse_play_command("stand"),
            ParseResult::Command(PlayCommand::Play(PlayerAction::Stand))
        );
        assert_eq!(
            parse_play_command("P"),
            ParseResult::Command(PlayCommand::Play(PlayerAction::Split))
        );
        assert_eq!(
            parse_play_command("dhit"),
            ParseResult::Command(PlayCommand::Dealer(DealerAction::Hit))
        );
    }

    #[test]
    fn test_parse_end_turn() {
        assert_eq!(
            parse_play_command("END"),
            ParseResult::Command(PlayCommand::EndTurn)
        );
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(
            parse_play_command("second"),
            ParseResult::Command(PlayCommand::Choose { play_first: false })
        );
    }

    #[test]
    fn test_parse_insurance_flags() {
        assert_eq!(
            parse_play_command("ins y n yes"),
            ParseResult::Command(PlayCommand::Insurance(vec![true, false, true]))
        );
        assert!(matches!(parse_play_command("ins maybe"), ParseResult::Invalid(_)));
    }

    #[test]
    fn test_parse_wild_values() {
        assert_eq!(
            parse_play_command("wild 7 a k"),
            ParseResult::Command(PlayCommand::Wilds(vec![7, 1, 13]))
        );
        assert!(matches!(parse_play_command("wild 14"), ParseResult::Invalid(_)));
        assert!(matches!(parse_play_command("wild 0"), ParseResult::Invalid(_)));
    }

    #[test]
    fn test_parse_bet_requires_amounts() {
        match parse_play_command("bet") {
            ParseResult::Invalid(msg) => assert!(msg.contains("at least one")),
            other => panic!("expected Invalid, got {:?}", other),
        }
        assert!(matches!(parse_play_command("bet ten"), ParseResult::Invalid(_)));
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(
            parse_play_command("   "),
            ParseResult::Invalid("Empty input".to_string())
        );
    }

    #[test]
    fn test_validate_matches() {
        assert!(validate_matches(1).is_ok());
        assert!(validate_matches(0).is_err());
    }
}
