//! Card, hand and table formatters for terminal display.
//!
//! Unicode suit symbols are used where the terminal is known to render them, with
//! single-letter ASCII suits as the fallback.
//!
//! ## Example
//!
//! ```rust
//! use duel21_engine::cards::{Card, Rank, Suit};
//! use duel21_cli::formatters::format_card;
//!
//! let ace = Card::new(Suit::Spades, Rank::Ace);
//! assert!(format_card(&ace) == "A♠" || format_card(&ace) == "As");
//! ```

use duel21_engine::cards::{Card, Rank, Suit};
use duel21_engine::game::{Phase, Seat};
use duel21_engine::hand::{HandResult, HandStatus};
use duel21_engine::view::{CardView, HandView, MatchView, RoundView};

/// On Windows only modern terminals are trusted with Unicode suits.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_suit(suit: &Suit) -> &'static str {
    if supports_unicode() {
        match suit {
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
            Suit::Spades => "♠",
        }
    } else {
        match suit {
            Suit::Hearts => "h",
            Suit::Diamonds => "d",
            Suit::Clubs => "c",
            Suit::Spades => "s",
        }
    }
}

/// Single-character rank, `W` for a wild card.
pub fn format_rank(rank: &Rank) -> &'static str {
    match rank {
        Rank::Two => "2",
        Rank::Three => "3",
        Rank::Four => "4",
        Rank::Five => "5",
        Rank::Six => "6",
        Rank::Seven => "7",
        Rank::Eight => "8",
        Rank::Nine => "9",
        Rank::Ten => "T",
        Rank::Jack => "J",
        Rank::Queen => "Q",
        Rank::King => "K",
        Rank::Ace => "A",
        Rank::Wild => "W",
    }
}

/// A resolved wild card shows its chosen rank, e.g. `W♠=7`; an unresolved one `W♠=?`.
pub fn format_card(card: &Card) -> String {
    let base = format!("{}{}", format_rank(&card.rank), format_suit(&card.suit));
    if !card.is_wild() {
        return base;
    }
    match card.chosen {
        Some(rank) => format!("{}={}", base, format_rank(&rank)),
        None => format!("{}=?", base),
    }
}

pub fn format_cards(cards: &[Card]) -> String {
    let parts: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", parts.join(" "))
}

fn format_card_view(card: &CardView) -> String {
    match card {
        CardView::Shown(c) => format_card(c),
        CardView::Hidden => "??".to_string(),
    }
}

fn status_label(hand: &HandView) -> &'static str {
    if let Some(result) = hand.result {
        return match result {
            HandResult::Win => "win",
            HandResult::BlackjackWin => "blackjack win",
            HandResult::Lose => "lose",
            HandResult::Push => "push",
        };
    }
    match hand.status {
        HandStatus::Active => "",
        HandStatus::Stand => "stand",
        HandStatus::Bust => "bust",
        HandStatus::Blackjack => "blackjack",
        HandStatus::Push => "push",
        HandStatus::Lose => "lose",
    }
}

/// One line per hand: cards, value, bet and outcome.
pub fn format_hand(hand: &HandView) -> String {
    let mut line = format!(
        "{} = {} (bet {}{})",
        format_cards(&hand.cards),
        hand.value,
        hand.bet,
        if hand.is_doubled { ", doubled" } else { "" }
    );
    let label = status_label(hand);
    if !label.is_empty() {
        line.push_str(&format!(" {}", label));
    }
    if hand.is_current {
        line.push_str(" <");
    }
    line
}

fn seat_label(seat: Seat) -> &'static str {
    match seat {
        Seat::One => "Seat One",
        Seat::Two => "Seat Two",
    }
}

fn format_round(round: &RoundView, lines: &mut Vec<String>) {
    let dealer: Vec<String> = round.dealer_cards.iter().map(format_card_view).collect();
    lines.push(format!(
        "  Dealer: [{}] = {}{}",
        dealer.join(" "),
        round.dealer_value,
        if round.hole_card_visible { "" } else { " showing" }
    ));
    for (b, hands) in round.boxes.iter().enumerate() {
        for (h, hand) in hands.iter().enumerate() {
            let tag = if hands.len() > 1 {
                format!("Box {}.{}", b + 1, h + 1)
            } else {
                format!("Box {}", b + 1)
            };
            lines.push(format!("  {}: {}", tag, format_hand(hand)));
        }
    }
    for (i, offer) in round.insurance.iter().enumerate().filter(|(_, o)| o.taken) {
        lines.push(format!("  Insurance on box {}: {}", i + 1, offer.amount));
    }
}

/// Multi-line table rendering of a match as seen by its viewer.
pub fn render_view(view: &MatchView) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "== {} | stake {} | turn {}/{} | {:?} ==",
        view.mode,
        view.stake,
        (view.current_turn + 1).min(view.total_turns),
        view.total_turns,
        view.phase
    ));
    if view.phase == Phase::Choice {
        if let Some(chooser) = view.chooser {
            lines.push(format!("  {} won the draw and picks who plays first", seat_label(chooser)));
        }
    }
    if let Some(turn) = &view.turn {
        lines.push(format!(
            "  {} plays against {} | chips {} (started {}) | round {}",
            seat_label(turn.acting_player),
            seat_label(turn.acting_bank),
            turn.chips,
            turn.starting_chips,
            turn.rounds_played
        ));
        if let Some(round) = &turn.round {
            format_round(round, &mut lines);
        }
    }
    for r in &view.results {
        lines.push(format!(
            "  Turn {}: {} finished with {} ({:+})",
            r.turn_index + 1,
            seat_label(r.seat),
            r.final_chips,
            r.delta()
        ));
    }
    if let Some(result) = view.result {
        let outcome = match result.winner {
            Some(seat) if seat == view.viewer && !view.spectator => "You win the match".to_string(),
            Some(seat) => format!("{} wins the match", seat_label(seat)),
            None => "The match is a draw".to_string(),
        };
        lines.push(format!("  {} ({:?})", outcome, result.reason));
    }
    lines.join("\n")
}
