//! Pre-match high-card draw. Each seat takes one card from a dedicated draw deck; the
//! strictly higher card wins the right to choose the seating.

use std::cmp::Ordering;

use crate::cards::{full_deck, wild_cards, Card};
use crate::deck::{Deck, Shuffler};
use crate::errors::EngineError;
use crate::game::{DrawPair, Opener, Seat};

/// Safety cap on consecutive tied draws.
pub const OPENER_DRAW_LIMIT: usize = 1_000;

/// Single shuffled deck used for the opening draw, including the wild cards of wild modes.
pub fn opener_deck<S: Shuffler + ?Sized>(shuffler: &mut S, wild: bool) -> Deck {
    let mut cards = full_deck();
    if wild {
        cards.extend(wild_cards());
    }
    shuffler.shuffle(&mut cards);
    Deck::from_cards(cards)
}

/// Order used to compare opener cards: by printed rank, Wild above Ace. Suits never
/// break ties.
pub fn compare_draw(a: &Card, b: &Card) -> Ordering {
    a.rank.cmp(&b.rank)
}

fn draw_from<S: Shuffler + ?Sized>(
    deck: &mut Deck,
    shuffler: &mut S,
    wild: bool,
) -> Result<Card, EngineError> {
    if deck.remaining() == 0 {
        *deck = opener_deck(shuffler, wild);
    }
    deck.draw()
}

/// Draws until one seat holds the higher card, recording every exchange.
pub(crate) fn draw_round<S: Shuffler + ?Sized>(
    opener: &mut Opener,
    shuffler: &mut S,
    wild: bool,
) -> Result<Seat, EngineError> {
    for _ in 0..OPENER_DRAW_LIMIT {
        let one = draw_from(&mut opener.draw_deck, shuffler, wild)?;
        let two = draw_from(&mut opener.draw_deck, shuffler, wild)?;
        opener.draws.push(DrawPair { one, two });
        let winner = match compare_draw(&one, &two) {
            Ordering::Greater => Seat::One,
            Ordering::Less => Seat::Two,
            Ordering::Equal => continue,
        };
        opener.winner = Some(winner);
        return Ok(winner);
    }
    Err(EngineError::OpenerStalemate {
        attempts: OPENER_DRAW_LIMIT,
    })
}
