use std::collections::HashMap;

use duel21_engine::cards::{shoe, Card};
use duel21_engine::deck::{Deck, SecureShuffle, CUT_CARD_POSITION};
use duel21_engine::errors::EngineError;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn counts(cards: &[Card]) -> HashMap<Card, usize> {
    let mut m = HashMap::new();
    for c in cards {
        *m.entry(*c).or_insert(0) += 1;
    }
    m
}

fn drain(deck: &mut Deck) -> Vec<Card> {
    let mut out = Vec::new();
    while let Ok(c) = deck.draw() {
        out.push(c);
    }
    out
}

#[test]
fn shuffle_keeps_the_shoe_composition() {
    let mut shuffle = SecureShuffle::new(ChaCha20Rng::seed_from_u64(3));
    let mut deck = Deck::shoe(&mut shuffle, true);
    let dealt = drain(&mut deck);
    assert_eq!(dealt.len(), 108);
    assert_eq!(counts(&dealt), counts(&shoe(true)));
}

#[test]
fn same_seed_same_order_different_seed_differs() {
    let mut a = Deck::shoe(&mut SecureShuffle::new(ChaCha20Rng::seed_from_u64(42)), false);
    let mut b = Deck::shoe(&mut SecureShuffle::new(ChaCha20Rng::seed_from_u64(42)), false);
    let mut c = Deck::shoe(&mut SecureShuffle::new(ChaCha20Rng::seed_from_u64(43)), false);
    let (a, b, c) = (drain(&mut a), drain(&mut b), drain(&mut c));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn exhausted_deck_is_an_internal_error() {
    let mut deck = Deck::from_cards(shoe(false));
    drain(&mut deck);
    let err = deck.draw().unwrap_err();
    assert_eq!(err, EngineError::DeckExhausted { position: 104 });
    assert!(err.is_internal());
}

#[test]
fn cut_card_flag_trips_at_its_position() {
    let mut deck = Deck::from_cards(shoe(false));
    for _ in 0..CUT_CARD_POSITION - 1 {
        deck.draw().unwrap();
    }
    assert!(!deck.past_cut_card());
    deck.draw().unwrap();
    assert!(deck.past_cut_card());
}
