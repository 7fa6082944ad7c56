use rand::seq::SliceRandom;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::cards::{shoe, Card};
use crate::errors::EngineError;

/// Number of cards dealt from a turn's shoe after which the turn ends once the
/// current round is over. The shoe is never rebuilt mid-round.
pub const CUT_CARD_POSITION: usize = 65;

/// Reorders a freshly built shoe before play.
///
/// Production code shuffles with [`SecureShuffle`]. Other implementations exist so
/// fixtures can arrange a known card order.
pub trait Shuffler {
    fn shuffle(&mut self, cards: &mut [Card]);
}

impl<S: Shuffler + ?Sized> Shuffler for &mut S {
    fn shuffle(&mut self, cards: &mut [Card]) {
        (**self).shuffle(cards)
    }
}

/// Fisher–Yates shuffle driven by a cryptographically secure generator.
#[derive(Debug)]
pub struct SecureShuffle<R> {
    rng: R,
}

impl<R: RngCore + CryptoRng> SecureShuffle<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore + CryptoRng> Shuffler for SecureShuffle<R> {
    fn shuffle(&mut self, cards: &mut [Card]) {
        cards.shuffle(&mut self.rng);
    }
}

/// An ordered shoe plus a draw cursor that only moves forward.
///
/// # Examples
///
/// ```
/// use duel21_engine::deck::{Deck, SecureShuffle};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let mut shuffle = SecureShuffle::new(ChaCha20Rng::seed_from_u64(7));
/// let mut deck = Deck::shoe(&mut shuffle, false);
/// assert_eq!(deck.remaining(), 104);
/// deck.draw().expect("fresh shoe has cards");
/// assert_eq!(deck.position(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

impl Deck {
    /// Builds a shuffled two-deck shoe, with four wild cards when `wild` is set.
    pub fn shoe<S: Shuffler + ?Sized>(shuffler: &mut S, wild: bool) -> Self {
        let mut cards = shoe(wild);
        shuffler.shuffle(&mut cards);
        Self::from_cards(cards)
    }

    /// Wraps an already ordered sequence, e.g. one restored from storage.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards, position: 0 }
    }

    pub fn draw(&mut self) -> Result<Card, EngineError> {
        let card = self
            .cards
            .get(self.position)
            .copied()
            .ok_or(EngineError::DeckExhausted {
                position: self.position,
            })?;
        self.position += 1;
        Ok(card)
    }

    /// Cards dealt so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn past_cut_card(&self) -> bool {
        self.position >= CUT_CARD_POSITION
    }
}
