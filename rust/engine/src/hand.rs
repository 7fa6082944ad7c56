use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

pub const BLACKJACK: u32 = 21;

/// Progress of a single hand through the player turn and settlement.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum HandStatus {
    /// Still waiting for decisions
    Active,
    /// No further cards; compared against the dealer at settlement
    Stand,
    /// Value exceeded 21
    Bust,
    /// Natural 21 on two cards, paid 3:2 unless the dealer also has one
    Blackjack,
    /// Refunded because the dealer revealed a natural
    Push,
    /// Lost to a dealer natural without playing
    Lose,
}

/// Settled outcome of a hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum HandResult {
    Win,
    Lose,
    Push,
    BlackjackWin,
}

/// A set of cards with its own bet, descended from a betting box.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    pub bet: u32,
    pub status: HandStatus,
    #[serde(default)]
    pub result: Option<HandResult>,
    #[serde(default)]
    pub is_split: bool,
    #[serde(default)]
    pub is_doubled: bool,
    #[serde(default)]
    pub from_split_aces: bool,
    #[serde(default)]
    pub from_split_wild: bool,
}

impl Hand {
    /// A freshly dealt two-card hand. Hands never exist without cards.
    pub fn dealt(first: Card, second: Card, bet: u32) -> Self {
        Self {
            cards: vec![first, second],
            bet,
            status: HandStatus::Active,
            result: None,
            is_split: false,
            is_doubled: false,
            from_split_aces: false,
            from_split_wild: false,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Replaces the second card, returning the one removed. Used when splitting.
    pub(crate) fn split_off_second(&mut self, replacement: Card) -> Card {
        std::mem::replace(&mut self.cards[1], replacement)
    }

    pub fn value(&self) -> u32 {
        hand_value(&self.cards)
    }

    pub fn has_unresolved_wild(&self) -> bool {
        has_unresolved_wild(&self.cards)
    }

    /// Two-card 21 that earns the blackjack bonus. Hands descending from a split of
    /// aces or wild cards score 21 as an ordinary total.
    pub fn is_natural(&self) -> bool {
        !self.from_split_aces && !self.from_split_wild && is_blackjack(&self.cards)
    }
}

/// Best total of the hand, counting each Ace as 11 and demoting Aces to 1 one at a
/// time while the total exceeds 21. Unresolved wild cards are left out.
pub fn hand_value(cards: &[Card]) -> u32 {
    value_and_softness(cards).0
}

/// Whether the best total still counts an Ace as 11.
pub fn is_soft(cards: &[Card]) -> bool {
    value_and_softness(cards).1
}

fn value_and_softness(cards: &[Card]) -> (u32, bool) {
    let mut total = 0u32;
    let mut aces = 0u32;
    for rank in cards.iter().filter_map(Card::effective_rank) {
        total += rank.pip_value().unwrap_or(0);
        if rank == Rank::Ace {
            aces += 1;
        }
    }
    while total > BLACKJACK && aces > 0 {
        total -= 10;
        aces -= 1;
    }
    (total, aces > 0)
}

/// Total used only for internal 21 bookkeeping: each unresolved wild card is treated
/// as worth `clamp(21 - running_total, 1, 11)`.
pub fn provisional_value(cards: &[Card]) -> u32 {
    let mut total = hand_value(cards);
    for _ in cards.iter().filter(|c| c.is_unresolved_wild()) {
        total += BLACKJACK.saturating_sub(total).clamp(1, 11);
    }
    total
}

pub fn has_unresolved_wild(cards: &[Card]) -> bool {
    cards.iter().any(Card::is_unresolved_wild)
}

pub fn unresolved_wild_count(cards: &[Card]) -> usize {
    cards.iter().filter(|c| c.is_unresolved_wild()).count()
}

/// Exactly two cards, nothing left to resolve, totalling 21.
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && !has_unresolved_wild(cards) && hand_value(cards) == BLACKJACK
}

/// Rank that brings the resolved part of `cards` as close to 21 as one card can.
pub fn fill_to_21(cards: &[Card]) -> Rank {
    match BLACKJACK.saturating_sub(hand_value(cards)).clamp(1, 11) {
        1 | 11 => Rank::Ace,
        v => Rank::from_choice(v as u8).unwrap_or(Rank::Ace),
    }
}

/// Resolves every pending wild card in order with [`fill_to_21`].
pub fn auto_resolve_wilds(cards: &mut [Card]) {
    for i in 0..cards.len() {
        if cards[i].is_unresolved_wild() {
            let rank = fill_to_21(&cards[..i]);
            cards[i].resolve(rank);
        }
    }
}
