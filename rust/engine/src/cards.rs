use serde::{Deserialize, Serialize};

/// Represents one of the four suits of a standard deck.
/// Wild cards also carry a suit so every card in a shoe stays distinguishable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Clubs suit (♣)
    Clubs,
    /// Diamonds suit (♦)
    Diamonds,
    /// Hearts suit (♥)
    Hearts,
    /// Spades suit (♠)
    Spades,
}

/// Represents the rank of a card from Two through Ace, plus the variant `Wild` card.
///
/// Discriminants follow the extended draw order used by the opener: Two is lowest,
/// Ace ranks above King and Wild ranks above Ace.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 2
    Two = 2,
    /// Rank 3
    Three,
    /// Rank 4
    Four,
    /// Rank 5
    Five,
    /// Rank 6
    Six,
    /// Rank 7
    Seven,
    /// Rank 8
    Eight,
    /// Rank 9
    Nine,
    /// Rank 10
    Ten,
    /// Jack
    Jack,
    /// Queen
    Queen,
    /// King
    King,
    /// Ace (scores 11 or 1)
    Ace,
    /// Wild card whose rank is chosen when it is resolved
    Wild,
}

impl Rank {
    /// Maps a wire-level choice `1..=13` onto a concrete rank.
    ///
    /// `1` is the Ace, `2..=10` are the pip ranks and `11`, `12`, `13` are Jack,
    /// Queen and King. Anything else is rejected.
    pub fn from_choice(v: u8) -> Option<Rank> {
        let rank = match v {
            1 => Rank::Ace,
            2 => Rank::Two,
            3 => Rank::Three,
            4 => Rank::Four,
            5 => Rank::Five,
            6 => Rank::Six,
            7 => Rank::Seven,
            8 => Rank::Eight,
            9 => Rank::Nine,
            10 => Rank::Ten,
            11 => Rank::Jack,
            12 => Rank::Queen,
            13 => Rank::King,
            _ => return None,
        };
        Some(rank)
    }

    /// Inverse of [`Rank::from_choice`]; `None` for `Wild`.
    pub fn choice(self) -> Option<u8> {
        match self {
            Rank::Ace => Some(1),
            Rank::Wild => None,
            r => Some(r as u8),
        }
    }

    /// Blackjack pip value: faces count 10, the Ace counts 11 before demotion.
    /// `Wild` has no pip value of its own.
    pub fn pip_value(self) -> Option<u32> {
        match self {
            Rank::Ace => Some(11),
            Rank::Jack | Rank::Queen | Rank::King => Some(10),
            Rank::Wild => None,
            r => Some(r as u32),
        }
    }

    pub fn is_ten_valued(self) -> bool {
        matches!(self, Rank::Ten | Rank::Jack | Rank::Queen | Rank::King)
    }
}

/// A single playing card.
///
/// For wild cards `chosen` holds the rank picked during wild-card resolution. It is
/// always `None` for ordinary cards and for wild cards still awaiting a value.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    /// The suit of the card
    pub suit: Suit,
    /// The printed rank of the card (`Wild` for wild cards)
    pub rank: Rank,
    /// Rank assigned to a resolved wild card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen: Option<Rank>,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self {
            suit,
            rank,
            chosen: None,
        }
    }

    pub fn wild(suit: Suit) -> Self {
        Self::new(suit, Rank::Wild)
    }

    pub fn is_wild(&self) -> bool {
        self.rank == Rank::Wild
    }

    pub fn is_unresolved_wild(&self) -> bool {
        self.is_wild() && self.chosen.is_none()
    }

    /// The rank this card scores as, or `None` while it is an unresolved wild.
    pub fn effective_rank(&self) -> Option<Rank> {
        if self.is_wild() {
            self.chosen
        } else {
            Some(self.rank)
        }
    }

    /// Resolves a wild card to `rank`. Ordinary cards are left untouched.
    pub fn resolve(&mut self, rank: Rank) {
        if self.is_wild() && rank != Rank::Wild {
            self.chosen = Some(rank);
        }
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &s in &all_suits() {
        for &r in &all_ranks() {
            v.push(Card::new(s, r));
        }
    }
    v
}

/// One wild card per suit.
pub fn wild_cards() -> Vec<Card> {
    all_suits().iter().map(|&s| Card::wild(s)).collect()
}

/// Unshuffled shoe composition: two standard decks, plus four wild cards when `wild` is set.
pub fn shoe(wild: bool) -> Vec<Card> {
    let mut v = Vec::with_capacity(108);
    v.extend(full_deck());
    v.extend(full_deck());
    if wild {
        v.extend(wild_cards());
    }
    v
}
