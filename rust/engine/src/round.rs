use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::hand::{Hand, HandStatus};

/// One betting position opened by the acting player. Owns one hand until split.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BetBox {
    pub hands: Vec<Hand>,
}

/// Position of a hand, box-major and hand-minor.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub box_index: usize,
    pub hand_index: usize,
}

/// Insurance state for the box at the same index.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct InsuranceOffer {
    pub offered: bool,
    pub taken: bool,
    pub amount: u32,
    pub decided: bool,
}

/// A single deal: the player's boxes, the dealer's cards and the round's accounting.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub boxes: Vec<BetBox>,
    pub dealer_cards: Vec<Card>,
    pub cursor: Cursor,
    pub insurance_offered: bool,
    pub insurance: Vec<InsuranceOffer>,
    pub total_initial_bet: u32,
    pub resolved: bool,
    /// Turn stack just before the bets were taken
    #[serde(default)]
    pub chips_before: u32,
    /// Chips moved from the turn stack into this round (bets, doubles, splits, insurance)
    pub escrowed: u32,
    /// Chips returned to the turn stack at settlement (stakes and winnings)
    pub paid_out: u32,
}

impl Round {
    pub fn new(boxes: Vec<BetBox>, dealer_cards: Vec<Card>, total_initial_bet: u32) -> Self {
        let insurance = vec![InsuranceOffer::default(); boxes.len()];
        Self {
            boxes,
            dealer_cards,
            cursor: Cursor::default(),
            insurance_offered: false,
            insurance,
            total_initial_bet,
            resolved: false,
            chips_before: 0,
            escrowed: total_initial_bet,
            paid_out: 0,
        }
    }

    pub fn dealer_up_card(&self) -> Option<&Card> {
        self.dealer_cards.first()
    }

    pub fn hand(&self, at: Cursor) -> Option<&Hand> {
        self.boxes.get(at.box_index)?.hands.get(at.hand_index)
    }

    pub fn hand_mut(&mut self, at: Cursor) -> Option<&mut Hand> {
        self.boxes.get_mut(at.box_index)?.hands.get_mut(at.hand_index)
    }

    /// The hand under the cursor, if the cursor has not run past the end.
    pub fn current_hand(&self) -> Option<&Hand> {
        self.hand(self.cursor)
    }

    pub fn current_hand_mut(&mut self) -> Option<&mut Hand> {
        let at = self.cursor;
        self.hand_mut(at)
    }

    pub fn hands(&self) -> impl Iterator<Item = &Hand> {
        self.boxes.iter().flat_map(|b| b.hands.iter())
    }

    pub fn hands_mut(&mut self) -> impl Iterator<Item = &mut Hand> {
        self.boxes.iter_mut().flat_map(|b| b.hands.iter_mut())
    }

    /// First active hand at or after the cursor, moving the cursor onto it. Leaves the
    /// cursor past the end when none remain.
    pub fn seek_active(&mut self) -> Option<Cursor> {
        while self.cursor.box_index < self.boxes.len() {
            let hands = &self.boxes[self.cursor.box_index].hands;
            while self.cursor.hand_index < hands.len() {
                if hands[self.cursor.hand_index].status == HandStatus::Active {
                    return Some(self.cursor);
                }
                self.cursor.hand_index += 1;
            }
            self.cursor.box_index += 1;
            self.cursor.hand_index = 0;
        }
        None
    }

    pub fn is_past_end(&self) -> bool {
        self.cursor.box_index >= self.boxes.len()
    }

    /// Whether any hand still needs the dealer's final total.
    pub fn any_standing(&self) -> bool {
        self.hands()
            .any(|h| matches!(h.status, HandStatus::Stand | HandStatus::Blackjack))
    }
}
