use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::EngineError;
use crate::game::Seat;
use crate::round::Round;

/// Default chips added to a player's carried total at the start of each turn.
pub const TURN_STARTING_CHIPS: u32 = 100;

/// One cycle of rounds played by a fixed (player, bank) pairing on a single shoe.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub acting_player: Seat,
    pub acting_bank: Seat,
    deck: Deck,
    chips: u32,
    pub starting_chips: u32,
    pub cut_card_reached: bool,
    pub round: Option<Round>,
    /// Rounds started in this turn
    pub rounds_played: u32,
}

impl Turn {
    pub fn new(acting_player: Seat, acting_bank: Seat, deck: Deck, starting_chips: u32) -> Self {
        Self {
            acting_player,
            acting_bank,
            deck,
            chips: starting_chips,
            starting_chips,
            cut_card_reached: false,
            round: None,
            rounds_played: 0,
        }
    }

    pub fn chips(&self) -> u32 {
        self.chips
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Cards dealt from this turn's shoe.
    pub fn cards_dealt(&self) -> usize {
        self.deck.position()
    }

    /// Draws the next card, flagging the cut card once it has been passed.
    pub fn draw(&mut self) -> Result<Card, EngineError> {
        let card = self.deck.draw()?;
        if self.deck.past_cut_card() {
            self.cut_card_reached = true;
        }
        Ok(card)
    }

    /// Moves chips from the stack into the active round.
    pub(crate) fn escrow(&mut self, amount: u32) -> Result<(), EngineError> {
        if amount > self.chips {
            return Err(EngineError::InsufficientChips {
                required: amount,
                available: self.chips,
            });
        }
        if let Some(round) = self.round.as_mut() {
            round.escrowed = round
                .escrowed
                .checked_add(amount)
                .ok_or(EngineError::ChipOverflow)?;
        }
        self.chips -= amount;
        Ok(())
    }

    /// Returns chips from the active round to the stack. A total that no longer fits
    /// in the stack fails without crediting anything.
    pub(crate) fn pay(&mut self, amount: u64) -> Result<(), EngineError> {
        let credit = |held: u32| {
            u32::try_from(u64::from(held) + amount).map_err(|_| EngineError::ChipOverflow)
        };
        let chips = credit(self.chips)?;
        if let Some(round) = self.round.as_mut() {
            round.paid_out = credit(round.paid_out)?;
        }
        self.chips = chips;
        Ok(())
    }

    pub(crate) fn take_initial_bets(&mut self, total: u32) -> Result<(), EngineError> {
        if total > self.chips {
            return Err(EngineError::InsufficientChips {
                required: total,
                available: self.chips,
            });
        }
        self.chips -= total;
        Ok(())
    }

    pub fn round(&self) -> Result<&Round, EngineError> {
        self.round.as_ref().ok_or(EngineError::MissingRound)
    }

    pub fn round_mut(&mut self) -> Result<&mut Round, EngineError> {
        self.round.as_mut().ok_or(EngineError::MissingRound)
    }
}
