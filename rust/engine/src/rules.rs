use serde::{Deserialize, Serialize};

use crate::cards::Rank;
use crate::errors::EngineError;
use crate::hand::{hand_value, Hand, HandResult, HandStatus};

/// Most boxes a player may open in one round.
pub const MAX_BOXES: usize = 3;
/// Dealer draws while below this total.
pub const DEALER_STANDS_ON: u32 = 17;
/// Winning insurance returns the stake plus 2:1.
pub const INSURANCE_RETURN_MULTIPLIER: u32 = 3;

/// Player decisions on the hand under the cursor.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerAction {
    Hit,
    Stand,
    Double,
    Split,
}

/// Decisions of the acting bank in interactive modes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealerAction {
    Hit,
    Stand,
}

/// A validated per-box wager.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bet(u32);

impl Bet {
    pub fn new(amount: u32, minimum: u32) -> Result<Self, EngineError> {
        let minimum = minimum.max(1);
        if amount < minimum {
            return Err(EngineError::InvalidBetAmount { amount, minimum });
        }
        Ok(Self(amount))
    }

    pub fn amount(self) -> u32 {
        self.0
    }
}

/// Validates a multi-box wager against the chips available.
///
/// # Examples
///
/// ```
/// use duel21_engine::rules::validate_bets;
/// use duel21_engine::errors::EngineError;
///
/// let bets = validate_bets(&[10, 20], 100, 1).unwrap();
/// assert_eq!(bets.len(), 2);
///
/// assert!(matches!(
///     validate_bets(&[60, 50], 100, 1),
///     Err(EngineError::InsufficientChips { required: 110, available: 100 })
/// ));
/// assert!(matches!(
///     validate_bets(&[], 100, 1),
///     Err(EngineError::InvalidBetCount { .. })
/// ));
/// ```
pub fn validate_bets(amounts: &[u32], chips: u32, minimum: u32) -> Result<Vec<Bet>, EngineError> {
    if amounts.is_empty() || amounts.len() > MAX_BOXES {
        return Err(EngineError::InvalidBetCount {
            count: amounts.len(),
            max: MAX_BOXES,
        });
    }
    let bets = amounts
        .iter()
        .map(|&a| Bet::new(a, minimum))
        .collect::<Result<Vec<_>, _>>()?;
    let required = amounts.iter().map(|&a| u64::from(a)).sum::<u64>();
    if required > u64::from(chips) {
        return Err(EngineError::InsufficientChips {
            required: u32::try_from(required).unwrap_or(u32::MAX),
            available: chips,
        });
    }
    Ok(bets)
}

/// Checks a split request against the hand under the cursor.
pub fn check_split(hand: &Hand, chips: u32) -> Result<(), EngineError> {
    if hand.status != HandStatus::Active {
        return Err(EngineError::HandNotActive);
    }
    if hand.is_split {
        return Err(EngineError::CannotSplit("hand was already split"));
    }
    let cards = hand.cards();
    if cards.len() != 2 {
        return Err(EngineError::CannotSplit("split needs exactly two cards"));
    }
    let both_wild = cards[0].is_wild() && cards[1].is_wild();
    let pair = match (cards[0].effective_rank(), cards[1].effective_rank()) {
        (Some(a), Some(b)) => a == b || (a.is_ten_valued() && b.is_ten_valued()),
        _ => false,
    };
    if !(both_wild || pair) {
        return Err(EngineError::CannotSplit("cards are not a pair"));
    }
    if chips < hand.bet {
        return Err(EngineError::InsufficientChips {
            required: hand.bet,
            available: chips,
        });
    }
    Ok(())
}

/// Checks a double request against the hand under the cursor.
pub fn check_double(hand: &Hand, chips: u32) -> Result<(), EngineError> {
    if hand.status != HandStatus::Active {
        return Err(EngineError::HandNotActive);
    }
    if hand.is_doubled {
        return Err(EngineError::CannotDouble("hand was already doubled"));
    }
    if hand.cards().len() != 2 {
        return Err(EngineError::CannotDouble("double needs exactly two cards"));
    }
    if chips < hand.bet {
        return Err(EngineError::InsufficientChips {
            required: hand.bet,
            available: chips,
        });
    }
    Ok(())
}

/// Whether splitting the pair produces hands that lose the blackjack bonus,
/// as `(from_split_aces, from_split_wild)`.
pub fn split_flags(hand: &Hand) -> (bool, bool) {
    let cards = hand.cards();
    (
        cards.iter().any(|c| c.rank == Rank::Ace),
        cards.iter().any(|c| c.is_wild()),
    )
}

/// Maximum insurance for a hand: half its bet, rounded down.
pub fn insurance_stake(bet: u32) -> u32 {
    bet / 2
}

/// Blackjack pays the stake back plus 3:2, rounded down.
pub fn blackjack_return(bet: u32) -> u64 {
    let bet = u64::from(bet);
    bet + (3 * bet) / 2
}

/// Settles one hand against the dealer's final cards, returning the result and the
/// chips returned to the player (stake included).
///
/// # Examples
///
/// ```
/// use duel21_engine::cards::{Card, Rank, Suit};
/// use duel21_engine::hand::{Hand, HandResult, HandStatus};
/// use duel21_engine::rules::settle_hand;
///
/// let c = |r| Card::new(Suit::Hearts, r);
/// let mut hand = Hand::dealt(c(Rank::Ten), c(Rank::Nine), 10);
/// hand.status = HandStatus::Stand;
///
/// let dealer = [c(Rank::Ten), c(Rank::Eight)];
/// assert_eq!(settle_hand(&hand, &dealer), (HandResult::Win, 20));
/// ```
pub fn settle_hand(hand: &Hand, dealer: &[crate::cards::Card]) -> (HandResult, u64) {
    let dealer_value = hand_value(dealer);
    let bet = u64::from(hand.bet);
    let dealer_blackjack = crate::hand::is_blackjack(dealer);
    match hand.status {
        HandStatus::Blackjack if dealer_blackjack => (HandResult::Push, bet),
        HandStatus::Blackjack => (HandResult::BlackjackWin, blackjack_return(hand.bet)),
        HandStatus::Stand => {
            let value = hand.value();
            if dealer_value > 21 || value > dealer_value {
                (HandResult::Win, bet * 2)
            } else if value == dealer_value {
                (HandResult::Push, bet)
            } else {
                (HandResult::Lose, 0)
            }
        }
        HandStatus::Push => (HandResult::Push, bet),
        HandStatus::Bust | HandStatus::Lose | HandStatus::Active => (HandResult::Lose, 0),
    }
}
