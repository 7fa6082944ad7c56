//! Rule-based opponents.
//!
//! [`BaselineAI`] plays a condensed basic strategy against the visible up card and
//! banks by the house rule. [`CautiousAI`] never takes a card that could bust it.

use crate::{AIOpponent, Decision, current_hand};
use duel21_engine::cards::{Card, Rank};
use duel21_engine::game::Phase;
use duel21_engine::hand::{auto_resolve_wilds, hand_value, is_soft};
use duel21_engine::rules::{DEALER_STANDS_ON, DealerAction, PlayerAction};
use duel21_engine::view::{CardView, HandView, MatchView, RoundView};

/// Basic-strategy opponent.
///
/// # Strategy
///
/// **Player:**
/// - Splits Aces and Eights, small pairs against a weak up card
/// - Doubles hard 9-11 and soft 13-18 in the classic spots
/// - Stands on hard 17+, on 13-16 against 2-6 and 12 against 4-6
/// - Declines insurance
///
/// **Bank:** hits below 17.
///
/// Bets one box of a twentieth of the turn's starting chips.
///
/// # Example
///
/// ```rust
/// use duel21_ai::baseline::BaselineAI;
/// use duel21_ai::AIOpponent;
///
/// let ai = BaselineAI::new();
/// assert_eq!(ai.name(), "BaselineAI");
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaselineAI;

impl BaselineAI {
    pub fn new() -> Self {
        Self
    }

    /// Decision for the hand under the cursor against an up card worth `up`.
    pub fn player_move(hand: &HandView, up: u32) -> PlayerAction {
        let cards = &hand.cards;
        let total = hand.value;
        let soft = is_soft(cards);

        if hand.can_split && cards.len() == 2 {
            match cards[0].effective_rank() {
                Some(Rank::Ace | Rank::Eight) => return PlayerAction::Split,
                Some(Rank::Two | Rank::Three | Rank::Six | Rank::Seven) if (2..=7).contains(&up) => {
                    return PlayerAction::Split;
                }
                Some(Rank::Nine) if (2..=9).contains(&up) && up != 7 => return PlayerAction::Split,
                _ => {}
            }
        }

        if hand.can_double && cards.len() == 2 {
            let hard_double =
                total == 11 || (total == 10 && up <= 9) || (total == 9 && (3..=6).contains(&up));
            let soft_double = (13..=18).contains(&total) && (5..=6).contains(&up);
            if (!soft && hard_double) || (soft && soft_double) {
                return PlayerAction::Double;
            }
        }

        let stand = if soft {
            total >= 19 || (total == 18 && up <= 8)
        } else {
            match total {
                17.. => true,
                13..=16 => up <= 6,
                12 => (4..=6).contains(&up),
                _ => false,
            }
        };
        if stand {
            PlayerAction::Stand
        } else {
            PlayerAction::Hit
        }
    }
}

impl AIOpponent for BaselineAI {
    fn decide(&self, view: &MatchView) -> Option<Decision> {
        if !view.is_my_turn {
            return None;
        }
        match view.phase {
            Phase::Choice => Some(Decision::Choice(true)),
            Phase::WaitingBets => bet_size(view, 20).map(|b| Decision::Bets(vec![b])),
            Phase::Insurance => boxes(view).map(|n| Decision::Insurance(vec![false; n])),
            Phase::PlayerTurn => {
                let (round, hand) = current_hand(view)?;
                Some(Decision::Play(Self::player_move(hand, up_card_value(round))))
            }
            Phase::WildChoice => current_hand(view).map(|(_, h)| Decision::Wilds(wild_values(&h.cards))),
            Phase::DealerTurn => dealer_move(view),
            Phase::DealerWildChoice => dealer_wilds(view),
            _ => None,
        }
    }

    fn name(&self) -> &str {
        "BaselineAI"
    }
}

/// Minimum bettor that never takes a card it could bust on and always insures.
#[derive(Debug, Clone, Default)]
pub struct CautiousAI;

impl CautiousAI {
    pub fn new() -> Self {
        Self
    }

    pub fn player_move(hand: &HandView) -> PlayerAction {
        let soft = is_soft(&hand.cards);
        if (hand.value >= 12 && !soft) || hand.value >= 18 {
            PlayerAction::Stand
        } else {
            PlayerAction::Hit
        }
    }
}

impl AIOpponent for CautiousAI {
    fn decide(&self, view: &MatchView) -> Option<Decision> {
        if !view.is_my_turn {
            return None;
        }
        match view.phase {
            // prefers to see the other seat play first
            Phase::Choice => Some(Decision::Choice(false)),
            Phase::WaitingBets => {
                let chips = view.turn.as_ref()?.chips;
                let minimum = view.min_bet.max(1);
                (chips >= minimum).then(|| Decision::Bets(vec![minimum]))
            }
            Phase::Insurance => boxes(view).map(|n| Decision::Insurance(vec![true; n])),
            Phase::PlayerTurn => current_hand(view).map(|(_, h)| Decision::Play(Self::player_move(h))),
            Phase::WildChoice => current_hand(view).map(|(_, h)| Decision::Wilds(wild_values(&h.cards))),
            Phase::DealerTurn => dealer_move(view),
            Phase::DealerWildChoice => dealer_wilds(view),
            _ => None,
        }
    }

    fn name(&self) -> &str {
        "CautiousAI"
    }
}

/// One box of `starting_chips / divisor`, at least the table minimum and at most the
/// chips left. `None` when the stack is below the minimum.
pub(crate) fn bet_size(view: &MatchView, divisor: u32) -> Option<u32> {
    let turn = view.turn.as_ref()?;
    let minimum = view.min_bet.max(1);
    if turn.chips < minimum {
        return None;
    }
    Some((turn.starting_chips / divisor.max(1)).max(minimum).min(turn.chips))
}

pub(crate) fn boxes(view: &MatchView) -> Option<usize> {
    Some(view.turn.as_ref()?.round.as_ref()?.boxes.len())
}

/// Value of the dealer's up card; an unresolved wild counts as an Ace.
pub fn up_card_value(round: &RoundView) -> u32 {
    match round.dealer_cards.first() {
        Some(CardView::Shown(card)) if card.is_unresolved_wild() => 11,
        Some(CardView::Shown(card)) => hand_value(std::slice::from_ref(card)),
        _ => 0,
    }
}

/// Values that bring each pending wild card, in order, as close to 21 as it can.
pub fn wild_values(cards: &[Card]) -> Vec<u8> {
    let mut resolved = cards.to_vec();
    auto_resolve_wilds(&mut resolved);
    cards
        .iter()
        .zip(&resolved)
        .filter(|(before, _)| before.is_unresolved_wild())
        .filter_map(|(_, after)| after.chosen.and_then(Rank::choice))
        .collect()
}

pub(crate) fn shown_dealer_cards(round: &RoundView) -> Vec<Card> {
    round
        .dealer_cards
        .iter()
        .filter_map(|c| match c {
            CardView::Shown(card) => Some(*card),
            CardView::Hidden => None,
        })
        .collect()
}

/// House rule for an interactive bank.
fn dealer_move(view: &MatchView) -> Option<Decision> {
    let round = view.turn.as_ref()?.round.as_ref()?;
    let action = if round.dealer_value < DEALER_STANDS_ON {
        DealerAction::Hit
    } else {
        DealerAction::Stand
    };
    Some(Decision::Dealer(action))
}

fn dealer_wilds(view: &MatchView) -> Option<Decision> {
    let round = view.turn.as_ref()?.round.as_ref()?;
    Some(Decision::DealerWilds(wild_values(&shown_dealer_cards(round))))
}
