//! Opponent that picks uniformly among the moves the view says are legal.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::baseline::shown_dealer_cards;
use crate::{AIOpponent, Decision, current_hand};
use duel21_engine::game::Phase;
use duel21_engine::hand::unresolved_wild_count;
use duel21_engine::rules::{DealerAction, MAX_BOXES, PlayerAction};
use duel21_engine::view::MatchView;

#[derive(Debug)]
pub struct RandomAI {
    rng: Mutex<StdRng>,
}

impl RandomAI {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    fn pick(rng: &mut StdRng, view: &MatchView) -> Option<Decision> {
        match view.phase {
            Phase::Choice => Some(Decision::Choice(rng.random_bool(0.5))),
            Phase::WaitingBets => {
                let chips = view.turn.as_ref()?.chips;
                let minimum = view.min_bet.max(1);
                let max_boxes = (chips / minimum).min(MAX_BOXES as u32);
                if max_boxes == 0 {
                    return None;
                }
                let count = rng.random_range(1..=max_boxes);
                let share = (chips - count * minimum) / count;
                let bets = (0..count)
                    .map(|_| minimum + rng.random_range(0..=share))
                    .collect();
                Some(Decision::Bets(bets))
            }
            Phase::Insurance => {
                let n = view.turn.as_ref()?.round.as_ref()?.boxes.len();
                Some(Decision::Insurance((0..n).map(|_| rng.random_bool(0.5)).collect()))
            }
            Phase::PlayerTurn => {
                let (_, hand) = current_hand(view)?;
                let mut moves = vec![PlayerAction::Hit, PlayerAction::Stand];
                if hand.can_double {
                    moves.push(PlayerAction::Double);
                }
                if hand.can_split {
                    moves.push(PlayerAction::Split);
                }
                Some(Decision::Play(moves[rng.random_range(0..moves.len())]))
            }
            Phase::WildChoice => {
                let (_, hand) = current_hand(view)?;
                let n = unresolved_wild_count(&hand.cards);
                Some(Decision::Wilds((0..n).map(|_| rng.random_range(1..=13)).collect()))
            }
            Phase::DealerTurn => {
                let action = if rng.random_bool(0.5) {
                    DealerAction::Hit
                } else {
                    DealerAction::Stand
                };
                Some(Decision::Dealer(action))
            }
            Phase::DealerWildChoice => {
                let round = view.turn.as_ref()?.round.as_ref()?;
                let n = unresolved_wild_count(&shown_dealer_cards(round));
                Some(Decision::DealerWilds((0..n).map(|_| rng.random_range(1..=13)).collect()))
            }
            _ => None,
        }
    }
}

impl AIOpponent for RandomAI {
    fn decide(&self, view: &MatchView) -> Option<Decision> {
        if !view.is_my_turn {
            return None;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Self::pick(&mut rng, view)
    }

    fn name(&self) -> &str {
        "RandomAI"
    }
}
