#![allow(dead_code)]

use std::collections::VecDeque;

use chrono::{TimeZone, Utc};
use duel21_engine::cards::{Card, Rank, Suit};
use duel21_engine::clock::{ManualClock, TimeSource};
use duel21_engine::deck::Shuffler;
use duel21_engine::engine::{Engine, EngineConfig};
use duel21_engine::game::{GameMode, Match, Phase, Seat};
use duel21_engine::hand::unresolved_wild_count;
use duel21_engine::rules::{DealerAction, PlayerAction};

/// Puts the queued cards on top of each deck it is asked to shuffle, leaving the
/// rest in build order. Decks built after the queue runs dry stay unshuffled.
///
/// A two-deck shoe holds each card twice and each wild card once, so a stack may not
/// ask for more copies than that.
#[derive(Debug, Default)]
pub struct Stacked {
    queue: VecDeque<Vec<Card>>,
}

impl Stacked {
    pub fn new(stacks: Vec<Vec<Card>>) -> Self {
        Self {
            queue: stacks.into(),
        }
    }

    pub fn push(&mut self, top: Vec<Card>) {
        self.queue.push_back(top);
    }
}

impl Shuffler for Stacked {
    fn shuffle(&mut self, cards: &mut [Card]) {
        let Some(top) = self.queue.pop_front() else {
            return;
        };
        for (i, want) in top.iter().enumerate() {
            let j = (i..cards.len())
                .find(|&j| cards[j] == *want)
                .unwrap_or_else(|| panic!("{want:?} is not left in the deck"));
            cards.swap(i, j);
        }
    }
}

pub type TestEngine = Engine<Stacked, ManualClock>;

pub fn c(rank: Rank) -> Card {
    Card::new(Suit::Hearts, rank)
}

pub fn cs(rank: Rank, suit: Suit) -> Card {
    Card::new(suit, rank)
}

pub fn wild() -> Card {
    Card::wild(Suit::Spades)
}

/// Opening draw that seat One wins on the first exchange.
pub fn seat_one_draws_high() -> Vec<Card> {
    vec![cs(Rank::King, Suit::Spades), cs(Rank::Two, Suit::Clubs)]
}

pub fn t0() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 12, 0, 0).unwrap()
}

pub fn engine_with(stacks: Vec<Vec<Card>>) -> TestEngine {
    engine_with_config(stacks, EngineConfig::default())
}

pub fn engine_with_config(stacks: Vec<Vec<Card>>, config: EngineConfig) -> TestEngine {
    Engine::new(Stacked::new(stacks), ManualClock::new(t0()), config)
}

/// Match with seat One as the first acting player, sitting in `WaitingBets`. `shoe`
/// is the top of the first turn's shoe: box cards in box order, then the dealer's up
/// card and hole card, then the draw pile.
pub fn started(mode: GameMode, shoe: Vec<Card>) -> (TestEngine, Match) {
    started_with(EngineConfig::default(), mode, shoe)
}

pub fn started_with(config: EngineConfig, mode: GameMode, shoe: Vec<Card>) -> (TestEngine, Match) {
    let mut engine = engine_with_config(vec![seat_one_draws_high(), shoe], config);
    let mut m = engine.create_match(100, mode, false).unwrap();
    assert_eq!(m.chooser(), Some(Seat::One));
    engine.make_choice(&mut m, Seat::One, true).unwrap();
    assert_eq!(m.phase(), Phase::WaitingBets);
    (engine, m)
}

pub fn chips(m: &Match) -> u32 {
    m.turn().unwrap().chips()
}

/// Plays one decision with a stand-on-everything policy. Returns whether the turn
/// ended.
pub fn step<S: Shuffler, T: TimeSource>(engine: &mut Engine<S, T>, m: &mut Match) -> bool {
    let decider = m.decider();
    match m.phase() {
        Phase::Choice => engine.make_choice(m, decider.unwrap(), true).unwrap(),
        Phase::WaitingBets => {
            let boxes = m.turn().unwrap().chips().min(3) as usize;
            engine.place_bets(m, decider.unwrap(), &vec![1; boxes]).unwrap()
        }
        Phase::Insurance => {
            let n = m.turn().unwrap().round().unwrap().boxes.len();
            engine.handle_insurance(m, decider.unwrap(), &vec![false; n]).unwrap()
        }
        Phase::PlayerTurn => engine
            .player_action(m, decider.unwrap(), PlayerAction::Stand)
            .unwrap(),
        Phase::WildChoice => {
            let round = m.turn().unwrap().round().unwrap();
            let n = unresolved_wild_count(round.current_hand().unwrap().cards());
            engine.assign_wild_values(m, decider.unwrap(), &vec![10; n]).unwrap()
        }
        Phase::DealerTurn => engine
            .dealer_action(m, decider.unwrap(), DealerAction::Stand)
            .unwrap(),
        Phase::DealerWildChoice => {
            let n = unresolved_wild_count(&m.turn().unwrap().round().unwrap().dealer_cards);
            engine
                .assign_dealer_wild_values(m, decider.unwrap(), &vec![10; n])
                .unwrap()
        }
        Phase::RoundResult => return engine.next_round_or_end_turn(m).unwrap(),
        Phase::CardDraw | Phase::TurnStart | Phase::MatchOver => unreachable!(),
    }
    false
}
