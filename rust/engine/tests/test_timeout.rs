mod common;

use chrono::Duration;
use common::*;
use duel21_engine::cards::Rank as R;
use duel21_engine::clock::DecisionKind;
use duel21_engine::engine::EngineConfig;
use duel21_engine::errors::EngineError;
use duel21_engine::game::{GameMode, Phase, Seat};
use duel21_engine::hand::HandStatus;

fn wait(engine: &TestEngine, secs: i64) {
    engine.time().advance(Duration::seconds(secs));
}

#[test]
fn second_call_on_the_same_expiry_is_a_no_op() {
    let shoe = vec![c(R::Ten), c(R::Seven), c(R::Six), c(R::Ten)];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    wait(&engine, 31);

    assert!(engine.apply_default_if_expired(&mut m).unwrap());
    assert_eq!(m.phase(), Phase::PlayerTurn);
    assert_eq!(m.turn().unwrap().round().unwrap().total_initial_bet, 1);
    let after_first = m.clone();

    assert!(!engine.apply_default_if_expired(&mut m).unwrap());
    assert_eq!(m, after_first);
}

#[test]
fn expiry_is_strictly_after_the_decision_window() {
    let (mut engine, mut m) = started(GameMode::Classic, vec![]);
    wait(&engine, 30);
    let before = m.clone();
    assert!(!engine.apply_default_if_expired(&mut m).unwrap());
    assert_eq!(m, before);
    wait(&engine, 1);
    assert!(engine.apply_default_if_expired(&mut m).unwrap());
}

#[test]
fn choice_defaults_to_chooser_playing_first() {
    let mut engine = engine_with(vec![seat_one_draws_high()]);
    let mut m = engine.create_match(10, GameMode::Classic, false).unwrap();
    assert_eq!(m.clock().kind(), Some(DecisionKind::Choice));
    wait(&engine, 31);
    assert!(engine.apply_default_if_expired(&mut m).unwrap());
    assert_eq!(m.phase(), Phase::WaitingBets);
    assert_eq!(m.turns()[0].acting_player, Seat::One);
}

#[test]
fn player_turn_defaults_to_stand_and_dealer_plays_out() {
    let shoe = vec![c(R::Ten), c(R::Seven), c(R::Ten), c(R::Eight)];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();
    wait(&engine, 31);

    assert_eq!(engine.drain_expired(&mut m, 50), Ok(1));
    assert_eq!(m.phase(), Phase::RoundResult);
    let hand = &m.turn().unwrap().round().unwrap().boxes[0].hands[0];
    assert_eq!(hand.status, HandStatus::Stand);
    assert_eq!(chips(&m), 90);
}

#[test]
fn insurance_defaults_to_declined() {
    let shoe = vec![c(R::Ten), c(R::Seven), c(R::Ace), c(R::Eight)];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    engine.place_bets(&mut m, Seat::One, &[20]).unwrap();
    wait(&engine, 31);
    assert!(engine.apply_default_if_expired(&mut m).unwrap());
    let round = m.turn().unwrap().round().unwrap();
    assert!(round.insurance.iter().all(|o| o.decided && !o.taken));
    assert_eq!(m.phase(), Phase::PlayerTurn);
    assert_eq!(chips(&m), 80);
}

#[test]
fn wild_choice_defaults_to_ace() {
    let shoe = vec![c(R::Eight), wild(), c(R::Six), c(R::Ten)];
    let (mut engine, mut m) = started(GameMode::Wild, shoe);
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();
    assert_eq!(m.phase(), Phase::WildChoice);
    wait(&engine, 31);
    assert!(engine.apply_default_if_expired(&mut m).unwrap());
    let hand = &m.turn().unwrap().round().unwrap().boxes[0].hands[0];
    assert_eq!(hand.cards()[1].chosen, Some(R::Ace));
    assert_eq!(hand.value(), 19);
    assert_eq!(m.phase(), Phase::PlayerTurn);
}

#[test]
fn result_pause_is_short_and_opens_the_next_round() {
    let shoe = vec![c(R::Ten), c(R::Seven), c(R::Ten), c(R::Eight)];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();
    engine
        .player_action(&mut m, Seat::One, duel21_engine::rules::PlayerAction::Stand)
        .unwrap();
    assert_eq!(m.phase(), Phase::RoundResult);
    wait(&engine, 6);
    assert!(engine.apply_default_if_expired(&mut m).unwrap());
    assert_eq!(m.phase(), Phase::WaitingBets);
    assert!(m.turn().unwrap().round.is_none());
}

#[test]
fn bet_default_ends_the_turn_when_chips_are_below_minimum() {
    let config = EngineConfig {
        turn_stake: 15,
        min_bet: 10,
        ..EngineConfig::default()
    };
    let shoe = vec![c(R::Ten), c(R::Six), c(R::Ten), c(R::Nine)];
    let (mut engine, mut m) = started_with(config, GameMode::Classic, shoe);
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();
    engine
        .player_action(&mut m, Seat::One, duel21_engine::rules::PlayerAction::Stand)
        .unwrap();
    assert!(!engine.next_round_or_end_turn(&mut m).unwrap());
    assert_eq!(chips(&m), 5);

    wait(&engine, 31);
    assert!(engine.apply_default_if_expired(&mut m).unwrap());
    assert_eq!(m.results().len(), 1);
    assert_eq!(m.results()[0].final_chips, 5);
    assert_eq!(m.current_turn_index(), 1);
    assert_eq!(m.turn().unwrap().acting_player, Seat::Two);
}

#[test]
fn drain_reports_a_clock_that_will_not_clear() {
    let (mut engine, mut m) = started(GameMode::Classic, vec![]);
    wait(&engine, 31);
    assert_eq!(
        engine.drain_expired(&mut m, 0),
        Err(EngineError::ClockNotCleared { iterations: 0 })
    );
}

#[test]
fn nothing_expires_once_the_match_is_over() {
    let (mut engine, mut m) = started(GameMode::Classic, vec![]);
    engine.forfeit(&mut m, Seat::One).unwrap();
    wait(&engine, 3600);
    assert!(!engine.apply_default_if_expired(&mut m).unwrap());
}
