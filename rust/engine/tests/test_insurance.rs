mod common;

use common::*;
use duel21_engine::cards::{Rank as R, Suit as S};
use duel21_engine::errors::EngineError;
use duel21_engine::game::{GameMode, Phase, Seat};
use duel21_engine::hand::{HandResult, HandStatus};
use duel21_engine::logger::RoundRecord;

#[test]
fn insurance_pays_three_times_against_a_dealer_natural() {
    let shoe = vec![c(R::Ten), c(R::Nine), c(R::Ace), c(R::King)];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    engine.place_bets(&mut m, Seat::One, &[20]).unwrap();
    assert_eq!(m.phase(), Phase::Insurance);
    assert!(m.turn().unwrap().round().unwrap().insurance_offered);

    engine.handle_insurance(&mut m, Seat::One, &[true]).unwrap();
    assert_eq!(m.phase(), Phase::RoundResult);
    let round = m.turn().unwrap().round().unwrap();
    assert!(round.resolved);
    assert_eq!(round.insurance[0].amount, 10);
    assert!(round.insurance[0].taken);
    let hand = &round.boxes[0].hands[0];
    assert_eq!(hand.status, HandStatus::Lose);
    assert_eq!(hand.result, Some(HandResult::Lose));

    // 100 - 20 bet - 10 insurance + 30
    assert_eq!(chips(&m), 100);
    let record = RoundRecord::capture(&m, "x").unwrap();
    assert_eq!(record.escrowed, 30);
    assert_eq!(record.paid_out, 30);
    assert!(record.conserves_chips());
}

#[test]
fn player_natural_pushes_against_dealer_natural() {
    let shoe = vec![
        cs(R::Ace, S::Clubs),
        cs(R::Queen, S::Clubs),
        c(R::Ace),
        c(R::King),
    ];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    engine.place_bets(&mut m, Seat::One, &[20]).unwrap();
    engine.handle_insurance(&mut m, Seat::One, &[false]).unwrap();
    let hand = &m.turn().unwrap().round().unwrap().boxes[0].hands[0];
    assert_eq!(hand.status, HandStatus::Push);
    assert_eq!(chips(&m), 100);
}

#[test]
fn declined_insurance_without_dealer_natural_continues_play() {
    let shoe = vec![c(R::Ten), c(R::Six), c(R::Ace), c(R::Seven)];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    engine.place_bets(&mut m, Seat::One, &[20]).unwrap();
    engine.handle_insurance(&mut m, Seat::One, &[true]).unwrap();
    assert_eq!(m.phase(), Phase::PlayerTurn);
    // the insurance stake is gone
    assert_eq!(chips(&m), 70);
}

#[test]
fn insurance_is_capped_by_remaining_chips_box_by_box() {
    let shoe = vec![
        cs(R::Ten, S::Clubs),
        cs(R::Six, S::Clubs),
        cs(R::Ten, S::Diamonds),
        cs(R::Six, S::Diamonds),
        c(R::Ace),
        c(R::Seven),
    ];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    engine.place_bets(&mut m, Seat::One, &[50, 40]).unwrap();
    engine.handle_insurance(&mut m, Seat::One, &[true, true]).unwrap();
    let round = m.turn().unwrap().round().unwrap();
    assert_eq!(round.insurance[0].amount, 10);
    assert!(round.insurance[0].taken);
    assert_eq!(round.insurance[1].amount, 0);
    assert!(!round.insurance[1].taken);
    assert!(round.insurance.iter().all(|o| o.decided));
    assert_eq!(chips(&m), 0);
}

#[test]
fn one_decision_per_box() {
    let shoe = vec![c(R::Ten), c(R::Six), c(R::Ace), c(R::Seven)];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    engine.place_bets(&mut m, Seat::One, &[20]).unwrap();
    let before = m.clone();
    assert_eq!(
        engine.handle_insurance(&mut m, Seat::One, &[true, false]),
        Err(EngineError::InsuranceDecisionCount {
            expected: 1,
            actual: 2
        })
    );
    assert_eq!(m, before);
}

#[test]
fn ten_up_natural_settles_without_insurance() {
    let shoe = vec![c(R::Ten), c(R::Nine), c(R::King), c(R::Ace)];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    engine.place_bets(&mut m, Seat::One, &[20]).unwrap();
    assert_eq!(m.phase(), Phase::RoundResult);
    assert!(!m.turn().unwrap().round().unwrap().insurance_offered);
    assert_eq!(chips(&m), 80);
}

#[test]
fn wild_up_card_offers_insurance() {
    let shoe = vec![c(R::Ten), c(R::Nine), wild(), c(R::Queen)];
    let (mut engine, mut m) = started(GameMode::Wild, shoe);
    engine.place_bets(&mut m, Seat::One, &[20]).unwrap();
    assert_eq!(m.phase(), Phase::Insurance);
    engine.handle_insurance(&mut m, Seat::One, &[false]).unwrap();

    // wild plus queen is a dealer natural once the wild takes the Ace
    assert_eq!(m.phase(), Phase::RoundResult);
    let round = m.turn().unwrap().round().unwrap();
    assert_eq!(round.dealer_cards[0].chosen, Some(R::Ace));
    assert_eq!(chips(&m), 80);
}
