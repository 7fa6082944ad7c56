mod common;

use chrono::Duration;
use common::*;
use duel21_engine::cards::{Rank as R, Suit as S};
use duel21_engine::clock::DecisionKind;
use duel21_engine::game::{GameMode, Phase, Seat};
use duel21_engine::rules::PlayerAction as A;
use duel21_engine::view::{project_view, CardView};

fn pair_shoe() -> Vec<duel21_engine::cards::Card> {
    vec![
        cs(R::Eight, S::Clubs),
        cs(R::Eight, S::Diamonds),
        c(R::Seven),
        c(R::Queen),
        c(R::Two),
        c(R::Three),
        c(R::Ten),
    ]
}

#[test]
fn the_player_sees_only_the_up_card() {
    let (mut engine, mut m) = started(GameMode::Classic, pair_shoe());
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();

    let v = project_view(&m, Seat::One, false);
    assert!(v.is_my_turn);
    assert!(v.i_am_player);
    assert!(!v.i_am_dealer);
    let round = v.turn.as_ref().unwrap().round.as_ref().unwrap();
    assert_eq!(round.dealer_cards[0], CardView::Shown(c(R::Seven)));
    assert_eq!(round.dealer_cards[1], CardView::Hidden);
    assert_eq!(round.dealer_value, 7);
    assert!(!round.hole_card_visible);

    let hand = &round.boxes[0][0];
    assert!(hand.is_current);
    assert!(hand.can_split);
    assert!(hand.can_double);
}

#[test]
fn the_bank_sees_its_hole_card_but_not_player_prompts() {
    let (mut engine, mut m) = started(GameMode::Classic, pair_shoe());
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();

    let v = project_view(&m, Seat::Two, false);
    assert!(!v.is_my_turn);
    assert!(v.i_am_dealer);
    let round = v.turn.as_ref().unwrap().round.as_ref().unwrap();
    assert_eq!(round.dealer_cards[1], CardView::Shown(c(R::Queen)));
    assert_eq!(round.dealer_value, 17);
    let hand = &round.boxes[0][0];
    assert!(!hand.can_split);
    assert!(!hand.can_double);
}

#[test]
fn spectators_see_the_hole_card_only_after_resolution() {
    let (mut engine, mut m) = started(GameMode::Classic, pair_shoe());
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();

    let v = project_view(&m, Seat::Two, true);
    assert!(!v.is_my_turn);
    let round = v.turn.as_ref().unwrap().round.as_ref().unwrap();
    assert_eq!(round.dealer_cards[1], CardView::Hidden);

    engine.player_action(&mut m, Seat::One, A::Stand).unwrap();
    assert_eq!(m.phase(), Phase::RoundResult);
    let v = project_view(&m, Seat::Two, true);
    let round = v.turn.as_ref().unwrap().round.as_ref().unwrap();
    assert!(round.hole_card_visible);
    assert_eq!(round.dealer_value, 17);
}

#[test]
fn projection_is_pure() {
    let (mut engine, mut m) = started(GameMode::Classic, pair_shoe());
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();
    let snapshot = m.clone();
    let a = project_view(&m, Seat::One, false);
    engine.time().advance(Duration::seconds(20));
    let b = project_view(&m, Seat::One, false);
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
    assert_eq!(m, snapshot);
}

#[test]
fn decision_deadline_follows_the_clock() {
    let (mut engine, mut m) = started(GameMode::Classic, pair_shoe());
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();
    let v = project_view(&m, Seat::One, false);
    let d = v.decision.unwrap();
    assert_eq!(d.kind, DecisionKind::PlayerAction);
    assert_eq!(d.decider, Some(Seat::One));
    assert_eq!(d.deadline - d.started_at, Duration::seconds(30));
}

#[test]
fn shoe_order_never_leaks() {
    let (mut engine, mut m) = started(GameMode::Classic, pair_shoe());
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();
    let json = serde_json::to_value(project_view(&m, Seat::Two, false)).unwrap();
    let turn = json.get("turn").unwrap();
    assert!(turn.get("deck").is_none());
    assert!(json.get("opener").unwrap().get("draw_deck").is_none());
}

#[test]
fn wild_prompt_is_only_for_the_acting_player() {
    let shoe = vec![c(R::Nine), wild(), c(R::Six), c(R::Ten)];
    let (mut engine, mut m) = started(GameMode::Wild, shoe);
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();
    let mine = project_view(&m, Seat::One, false);
    let theirs = project_view(&m, Seat::Two, false);
    let pending = |v: &duel21_engine::view::MatchView| {
        v.turn.as_ref().unwrap().round.as_ref().unwrap().boxes[0][0].pending_wilds
    };
    assert_eq!(pending(&mine), 1);
    assert_eq!(pending(&theirs), 0);
}

#[test]
fn bank_draws_stay_visible_while_the_hole_card_is_hidden() {
    let shoe = vec![
        c(R::Ten),
        c(R::Eight),
        cs(R::Five, S::Clubs),
        c(R::Six),
        c(R::Two),
    ];
    let (mut engine, mut m) = started(GameMode::InteractiveWild, shoe);
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();
    engine.player_action(&mut m, Seat::One, A::Stand).unwrap();
    assert_eq!(m.phase(), Phase::DealerTurn);
    engine
        .dealer_action(&mut m, Seat::Two, duel21_engine::rules::DealerAction::Hit)
        .unwrap();
    assert_eq!(m.phase(), Phase::DealerTurn);

    for view in [project_view(&m, Seat::One, false), project_view(&m, Seat::Two, true)] {
        let round = view.turn.as_ref().unwrap().round.as_ref().unwrap();
        assert_eq!(
            round.dealer_cards,
            vec![
                CardView::Shown(cs(R::Five, S::Clubs)),
                CardView::Hidden,
                CardView::Shown(c(R::Two)),
            ]
        );
        assert_eq!(round.dealer_value, 7);
    }

    let bank = project_view(&m, Seat::Two, false);
    let round = bank.turn.as_ref().unwrap().round.as_ref().unwrap();
    assert!(round.dealer_cards.iter().all(|c| matches!(c, CardView::Shown(_))));
    assert_eq!(round.dealer_value, 13);
}

#[test]
fn only_the_acting_player_sees_the_current_hand_marker() {
    let (mut engine, mut m) = started(GameMode::Classic, pair_shoe());
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();

    let hand_of = |viewer, spectator| {
        let v = project_view(&m, viewer, spectator);
        let round = v.turn.unwrap().round.unwrap();
        assert_eq!(round.cursor.box_index, 0);
        round.boxes[0][0].is_current
    };
    assert!(hand_of(Seat::One, false));
    assert!(!hand_of(Seat::Two, false));
    assert!(!hand_of(Seat::One, true));
}
