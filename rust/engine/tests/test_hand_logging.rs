mod common;

use std::fs;
use std::path::PathBuf;

use common::*;
use duel21_engine::cards::Rank as R;
use duel21_engine::game::{GameMode, Seat};
use duel21_engine::logger::{HistoryEvent, MatchLogger, MatchRecord, RoundRecord};
use duel21_engine::rules::PlayerAction;

fn tmp_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("target");
    p.push(format!("{}_{}.jsonl", name, std::process::id()));
    p
}

fn resolved_round() -> RoundRecord {
    let shoe = vec![c(R::Ten), c(R::Nine), c(R::Ten), c(R::Seven)];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();
    engine
        .player_action(&mut m, Seat::One, PlayerAction::Stand)
        .unwrap();
    RoundRecord::capture(&m, "20250102-000001").unwrap()
}

#[test]
fn writes_jsonl_with_lf_only() {
    let path = tmp_path("duellog");
    let mut logger = MatchLogger::create(&path).expect("create logger");
    logger
        .write(&HistoryEvent::Round(resolved_round()))
        .expect("write");
    logger
        .write(&HistoryEvent::Round(resolved_round()))
        .expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
    assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 2);
}

#[test]
fn sequential_ids_increment() {
    let mut logger = MatchLogger::detached("20251231");
    assert_eq!(logger.next_id(), "20251231-000001");
    assert_eq!(logger.next_id(), "20251231-000002");
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let path = tmp_path("duellog_ts");
    let mut logger = MatchLogger::create(&path).expect("create logger");
    let rec = resolved_round();
    assert!(rec.ts.is_none());
    logger.write(&HistoryEvent::Round(rec.clone())).expect("write");
    let line = String::from_utf8(fs::read(&path).unwrap()).unwrap();
    let parsed: HistoryEvent = serde_json::from_str(line.trim_end()).unwrap();
    match parsed {
        HistoryEvent::Round(r) => assert!(r.ts.is_some(), "ts should be injected"),
        other => panic!("unexpected event {other:?}"),
    }

    let preset = "2030-01-01T00:00:00Z".to_string();
    let rec2 = RoundRecord {
        ts: Some(preset.clone()),
        ..rec
    };
    logger.write(&HistoryEvent::Round(rec2)).expect("write2");
    let content = String::from_utf8(fs::read(&path).unwrap()).unwrap();
    assert!(content.contains(&preset), "preset ts must be kept");
}

#[test]
fn round_record_describes_the_resolved_round() {
    let rec = resolved_round();
    assert_eq!(rec.turn_index, 0);
    assert_eq!(rec.round, 1);
    assert_eq!(rec.acting_player, Seat::One);
    assert_eq!(rec.acting_bank, Seat::Two);
    assert_eq!(rec.boxes.len(), 1);
    assert_eq!(rec.boxes[0][0].value, 19);
    assert_eq!(rec.dealer_value, 17);
    assert_eq!(rec.chips_before, 100);
    assert_eq!(rec.escrowed, 10);
    assert_eq!(rec.paid_out, 20);
    assert_eq!(rec.chips_after, 110);
    assert!(rec.conserves_chips());
}

#[test]
fn unresolved_round_is_not_captured() {
    let shoe = vec![c(R::Ten), c(R::Nine), c(R::Ten), c(R::Seven)];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    assert!(RoundRecord::capture(&m, "x").is_none());
    engine.place_bets(&mut m, Seat::One, &[10]).unwrap();
    assert!(RoundRecord::capture(&m, "x").is_none());
}

#[test]
fn events_are_tagged() {
    let shoe = vec![c(R::Ten), c(R::Nine), c(R::Ten), c(R::Seven)];
    let (mut engine, mut m) = started(GameMode::Classic, shoe);
    engine.forfeit(&mut m, Seat::Two).unwrap();
    let event = HistoryEvent::Match(MatchRecord {
        match_id: "20250102-000002".into(),
        mode: m.mode(),
        extended: false,
        seed: Some(3),
        settlement: m.settlement().unwrap(),
        ts: None,
        meta: None,
    });
    let v = serde_json::to_value(&event).unwrap();
    assert_eq!(v["event"], "match");
    assert_eq!(v["settlement"]["reason"], "forfeit");
    let back: HistoryEvent = serde_json::from_value(v).unwrap();
    assert_eq!(back, event);

    let v = serde_json::to_value(HistoryEvent::Round(resolved_round())).unwrap();
    assert_eq!(v["event"], "round");
}
