use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::game::{GameMode, Match, Seat};
use crate::hand::{hand_value, HandResult, HandStatus};
use crate::settlement::SettlementRecord;

/// Final state of one hand in a resolved round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandSummary {
    pub cards: Vec<Card>,
    pub bet: u32,
    pub status: HandStatus,
    pub result: Option<HandResult>,
    pub value: u32,
}

/// A resolved round, written to the match history.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Match identifier (format: YYYYMMDD-NNNNNN)
    pub match_id: String,
    pub turn_index: usize,
    /// 1-based within the turn
    pub round: u32,
    pub acting_player: Seat,
    pub acting_bank: Seat,
    /// Hands grouped by box
    pub boxes: Vec<Vec<HandSummary>>,
    pub dealer_cards: Vec<Card>,
    pub dealer_value: u32,
    pub insurance_taken: u32,
    pub chips_before: u32,
    pub chips_after: u32,
    pub escrowed: u32,
    pub paid_out: u32,
    /// Timestamp when the round was recorded (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
}

impl RoundRecord {
    /// Captures the round of the current turn, if it has been resolved.
    pub fn capture(m: &Match, match_id: &str) -> Option<Self> {
        let turn = m.turn()?;
        let round = turn.round.as_ref().filter(|r| r.resolved)?;
        let chips_after = turn.chips();
        let boxes = round
            .boxes
            .iter()
            .map(|b| {
                b.hands
                    .iter()
                    .map(|h| HandSummary {
                        cards: h.cards().to_vec(),
                        bet: h.bet,
                        status: h.status,
                        result: h.result,
                        value: h.value(),
                    })
                    .collect()
            })
            .collect();
        Some(Self {
            match_id: match_id.to_string(),
            turn_index: m.current_turn_index(),
            round: turn.rounds_played,
            acting_player: turn.acting_player,
            acting_bank: turn.acting_bank,
            boxes,
            dealer_cards: round.dealer_cards.clone(),
            dealer_value: hand_value(&round.dealer_cards),
            insurance_taken: round.insurance.iter().map(|o| o.amount).sum(),
            chips_before: round.chips_before,
            chips_after,
            escrowed: round.escrowed,
            paid_out: round.paid_out,
            ts: None,
        })
    }

    /// `chips_after = chips_before - escrowed + paid_out`
    pub fn conserves_chips(&self) -> bool {
        u64::from(self.chips_after) + u64::from(self.escrowed)
            == u64::from(self.chips_before) + u64::from(self.paid_out)
    }
}

/// A finished match, written after its last round.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: String,
    pub mode: GameMode,
    pub extended: bool,
    /// RNG seed used for shuffling, when the match was simulated
    pub seed: Option<u64>,
    pub settlement: SettlementRecord,
    #[serde(default)]
    pub ts: Option<String>,
    /// Additional metadata (extensible JSON object)
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

/// One line of the JSONL match history.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HistoryEvent {
    Round(RoundRecord),
    Match(MatchRecord),
}

impl HistoryEvent {
    fn ts_mut(&mut self) -> &mut Option<String> {
        match self {
            HistoryEvent::Round(r) => &mut r.ts,
            HistoryEvent::Match(r) => &mut r.ts,
        }
    }
}

pub fn format_match_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

fn today() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

/// Appends history events as JSON lines.
pub struct MatchLogger {
    writer: Option<Box<dyn Write>>,
    date: String,
    seq: u32,
}

impl MatchLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                let _ = create_dir_all(parent);
            }
        }
        let f = File::create(path)?;
        Ok(Self::with_writer(BufWriter::new(f), &today()))
    }

    /// Logger over any sink, e.g. a compressing encoder.
    pub fn with_writer<W: Write + 'static>(writer: W, date: &str) -> Self {
        Self {
            writer: Some(Box::new(writer)),
            date: date.to_string(),
            seq: 0,
        }
    }

    /// Logger that only hands out ids.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_match_id(&self.date, self.seq)
    }

    pub fn write(&mut self, event: &HistoryEvent) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut ev = event.clone();
        let ts = ev.ts_mut();
        if ts.is_none() {
            *ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&ev).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
