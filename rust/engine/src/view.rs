//! Role-scoped snapshot of a match for one participant or spectator.
//!
//! [`project_view`] is a pure function of the aggregate: it reads no clock and keeps no
//! state, so projecting an unchanged match twice gives identical views. The shoe and
//! the opener draw deck are never exposed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::clock::DecisionKind;
use crate::game::{GameMode, Match, MatchResult, Opener, Phase, Seat, TurnResult, TurnSlot};
use crate::hand::{hand_value, unresolved_wild_count, Hand, HandResult, HandStatus};
use crate::round::{Cursor, InsuranceOffer, Round};
use crate::rules::{check_double, check_split};
use crate::turn::Turn;

/// Position of the dealer's face-down card.
const HOLE_CARD: usize = 1;

/// A dealer card as the viewer may see it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "card", rename_all = "snake_case")]
pub enum CardView {
    Shown(Card),
    Hidden,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandView {
    pub cards: Vec<Card>,
    pub bet: u32,
    pub status: HandStatus,
    pub result: Option<HandResult>,
    pub value: u32,
    pub is_split: bool,
    pub is_doubled: bool,
    /// Hand under the cursor, shown only to the acting player while deciding it.
    /// Other viewers follow [`RoundView::cursor`].
    pub is_current: bool,
    pub can_split: bool,
    pub can_double: bool,
    /// Wild values the viewer must assign now
    pub pending_wilds: usize,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundView {
    pub boxes: Vec<Vec<HandView>>,
    pub dealer_cards: Vec<CardView>,
    /// Full dealer total once visible, otherwise the up-card's value
    pub dealer_value: u32,
    pub hole_card_visible: bool,
    /// Dealer wild values the viewer must assign now
    pub dealer_pending_wilds: usize,
    pub cursor: Cursor,
    pub insurance_offered: bool,
    pub insurance: Vec<InsuranceOffer>,
    pub total_initial_bet: u32,
    pub resolved: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TurnView {
    pub index: usize,
    pub acting_player: Seat,
    pub acting_bank: Seat,
    pub chips: u32,
    pub starting_chips: u32,
    pub rounds_played: u32,
    pub cards_dealt: usize,
    pub cut_card_reached: bool,
    pub round: Option<RoundView>,
}

/// Pending decision and when it falls back to its default.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct DecisionView {
    pub kind: DecisionKind,
    pub decider: Option<Seat>,
    pub started_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct OpenerView {
    pub draws: Vec<crate::game::DrawPair>,
    pub winner: Option<Seat>,
}

impl From<&Opener> for OpenerView {
    fn from(o: &Opener) -> Self {
        Self {
            draws: o.draws.clone(),
            winner: o.winner,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub viewer: Seat,
    pub spectator: bool,
    pub phase: Phase,
    pub mode: GameMode,
    pub stake: u32,
    pub extended: bool,
    pub min_bet: u32,
    pub total_turns: usize,
    pub current_turn: usize,
    pub is_my_turn: bool,
    pub i_am_dealer: bool,
    pub i_am_player: bool,
    pub opener: OpenerView,
    pub chooser: Option<Seat>,
    pub turns: Vec<TurnSlot>,
    pub results: Vec<TurnResult>,
    pub turn: Option<TurnView>,
    pub decision: Option<DecisionView>,
    pub match_over: bool,
    pub result: Option<MatchResult>,
}

/// Projects `m` for `viewer`. Spectators get no decision rights and see the hole card
/// only once the round is resolved.
pub fn project_view(m: &Match, viewer: Seat, spectator: bool) -> MatchView {
    let slot = m.current_slot().filter(|_| m.turn.is_some());
    let participant = !spectator;
    let is_my_turn = participant && m.decider() == Some(viewer);
    let i_am_dealer = slot.is_some_and(|s| s.acting_bank == viewer);
    let i_am_player = slot.is_some_and(|s| s.acting_player == viewer);

    let decision = m.clock.kind().and_then(|kind| {
        Some(DecisionView {
            kind,
            decider: m.decider(),
            started_at: m.clock.started_at()?,
            deadline: m.clock.deadline(&m.settings.clock)?,
        })
    });

    let ctx = Ctx {
        phase: m.phase,
        acting: participant && i_am_player,
        banking: participant && i_am_dealer,
    };

    MatchView {
        viewer,
        spectator,
        phase: m.phase,
        mode: m.mode(),
        stake: m.stake(),
        extended: m.settings.extended,
        min_bet: m.settings.min_bet,
        total_turns: m.total_turns(),
        current_turn: m.current_turn,
        is_my_turn,
        i_am_dealer,
        i_am_player,
        opener: OpenerView::from(&m.opener),
        chooser: m.chooser,
        turns: m.turns.clone(),
        results: m.results.clone(),
        turn: m.turn.as_ref().map(|t| turn_view(t, m.current_turn, &ctx)),
        decision,
        match_over: m.match_over,
        result: m.result,
    }
}

struct Ctx {
    phase: Phase,
    /// Viewer is the participant playing the boxes
    acting: bool,
    /// Viewer is the participant holding the dealer hand
    banking: bool,
}

fn turn_view(turn: &Turn, index: usize, ctx: &Ctx) -> TurnView {
    TurnView {
        index,
        acting_player: turn.acting_player,
        acting_bank: turn.acting_bank,
        chips: turn.chips(),
        starting_chips: turn.starting_chips,
        rounds_played: turn.rounds_played,
        cards_dealt: turn.cards_dealt(),
        cut_card_reached: turn.cut_card_reached,
        round: turn.round.as_ref().map(|r| round_view(r, turn.chips(), ctx)),
    }
}

fn round_view(round: &Round, chips: u32, ctx: &Ctx) -> RoundView {
    let visible = round.resolved || ctx.banking;
    let (dealer_cards, dealer_value) = if visible {
        (
            round.dealer_cards.iter().copied().map(CardView::Shown).collect(),
            hand_value(&round.dealer_cards),
        )
    } else {
        let cards = round
            .dealer_cards
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == HOLE_CARD {
                    CardView::Hidden
                } else {
                    CardView::Shown(*c)
                }
            })
            .collect();
        let shown: Vec<Card> = round
            .dealer_cards
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != HOLE_CARD)
            .map(|(_, c)| *c)
            .collect();
        (cards, hand_value(&shown))
    };
    let dealer_pending_wilds = if ctx.banking && ctx.phase == Phase::DealerWildChoice {
        unresolved_wild_count(&round.dealer_cards)
    } else {
        0
    };

    let boxes = round
        .boxes
        .iter()
        .enumerate()
        .map(|(b, bx)| {
            bx.hands
                .iter()
                .enumerate()
                .map(|(h, hand)| {
                    let at = Cursor {
                        box_index: b,
                        hand_index: h,
                    };
                    hand_view(hand, at == round.cursor && !round.resolved, chips, ctx)
                })
                .collect()
        })
        .collect();

    RoundView {
        boxes,
        dealer_cards,
        dealer_value,
        hole_card_visible: visible,
        dealer_pending_wilds,
        cursor: round.cursor,
        insurance_offered: round.insurance_offered,
        insurance: round.insurance.clone(),
        total_initial_bet: round.total_initial_bet,
        resolved: round.resolved,
    }
}

fn hand_view(hand: &Hand, at_cursor: bool, chips: u32, ctx: &Ctx) -> HandView {
    let deciding = at_cursor && ctx.acting;
    let playing = deciding && ctx.phase == Phase::PlayerTurn;
    HandView {
        cards: hand.cards().to_vec(),
        bet: hand.bet,
        status: hand.status,
        result: hand.result,
        value: hand.value(),
        is_split: hand.is_split,
        is_doubled: hand.is_doubled,
        is_current: deciding && matches!(ctx.phase, Phase::PlayerTurn | Phase::WildChoice),
        can_split: playing && check_split(hand, chips).is_ok(),
        can_double: playing && check_double(hand, chips).is_ok(),
        pending_wilds: if deciding && ctx.phase == Phase::WildChoice {
            unresolved_wild_count(hand.cards())
        } else {
            0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_card_serializes_without_payload() {
        let json = serde_json::to_string(&CardView::Hidden).unwrap();
        assert_eq!(json, r#"{"kind":"hidden"}"#);
    }
}
