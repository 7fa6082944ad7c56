//! Round engine: dealing, insurance, the player's hands, the dealer hand and
//! settlement. Public entry points are methods on [`Engine`]; the state machine steps
//! they share live here as free functions over a draft [`Match`].

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::cards::{Card, Rank};
use crate::clock::TimeSource;
use crate::deck::Shuffler;
use crate::engine::Engine;
use crate::errors::EngineError;
use crate::game::{Match, Phase, Seat};
use crate::hand::{
    auto_resolve_wilds, hand_value, has_unresolved_wild, provisional_value, unresolved_wild_count,
    Hand, HandResult, HandStatus, BLACKJACK,
};
use crate::round::{BetBox, Round};
use crate::rules::{
    check_double, check_split, insurance_stake, settle_hand, split_flags, validate_bets,
    DealerAction, PlayerAction, DEALER_STANDS_ON, INSURANCE_RETURN_MULTIPLIER,
};

impl<S: Shuffler, T: TimeSource> Engine<S, T> {
    /// Opens one to three boxes and deals the round: two cards per box, then two for
    /// the dealer.
    pub fn place_bets(&mut self, m: &mut Match, actor: Seat, bets: &[u32]) -> Result<(), EngineError> {
        self.transact(m, "place bets", |_, m, now| {
            m.expect_phase(Phase::WaitingBets, "place bets")?;
            m.expect_decider(actor)?;
            place_bets(m, bets, now)
        })
    }

    /// One take/decline per box, in box order.
    pub fn handle_insurance(
        &mut self,
        m: &mut Match,
        actor: Seat,
        decisions: &[bool],
    ) -> Result<(), EngineError> {
        self.transact(m, "decide insurance", |_, m, now| {
            m.expect_phase(Phase::Insurance, "decide insurance")?;
            m.expect_decider(actor)?;
            decide_insurance(m, decisions, now)
        })
    }

    /// Applies a decision to the hand under the cursor.
    pub fn player_action(
        &mut self,
        m: &mut Match,
        actor: Seat,
        action: PlayerAction,
    ) -> Result<(), EngineError> {
        self.transact(m, "play hand", |_, m, now| {
            m.expect_phase(Phase::PlayerTurn, "play hand")?;
            m.expect_decider(actor)?;
            play_hand(m, action, now)
        })
    }

    /// Chooses values (1 = Ace .. 13 = King) for the current hand's pending wild
    /// cards, in card order.
    pub fn assign_wild_values(
        &mut self,
        m: &mut Match,
        actor: Seat,
        values: &[u8],
    ) -> Result<(), EngineError> {
        self.transact(m, "assign wild values", |_, m, now| {
            m.expect_phase(Phase::WildChoice, "assign wild values")?;
            m.expect_decider(actor)?;
            let ranks = parse_wild_values(values, unresolved_wild_count(current_hand(m)?.cards()))?;
            let hand = current_hand_mut(m)?;
            resolve_in_order(hand.cards_mut(), &ranks);
            after_wild_assignment(m, now)
        })
    }

    /// Acting bank's decision in interactive modes.
    pub fn dealer_action(
        &mut self,
        m: &mut Match,
        actor: Seat,
        action: DealerAction,
    ) -> Result<(), EngineError> {
        self.transact(m, "play dealer", |_, m, now| {
            m.expect_phase(Phase::DealerTurn, "play dealer")?;
            m.expect_decider(actor)?;
            match action {
                DealerAction::Hit => {
                    let turn = m.turn_mut()?;
                    let card = turn.draw()?;
                    turn.round_mut()?.dealer_cards.push(card);
                    debug!(card = ?card, "dealer hits");
                    dealer_next(m, now)
                }
                DealerAction::Stand => settle_round(m, now),
            }
        })
    }

    /// Acting bank's values for the dealer's pending wild cards.
    pub fn assign_dealer_wild_values(
        &mut self,
        m: &mut Match,
        actor: Seat,
        values: &[u8],
    ) -> Result<(), EngineError> {
        self.transact(m, "assign dealer wild values", |_, m, now| {
            m.expect_phase(Phase::DealerWildChoice, "assign dealer wild values")?;
            m.expect_decider(actor)?;
            let round = m.turn_mut()?.round_mut()?;
            let ranks = parse_wild_values(values, unresolved_wild_count(&round.dealer_cards))?;
            resolve_in_order(&mut round.dealer_cards, &ranks);
            dealer_next(m, now)
        })
    }
}

fn current_hand(m: &Match) -> Result<&Hand, EngineError> {
    m.active_turn()?
        .round()?
        .current_hand()
        .ok_or(EngineError::HandNotActive)
}

fn current_hand_mut(m: &mut Match) -> Result<&mut Hand, EngineError> {
    m.turn_mut()?
        .round_mut()?
        .current_hand_mut()
        .ok_or(EngineError::HandNotActive)
}

fn parse_wild_values(values: &[u8], expected: usize) -> Result<Vec<Rank>, EngineError> {
    if values.len() != expected {
        return Err(EngineError::WildValueCount {
            expected,
            actual: values.len(),
        });
    }
    values
        .iter()
        .map(|&v| Rank::from_choice(v).ok_or(EngineError::InvalidWildValue(v)))
        .collect()
}

fn resolve_in_order(cards: &mut [Card], ranks: &[Rank]) {
    let pending = cards.iter_mut().filter(|c| c.is_unresolved_wild());
    for (card, &rank) in pending.zip(ranks) {
        card.resolve(rank);
    }
}

/// Value the timeout default gives every pending wild card.
pub(crate) const DEFAULT_WILD_RANK: Rank = Rank::Ace;

pub(crate) fn resolve_all(cards: &mut [Card], rank: Rank) {
    for card in cards.iter_mut().filter(|c| c.is_unresolved_wild()) {
        card.resolve(rank);
    }
}

/// Two dealer cards that make 21 once pending wild cards are filled in.
fn dealer_has_natural(cards: &[Card]) -> bool {
    cards.len() == 2 && provisional_value(cards) == BLACKJACK
}

pub(crate) fn place_bets(m: &mut Match, amounts: &[u32], now: DateTime<Utc>) -> Result<(), EngineError> {
    let min_bet = m.settings.min_bet;
    let turn = m.turn_mut()?;
    let bets = validate_bets(amounts, turn.chips(), min_bet)?;
    let total: u32 = bets.iter().map(|b| b.amount()).sum();
    let mut boxes = Vec::with_capacity(bets.len());
    for bet in &bets {
        let first = turn.draw()?;
        let second = turn.draw()?;
        boxes.push(BetBox {
            hands: vec![Hand::dealt(first, second, bet.amount())],
        });
    }
    let dealer_cards = vec![turn.draw()?, turn.draw()?];
    let mut round = Round::new(boxes, dealer_cards, total);
    round.chips_before = turn.chips();
    turn.take_initial_bets(total)?;
    turn.round = Some(round);
    turn.rounds_played += 1;
    info!(
        boxes = bets.len(),
        total,
        chips = turn.chips(),
        round = turn.rounds_played,
        "round dealt"
    );
    open_round(m, now)
}

/// Peeks at the dealer hand right after the deal.
fn open_round(m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
    let round = m.turn_mut()?.round_mut()?;
    let up = *round.dealer_up_card().ok_or(EngineError::MissingRound)?;
    if up.rank == Rank::Ace || up.is_wild() {
        round.insurance_offered = true;
        for offer in &mut round.insurance {
            offer.offered = true;
        }
        m.enter(Phase::Insurance, now);
        return Ok(());
    }
    if up.rank.is_ten_valued() && dealer_has_natural(&round.dealer_cards) {
        return settle_against_dealer_natural(m, now);
    }
    begin_player_hands(m, now)
}

pub(crate) fn decide_insurance(
    m: &mut Match,
    decisions: &[bool],
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    let turn = m.turn_mut()?;
    let bets: Vec<u32> = turn
        .round()?
        .boxes
        .iter()
        .map(|b| b.hands.first().map_or(0, |h| h.bet))
        .collect();
    if decisions.len() != bets.len() {
        return Err(EngineError::InsuranceDecisionCount {
            expected: bets.len(),
            actual: decisions.len(),
        });
    }
    for (i, (&take, &bet)) in decisions.iter().zip(&bets).enumerate() {
        // later boxes get whatever the earlier ones left
        let amount = if take {
            insurance_stake(bet).min(turn.chips())
        } else {
            0
        };
        if amount > 0 {
            turn.escrow(amount)?;
        }
        if let Some(offer) = turn.round_mut()?.insurance.get_mut(i) {
            offer.decided = true;
            offer.taken = amount > 0;
            offer.amount = amount;
        }
    }

    let round = turn.round()?;
    if dealer_has_natural(&round.dealer_cards) {
        let winnings: u64 = round
            .insurance
            .iter()
            .filter(|o| o.taken)
            .map(|o| u64::from(o.amount) * u64::from(INSURANCE_RETURN_MULTIPLIER))
            .sum();
        turn.pay(winnings)?;
        debug!(winnings, "insurance paid");
        settle_against_dealer_natural(m, now)
    } else {
        debug!("dealer has no natural, insurance lost");
        begin_player_hands(m, now)
    }
}

/// Dealer revealed a natural before any hand was played: naturals push, everything
/// else loses. Pending wild cards on both sides take their best value first.
fn settle_against_dealer_natural(m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
    let turn = m.turn_mut()?;
    let round = turn.round_mut()?;
    auto_resolve_wilds(&mut round.dealer_cards);
    let mut refunded = 0u64;
    for hand in round.hands_mut() {
        auto_resolve_wilds(hand.cards_mut());
        if hand.is_natural() {
            hand.status = HandStatus::Push;
            hand.result = Some(HandResult::Push);
            refunded += u64::from(hand.bet);
        } else {
            hand.status = HandStatus::Lose;
            hand.result = Some(HandResult::Lose);
        }
    }
    round.resolved = true;
    turn.pay(refunded)?;
    info!(refunded, chips = turn.chips(), "dealer natural");
    m.enter(Phase::RoundResult, now);
    Ok(())
}

fn begin_player_hands(m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
    let round = m.turn_mut()?.round_mut()?;
    for hand in round.hands_mut() {
        if hand.is_natural() {
            hand.status = HandStatus::Blackjack;
        }
    }
    advance_cursor(m, now)
}

enum Next {
    Wild,
    Decide,
    Dealer,
}

/// Moves the cursor to the next hand that needs a decision, finishing any hand that
/// already totals 21 on the way. Hands to the dealer when none remain.
pub(crate) fn advance_cursor(m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
    let next = {
        let round = m.turn_mut()?.round_mut()?;
        loop {
            if round.seek_active().is_none() {
                break Next::Dealer;
            }
            let hand = round.current_hand_mut().ok_or(EngineError::HandNotActive)?;
            if hand.has_unresolved_wild() {
                break Next::Wild;
            }
            if hand.value() == BLACKJACK {
                hand.status = if hand.is_natural() {
                    HandStatus::Blackjack
                } else {
                    HandStatus::Stand
                };
                continue;
            }
            break Next::Decide;
        }
    };
    match next {
        Next::Wild => {
            m.enter(Phase::WildChoice, now);
            Ok(())
        }
        Next::Decide => {
            m.enter(Phase::PlayerTurn, now);
            Ok(())
        }
        Next::Dealer => play_dealer(m, now),
    }
}

/// Re-examines the current hand after it received a card.
fn after_draw(m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
    let hand = current_hand_mut(m)?;
    if hand.has_unresolved_wild() {
        m.enter(Phase::WildChoice, now);
        return Ok(());
    }
    let value = hand.value();
    if value > BLACKJACK {
        hand.status = HandStatus::Bust;
    } else if value == BLACKJACK || hand.is_doubled {
        hand.status = HandStatus::Stand;
    } else {
        m.enter(Phase::PlayerTurn, now);
        return Ok(());
    }
    advance_cursor(m, now)
}

/// Classifies the current hand once its wild cards carry values.
pub(crate) fn after_wild_assignment(m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
    let hand = current_hand_mut(m)?;
    let value = hand.value();
    if hand.is_natural() {
        hand.status = HandStatus::Blackjack;
    } else if value > BLACKJACK {
        hand.status = HandStatus::Bust;
    } else if value == BLACKJACK || hand.is_doubled {
        hand.status = HandStatus::Stand;
    } else {
        m.enter(Phase::PlayerTurn, now);
        return Ok(());
    }
    advance_cursor(m, now)
}

pub(crate) fn play_hand(m: &mut Match, action: PlayerAction, now: DateTime<Utc>) -> Result<(), EngineError> {
    let chips = m.active_turn()?.chips();
    let hand = current_hand(m)?;
    if hand.status != HandStatus::Active {
        return Err(EngineError::HandNotActive);
    }
    match action {
        PlayerAction::Hit => {
            let turn = m.turn_mut()?;
            let card = turn.draw()?;
            current_hand_mut(m)?.push(card);
            after_draw(m, now)
        }
        PlayerAction::Stand => {
            current_hand_mut(m)?.status = HandStatus::Stand;
            advance_cursor(m, now)
        }
        PlayerAction::Double => {
            check_double(hand, chips)?;
            let bet = hand.bet;
            let turn = m.turn_mut()?;
            turn.escrow(bet)?;
            let card = turn.draw()?;
            let hand = current_hand_mut(m)?;
            hand.bet += bet;
            hand.is_doubled = true;
            hand.push(card);
            after_draw(m, now)
        }
        PlayerAction::Split => {
            check_split(hand, chips)?;
            split_current(m)?;
            advance_cursor(m, now)
        }
    }
}

/// Splits the pair under the cursor into two hands of the same bet. Each half
/// receives one new card; a split wild card gives up its chosen value.
fn split_current(m: &mut Match) -> Result<(), EngineError> {
    let (aces, wild) = split_flags(current_hand(m)?);
    let turn = m.turn_mut()?;
    let bet = turn
        .round()?
        .current_hand()
        .ok_or(EngineError::HandNotActive)?
        .bet;
    turn.escrow(bet)?;
    let for_first = turn.draw()?;
    let for_second = turn.draw()?;
    let round = turn.round_mut()?;
    let at = round.cursor;
    let hand = round.hand_mut(at).ok_or(EngineError::HandNotActive)?;
    let mut moved = hand.split_off_second(for_first);
    if moved.is_wild() {
        moved.chosen = None;
    }
    if let Some(kept) = hand.cards_mut().first_mut().filter(|c| c.is_wild()) {
        kept.chosen = None;
    }
    let mut second = Hand::dealt(moved, for_second, bet);
    for h in [&mut *hand, &mut second] {
        h.is_split = true;
        h.from_split_aces = aces;
        h.from_split_wild = wild;
    }
    round.boxes[at.box_index].hands.insert(at.hand_index + 1, second);
    debug!(box_index = at.box_index, hand = at.hand_index, "hand split");
    Ok(())
}

/// Starts the dealer hand once every player hand is finished.
fn play_dealer(m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
    let interactive = m.mode().dealer_is_interactive();
    let turn = m.turn_mut()?;
    let round = turn.round_mut()?;
    if !round.any_standing() {
        auto_resolve_wilds(&mut round.dealer_cards);
        return settle_round(m, now);
    }
    if interactive {
        return dealer_next(m, now);
    }
    loop {
        let round = turn.round_mut()?;
        auto_resolve_wilds(&mut round.dealer_cards);
        if hand_value(&round.dealer_cards) >= DEALER_STANDS_ON {
            break;
        }
        let card = turn.draw()?;
        turn.round_mut()?.dealer_cards.push(card);
    }
    settle_round(m, now)
}

/// Next step of an interactive dealer hand.
pub(crate) fn dealer_next(m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
    let cards = &m.active_turn()?.round()?.dealer_cards;
    if has_unresolved_wild(cards) {
        m.enter(Phase::DealerWildChoice, now);
        Ok(())
    } else if hand_value(cards) >= BLACKJACK {
        settle_round(m, now)
    } else {
        m.enter(Phase::DealerTurn, now);
        Ok(())
    }
}

/// Pays every hand against the dealer's final cards.
pub(crate) fn settle_round(m: &mut Match, now: DateTime<Utc>) -> Result<(), EngineError> {
    let turn = m.turn_mut()?;
    let round = turn.round_mut()?;
    let dealer = round.dealer_cards.clone();
    let mut returned = 0u64;
    for hand in round.hands_mut() {
        let (result, payout) = settle_hand(hand, &dealer);
        hand.result = Some(result);
        returned += payout;
    }
    round.resolved = true;
    turn.pay(returned)?;
    info!(
        dealer = hand_value(&dealer),
        returned,
        chips = turn.chips(),
        "round settled"
    );
    m.enter(Phase::RoundResult, now);
    Ok(())
}
