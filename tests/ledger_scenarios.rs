//! End-to-end scenarios against the public account API.
//!
//! Walks the same sequence a user would drive from the dashboard: set a
//! base balance, add and settle bets, delete, reset.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use stakeline::account::AccountState;
use stakeline::error::AccountError;
use stakeline::input;
use stakeline::types::{BetId, Outcome, Settlement};

fn assert_consistent(state: &AccountState) {
    assert_eq!(state.history().len(), state.bets().len() + 1);
    assert_eq!(state.history()[0], state.base_balance());
    assert_eq!(Some(&state.current_balance()), state.history().last());
}

/// Builds the two-bet account: B (lost 5) displayed before A (won 20).
fn two_bet_account() -> (AccountState, BetId, BetId) {
    let mut state = AccountState::new();
    state.set_base_balance(dec!(100)).unwrap();
    let a = state.add_bet(dec!(10), dec!(2.0)).unwrap();
    state.settle_bet(a, Settlement::Won).unwrap();
    let b = state.add_bet(dec!(5), dec!(3.0)).unwrap();
    state.settle_bet(b, Settlement::Lost).unwrap();
    (state, a, b)
}

#[test]
fn scenario_walkthrough() {
    let mut state = AccountState::new();

    state.set_base_balance(dec!(100)).unwrap();
    assert_eq!(state.history(), &[dec!(100)]);

    let a = state.add_bet(dec!(10), dec!(2.0)).unwrap();
    assert_eq!(state.history(), &[dec!(100), dec!(100)]);
    assert_consistent(&state);

    state.settle_bet(a, Settlement::Won).unwrap();
    assert_eq!(state.bet(a).unwrap().signed_value(), dec!(20));
    assert_eq!(state.history(), &[dec!(100), dec!(120)]);
    assert_eq!(state.current_balance(), dec!(120));

    let b = state.add_bet(dec!(5), dec!(3.0)).unwrap();
    let order: Vec<BetId> = state.bets().iter().map(|bet| bet.id()).collect();
    assert_eq!(order, vec![b, a]);
    assert_eq!(state.history(), &[dec!(100), dec!(100), dec!(120)]);

    state.settle_bet(b, Settlement::Lost).unwrap();
    assert_eq!(state.bet(b).unwrap().signed_value(), dec!(-5));
    assert_eq!(state.history(), &[dec!(100), dec!(95), dec!(115)]);
    assert_eq!(state.current_balance(), dec!(115));
    assert_consistent(&state);
}

#[test]
fn delete_recomputes_history() {
    let (mut state, a, b) = two_bet_account();

    state.delete_bet(a).unwrap();

    assert_eq!(state.bets().len(), 1);
    assert_eq!(state.bets()[0].id(), b);
    assert_eq!(state.history(), &[dec!(100), dec!(95)]);
    assert_eq!(state.current_balance(), dec!(95));
}

#[test]
fn base_balance_reset_clears_bets() {
    let (mut state, _, _) = two_bet_account();

    state.set_base_balance(dec!(50)).unwrap();

    assert!(state.bets().is_empty());
    assert_eq!(state.history(), &[dec!(50)]);
    assert_eq!(state.current_balance(), dec!(50));
}

#[test]
fn reset_chart_preserves_configuration() {
    let (mut state, _, _) = two_bet_account();
    let before: Vec<(BetId, Decimal, Decimal)> = state
        .bets()
        .iter()
        .map(|bet| (bet.id(), bet.stake(), bet.odds()))
        .collect();

    state.reset_chart().unwrap();

    let after: Vec<(BetId, Decimal, Decimal)> = state
        .bets()
        .iter()
        .map(|bet| (bet.id(), bet.stake(), bet.odds()))
        .collect();
    assert_eq!(before, after);
    assert!(state.bets().iter().all(|bet| bet.outcome() == Outcome::Pending));
    assert!(state.bets().iter().all(|bet| bet.cashout_amount().is_none()));
    assert_eq!(state.history(), &[dec!(100)]);
    assert_eq!(state.current_balance(), dec!(100));

    // The next command refolds the whole list.
    state.add_bet(dec!(1), dec!(1)).unwrap();
    assert_consistent(&state);
    assert!(state.history().iter().all(|p| *p == dec!(100)));
}

#[test]
fn outcome_arithmetic() {
    let mut state = AccountState::new();
    state.set_base_balance(Decimal::ZERO).unwrap();

    let won = state.add_bet(dec!(10), dec!(2.5)).unwrap();
    let lost = state.add_bet(dec!(10), dec!(2.5)).unwrap();
    let cashed = state.add_bet(dec!(10), dec!(2.5)).unwrap();

    state.settle_bet(won, Settlement::Won).unwrap();
    state.settle_bet(lost, Settlement::Lost).unwrap();
    state.settle_bet(cashed, Settlement::CashedOut(dec!(7.5))).unwrap();

    assert_eq!(state.bet(won).unwrap().signed_value(), dec!(25));
    assert_eq!(state.bet(lost).unwrap().signed_value(), dec!(-10));
    assert_eq!(state.bet(cashed).unwrap().signed_value(), dec!(7.5));
}

#[test]
fn rejected_commands_leave_state_untouched() {
    let (mut state, a, _) = two_bet_account();
    let before = state.snapshot();

    let ghost = BetId::new();
    assert_eq!(state.delete_bet(ghost), Err(AccountError::NotFound(ghost)));
    assert_eq!(state.settle_bet(ghost, Settlement::Won), Err(AccountError::NotFound(ghost)));
    assert_eq!(state.settle_bet(a, Settlement::Lost), Err(AccountError::AlreadySettled(a)));
    assert!(state.add_bet(Decimal::ZERO, dec!(2)).is_err());

    assert_eq!(state.snapshot(), before);
}

#[test]
fn oversized_win_is_rejected_without_corrupting_state() {
    let mut state = AccountState::new();
    state.set_base_balance(dec!(100)).unwrap();

    let (stake, odds) =
        input::parse_bet_fields(Some("79228162514264337593543950335"), Some("2")).unwrap();
    let id = state.add_bet(stake, odds).unwrap();
    let before = state.snapshot();

    let err = state.settle_bet(id, Settlement::Won).unwrap_err();
    assert_eq!(err.user_message(), "Amount too large");
    assert_eq!(state.snapshot(), before);
    assert_consistent(&state);

    // Same bet can still be lost, which fits the range.
    state.settle_bet(id, Settlement::Lost).unwrap();
    assert_eq!(state.current_balance(), dec!(100) - stake);
    assert_consistent(&state);
}

#[test]
fn cashout_past_maximum_balance_is_rejected() {
    let mut state = AccountState::new();
    state.set_base_balance(Decimal::MAX).unwrap();
    let id = state.add_bet(dec!(1), dec!(2)).unwrap();
    let before = state.snapshot();

    assert!(matches!(
        state.settle_bet(id, Settlement::CashedOut(dec!(1))),
        Err(AccountError::Validation(_))
    ));
    assert_eq!(state.snapshot(), before);
}

#[test]
fn text_input_never_reaches_the_core_unparsed() {
    let mut state = AccountState::new();
    state.set_base_balance(dec!(100)).unwrap();

    let err = input::parse_bet_fields(Some("10"), None).unwrap_err();
    assert_eq!(err.user_message(), "Fill in odds and stake");
    assert!(input::parse_amount("initial balance", "abc").is_err());
    assert!(input::parse_settlement("cashout", Some("")).is_err());

    let (stake, odds) = input::parse_bet_fields(Some("10"), Some("1,5")).unwrap();
    let id = state.add_bet(stake, odds).unwrap();
    let settlement = input::parse_settlement("green", None).unwrap();
    state.settle_bet(id, settlement).unwrap();
    assert_eq!(state.current_balance(), dec!(115));
}
