//! Ledger engine — signed bet values and cumulative balance history.
//!
//! Pure functions only. Computing one bet's contribution is kept apart
//! from folding contributions into a running total, so outcome policy can
//! change without touching the accumulation.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AccountError, AMOUNT_TOO_LARGE};
use crate::types::{BetRecord, Outcome};

// ---------------------------------------------------------------------------
// Accumulation order
// ---------------------------------------------------------------------------

/// Order in which the display list (newest first) is folded into history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccumulationOrder {
    /// Fold in display order, most recently added bet first.
    #[default]
    NewestFirst,
    /// Fold in insertion order, oldest bet first.
    OldestFirst,
}

impl AccumulationOrder {
    /// Arrange a newest-first display list into fold order.
    pub fn arrange<'a>(&self, display: &'a [BetRecord]) -> Vec<&'a BetRecord> {
        match self {
            AccumulationOrder::NewestFirst => display.iter().collect(),
            AccumulationOrder::OldestFirst => display.iter().rev().collect(),
        }
    }
}

impl std::fmt::Display for AccumulationOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccumulationOrder::NewestFirst => write!(f, "newest_first"),
            AccumulationOrder::OldestFirst => write!(f, "oldest_first"),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Signed contribution of a bet to the balance.
///
/// | outcome     | value                 |
/// |-------------|-----------------------|
/// | Pending     | 0                     |
/// | Won         | stake × odds          |
/// | Lost        | −stake                |
/// | CashedOut   | the entered amount    |
///
/// A `Won` value beyond the `Decimal` range saturates. The account never
/// holds such a bet, since [`recompute_history`] rejects it.
pub fn value_of(bet: &BetRecord) -> Decimal {
    match bet.outcome() {
        Outcome::Pending => Decimal::ZERO,
        Outcome::Won => bet.stake().saturating_mul(bet.odds()),
        Outcome::Lost => -bet.stake(),
        Outcome::CashedOut { amount } => amount,
    }
}

/// Like [`value_of`], but `None` when the value does not fit in a `Decimal`.
pub fn checked_value_of(bet: &BetRecord) -> Option<Decimal> {
    match bet.outcome() {
        Outcome::Won => bet.stake().checked_mul(bet.odds()),
        _ => Some(value_of(bet)),
    }
}

/// Running balance starting at `base`, folding bets in the order given.
///
/// Returns `bets.len() + 1` points, or a validation error when a value or
/// running total leaves the `Decimal` range.
pub fn recompute_history<'a, I>(base: Decimal, bets: I) -> Result<Vec<Decimal>, AccountError>
where
    I: IntoIterator<Item = &'a BetRecord>,
{
    let bets = bets.into_iter();
    let mut history = Vec::with_capacity(bets.size_hint().0 + 1);
    history.push(base);

    let mut running = base;
    for bet in bets {
        running = checked_value_of(bet)
            .and_then(|value| running.checked_add(value))
            .ok_or_else(|| AccountError::validation(AMOUNT_TOO_LARGE))?;
        history.push(running);
    }
    Ok(history)
}

/// Arrange a newest-first display list by `order`, then fold it.
pub fn recompute_history_with(
    base: Decimal,
    display: &[BetRecord],
    order: AccumulationOrder,
) -> Result<Vec<Decimal>, AccountError> {
    recompute_history(base, order.arrange(display))
}

/// Last point of a history, if any.
pub fn current_balance(history: &[Decimal]) -> Option<Decimal> {
    history.last().copied()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
