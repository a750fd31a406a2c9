//! Shared types for the STAKELINE ledger.
//!
//! These types form the data model used across all modules: the bet
//! record itself, its settlement outcome, and the read model handed to
//! the presentation layer after every command.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::ledger;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Opaque, immutable identifier assigned to a bet when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BetId(Uuid);

impl BetId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Settlement state of a bet.
///
/// The cashout amount lives on the `CashedOut` variant only, so a record
/// can never carry a cashout value alongside any other outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Pending,
    Won,
    Lost,
    CashedOut { amount: Decimal },
}

impl Outcome {
    /// The literal cashout value, present only for `CashedOut`.
    pub fn cashout_amount(&self) -> Option<Decimal> {
        match self {
            Outcome::CashedOut { amount } => Some(*amount),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pending => write!(f, "PENDING"),
            Outcome::Won => write!(f, "WON"),
            Outcome::Lost => write!(f, "LOST"),
            Outcome::CashedOut { amount } => write!(f, "CASHED OUT ({:.2})", amount),
        }
    }
}

/// A terminal outcome that a settle command can move a pending bet into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Won,
    Lost,
    CashedOut(Decimal),
}

impl From<Settlement> for Outcome {
    fn from(settlement: Settlement) -> Self {
        match settlement {
            Settlement::Won => Outcome::Won,
            Settlement::Lost => Outcome::Lost,
            Settlement::CashedOut(amount) => Outcome::CashedOut { amount },
        }
    }
}

// ---------------------------------------------------------------------------
// Bet record
// ---------------------------------------------------------------------------

/// A single wager tracked by the ledger.
///
/// The signed contribution to the balance is never stored; it is always
/// derived from `(outcome, stake, odds)` through [`ledger::value_of`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetRecord {
    id: BetId,
    stake: Decimal,
    odds: Decimal,
    outcome: Outcome,
    placed_at: DateTime<Utc>,
}

impl BetRecord {
    /// A new pending bet with a freshly assigned id.
    pub fn new(stake: Decimal, odds: Decimal) -> Self {
        Self::with_outcome(stake, odds, Outcome::Pending)
    }

    /// A new bet that starts out in the given outcome.
    pub fn with_outcome(stake: Decimal, odds: Decimal, outcome: Outcome) -> Self {
        Self {
            id: BetId::new(),
            stake,
            odds,
            outcome,
            placed_at: Utc::now(),
        }
    }

    pub fn id(&self) -> BetId {
        self.id
    }

    pub fn stake(&self) -> Decimal {
        self.stake
    }

    pub fn odds(&self) -> Decimal {
        self.odds
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    pub fn cashout_amount(&self) -> Option<Decimal> {
        self.outcome.cashout_amount()
    }

    /// Contribution of this bet to the running balance.
    pub fn signed_value(&self) -> Decimal {
        ledger::value_of(self)
    }

    pub(crate) fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }
}

impl fmt::Display for BetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stake={:.2} @ {:.2} | {} | value={:.2} [{}]",
            self.stake,
            self.odds,
            self.outcome,
            self.signed_value(),
            self.id,
        )
    }
}

// ---------------------------------------------------------------------------
// Read model
// ---------------------------------------------------------------------------

/// A bet as the presentation layer sees it: flattened, with its derived value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetView {
    pub id: BetId,
    pub stake: Decimal,
    pub odds: Decimal,
    pub outcome: Outcome,
    pub cashout_amount: Option<Decimal>,
    pub signed_value: Decimal,
    pub placed_at: DateTime<Utc>,
}

impl From<&BetRecord> for BetView {
    fn from(bet: &BetRecord) -> Self {
        Self {
            id: bet.id(),
            stake: bet.stake(),
            odds: bet.odds(),
            outcome: bet.outcome(),
            cashout_amount: bet.cashout_amount(),
            signed_value: bet.signed_value(),
            placed_at: bet.placed_at(),
        }
    }
}

/// Aggregate counts over the bet list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountSummary {
    pub total_bets: usize,
    pub pending: usize,
    pub won: usize,
    pub lost: usize,
    pub cashed_out: usize,
    /// `current_balance - base_balance`.
    pub profit: Decimal,
}

impl AccountSummary {
    pub fn from_bets(bets: &[BetRecord], profit: Decimal) -> Self {
        let mut summary = Self {
            total_bets: bets.len(),
            profit,
            ..Default::default()
        };
        for bet in bets {
            match bet.outcome() {
                Outcome::Pending => summary.pending += 1,
                Outcome::Won => summary.won += 1,
                Outcome::Lost => summary.lost += 1,
                Outcome::CashedOut { .. } => summary.cashed_out += 1,
            }
        }
        summary
    }
}

/// Everything the presentation layer renders after a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSnapshot {
    pub current_balance: Decimal,
    pub base_balance: Decimal,
    pub history: Vec<Decimal>,
    pub bets: Vec<BetView>,
    pub summary: AccountSummary,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
