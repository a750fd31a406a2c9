//! Account state — the single owner of the bet list and its derived history.
//!
//! Every command applies one targeted change to a copy of the bet list,
//! refolds it through the ledger, and adopts the copy only if the fold
//! succeeds. Reset is the exception: it restarts history at the base
//! balance without folding. A rejected command returns `Err` and leaves
//! the account untouched.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::AccountError;
use crate::ledger::{self, AccumulationOrder};
use crate::types::{
    AccountSnapshot, AccountSummary, BetId, BetRecord, BetView, Outcome, Settlement,
};

#[derive(Debug, Clone, Default)]
pub struct AccountState {
    base_balance: Decimal,
    /// Newest first.
    bets: Vec<BetRecord>,
    history: Vec<Decimal>,
    order: AccumulationOrder,
}

impl AccountState {
    /// An empty account: zero base, no bets, no history yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty account that folds history in the given order.
    pub fn with_order(order: AccumulationOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    // -- Read model ---------------------------------------------------------

    pub fn base_balance(&self) -> Decimal {
        self.base_balance
    }

    /// Last history point, or the base balance before any command ran.
    pub fn current_balance(&self) -> Decimal {
        ledger::current_balance(&self.history).unwrap_or(self.base_balance)
    }

    pub fn history(&self) -> &[Decimal] {
        &self.history
    }

    /// Bets in display order, most recently added first.
    pub fn bets(&self) -> &[BetRecord] {
        &self.bets
    }

    pub fn bet(&self, id: BetId) -> Option<&BetRecord> {
        self.bets.iter().find(|b| b.id() == id)
    }

    pub fn order(&self) -> AccumulationOrder {
        self.order
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        let current_balance = self.current_balance();
        AccountSnapshot {
            current_balance,
            base_balance: self.base_balance,
            history: self.history.clone(),
            bets: self.bets.iter().map(BetView::from).collect(),
            summary: AccountSummary::from_bets(&self.bets, current_balance - self.base_balance),
        }
    }

    // -- Commands -----------------------------------------------------------

    /// Start a fresh sequence at `amount`. Clears every bet.
    pub fn set_base_balance(&mut self, amount: Decimal) -> Result<(), AccountError> {
        let dropped = self.bets.len();
        self.commit(amount, Vec::new())?;

        info!(base = %amount, dropped_bets = dropped, "Base balance set");
        Ok(())
    }

    /// Record a new pending bet at the head of the list.
    pub fn add_bet(&mut self, stake: Decimal, odds: Decimal) -> Result<BetId, AccountError> {
        if stake <= Decimal::ZERO {
            warn!(%stake, "Rejected bet with non-positive stake");
            return Err(AccountError::validation("Stake must be greater than zero"));
        }

        let bet = BetRecord::new(stake, odds);
        let id = bet.id();
        let mut bets = Vec::with_capacity(self.bets.len() + 1);
        bets.push(bet);
        bets.extend(self.bets.iter().cloned());
        self.commit(self.base_balance, bets)?;

        info!(bet_id = %id, %stake, %odds, bets = self.bets.len(), "Bet added");
        Ok(id)
    }

    /// Remove a bet and refold the remaining list.
    pub fn delete_bet(&mut self, id: BetId) -> Result<(), AccountError> {
        let idx = self.position(id)?;
        let mut bets = self.bets.clone();
        let removed = bets.remove(idx);
        self.commit(self.base_balance, bets)?;

        info!(
            bet_id = %id,
            outcome = %removed.outcome(),
            balance = %self.current_balance(),
            "Bet deleted"
        );
        Ok(())
    }

    /// Move a pending bet into a terminal outcome.
    pub fn settle_bet(&mut self, id: BetId, settlement: Settlement) -> Result<(), AccountError> {
        let idx = self.position(id)?;
        let current = self.bets[idx].outcome();
        if !current.is_pending() {
            warn!(bet_id = %id, outcome = %current, "Rejected settle of a settled bet");
            return Err(AccountError::AlreadySettled(id));
        }

        let mut bets = self.bets.clone();
        bets[idx].set_outcome(Outcome::from(settlement));
        let value = bets[idx].signed_value();
        self.commit(self.base_balance, bets)?;

        info!(
            bet_id = %id,
            %value,
            balance = %self.current_balance(),
            "Bet settled"
        );
        Ok(())
    }

    /// Return every bet to pending and restart history at the base balance.
    /// Stakes, odds and ids are kept.
    ///
    /// History is the single point `[base]` until the next command refolds
    /// the list, so this is the one state where `history.len()` is not
    /// `bets.len() + 1`.
    pub fn reset_chart(&mut self) -> Result<(), AccountError> {
        for bet in &mut self.bets {
            bet.set_outcome(Outcome::Pending);
        }
        self.history = vec![self.base_balance];

        info!(base = %self.base_balance, bets = self.bets.len(), "Chart reset");
        Ok(())
    }

    // -- Internals ----------------------------------------------------------

    fn position(&self, id: BetId) -> Result<usize, AccountError> {
        self.bets.iter().position(|b| b.id() == id).ok_or_else(|| {
            warn!(bet_id = %id, "Bet not found");
            AccountError::NotFound(id)
        })
    }

    /// Fold a candidate list and adopt it only if the fold succeeds.
    fn commit(&mut self, base: Decimal, bets: Vec<BetRecord>) -> Result<(), AccountError> {
        let history = ledger::recompute_history_with(base, &bets, self.order).map_err(|err| {
            warn!(%base, bets = bets.len(), error = %err, "Rejected command, balance out of range");
            err
        })?;

        self.base_balance = base;
        self.bets = bets;
        self.history = history;
        debug!(points = self.history.len(), order = %self.order, "History recomputed");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
