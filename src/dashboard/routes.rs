//! Dashboard API route handlers.
//!
//! Read endpoints return JSON views of the account. Command endpoints take
//! the raw text the user typed, parse it through [`crate::input`], run the
//! command under the write lock and answer with a fresh snapshot.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::account::AccountState;
use crate::error::AccountError;
use crate::input;
use crate::ledger::AccumulationOrder;
use crate::types::{AccountSnapshot, BetId, BetView};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub account: RwLock<AccountState>,
    pub name: String,
    pub currency_symbol: String,
}

impl DashboardState {
    pub fn new(account: AccountState, name: impl Into<String>, currency_symbol: impl Into<String>) -> Self {
        Self {
            account: RwLock::new(account),
            name: name.into(),
            currency_symbol: currency_symbol.into(),
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A text field as submitted by a form. Numbers are accepted too and
/// treated as their textual form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Text(String),
    Number(serde_json::Number),
}

impl RawField {
    fn text(&self) -> String {
        match self {
            RawField::Text(s) => s.clone(),
            RawField::Number(n) => n.to_string(),
        }
    }
}

fn text(field: &Option<RawField>) -> Option<String> {
    field.as_ref().map(RawField::text)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BalanceRequest {
    #[serde(default)]
    pub amount: Option<RawField>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBetRequest {
    #[serde(default)]
    pub stake: Option<RawField>,
    #[serde(default)]
    pub odds: Option<RawField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettleRequest {
    pub outcome: String,
    #[serde(default)]
    pub cashout: Option<RawField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InfoResponse {
    pub name: String,
    pub currency_symbol: String,
    pub accumulation_order: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalancePoint {
    pub index: usize,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Rejection of a dashboard command.
#[derive(Debug)]
pub enum ApiError {
    Account(AccountError),
    UnknownId(String),
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        ApiError::Account(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Account(err @ AccountError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.user_message())
            }
            ApiError::Account(err @ AccountError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, err.user_message())
            }
            ApiError::Account(err @ AccountError::AlreadySettled(_)) => {
                (StatusCode::CONFLICT, err.user_message())
            }
            ApiError::UnknownId(raw) => (StatusCode::NOT_FOUND, format!("Bet not found: {raw}")),
        };
        debug!(status = status.as_u16(), error = %message, "Command rejected");
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

type CommandResult = Result<Json<AccountSnapshot>, ApiError>;

fn parse_id(raw: &str) -> Result<BetId, ApiError> {
    raw.parse().map_err(|_| ApiError::UnknownId(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

/// GET /api/account
pub async fn get_account(State(state): State<AppState>) -> Json<AccountSnapshot> {
    Json(state.account.read().await.snapshot())
}

/// GET /api/balance-history
pub async fn get_balance_history(State(state): State<AppState>) -> Json<Vec<BalancePoint>> {
    let account = state.account.read().await;
    let points = account
        .history()
        .iter()
        .enumerate()
        .map(|(index, balance)| BalancePoint { index, balance: *balance })
        .collect();
    Json(points)
}

/// GET /api/bets
pub async fn get_bets(State(state): State<AppState>) -> Json<Vec<BetView>> {
    let account = state.account.read().await;
    Json(account.bets().iter().map(BetView::from).collect())
}

/// GET /api/info
pub async fn get_info(State(state): State<AppState>) -> Json<InfoResponse> {
    let order: AccumulationOrder = state.account.read().await.order();
    Json(InfoResponse {
        name: state.name.clone(),
        currency_symbol: state.currency_symbol.clone(),
        accumulation_order: order.to_string(),
    })
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

/// POST /api/balance
pub async fn set_balance(
    State(state): State<AppState>,
    Json(req): Json<BalanceRequest>,
) -> CommandResult {
    let amount = input::parse_amount("initial balance", &text(&req.amount).unwrap_or_default())?;
    let mut account = state.account.write().await;
    account.set_base_balance(amount)?;
    Ok(Json(account.snapshot()))
}

/// POST /api/bets
pub async fn add_bet(
    State(state): State<AppState>,
    Json(req): Json<NewBetRequest>,
) -> Result<(StatusCode, Json<AccountSnapshot>), ApiError> {
    let stake = text(&req.stake);
    let odds = text(&req.odds);
    let (stake, odds) = input::parse_bet_fields(stake.as_deref(), odds.as_deref())?;

    let mut account = state.account.write().await;
    account.add_bet(stake, odds)?;
    Ok((StatusCode::CREATED, Json(account.snapshot())))
}

/// DELETE /api/bets/:id
pub async fn delete_bet(State(state): State<AppState>, Path(id): Path<String>) -> CommandResult {
    let id = parse_id(&id)?;
    let mut account = state.account.write().await;
    account.delete_bet(id)?;
    Ok(Json(account.snapshot()))
}

/// POST /api/bets/:id/settle
pub async fn settle_bet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SettleRequest>,
) -> CommandResult {
    let id = parse_id(&id)?;
    let cashout = text(&req.cashout);
    let settlement = input::parse_settlement(&req.outcome, cashout.as_deref())?;

    let mut account = state.account.write().await;
    account.settle_bet(id, settlement)?;
    Ok(Json(account.snapshot()))
}

/// POST /api/reset
pub async fn reset_chart(State(state): State<AppState>) -> CommandResult {
    let mut account = state.account.write().await;
    account.reset_chart()?;
    Ok(Json(account.snapshot()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_state(base: Decimal) -> AppState {
        let mut account = AccountState::new();
        account.set_base_balance(base).unwrap();
        Arc::new(DashboardState::new(account, "TEST", "R$"))
    }

    fn field(s: &str) -> Option<RawField> {
        Some(RawField::Text(s.to_string()))
    }

    #[test]
    fn test_raw_field_accepts_numbers() {
        let req: NewBetRequest = serde_json::from_str(r#"{"stake": 10, "odds": "2,5"}"#).unwrap();
        assert_eq!(text(&req.stake).as_deref(), Some("10"));
        assert_eq!(text(&req.odds).as_deref(), Some("2,5"));
    }

    #[test]
    fn test_balance_point_serializes() {
        let point = BalancePoint { index: 2, balance: dec!(105.5) };
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("105.5"));
    }

    #[tokio::test]
    async fn test_get_balance_history_initial() {
        let state = test_state(dec!(50));
        let Json(history) = get_balance_history(State(state)).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].balance, dec!(50));
    }

    #[tokio::test]
    async fn test_add_then_settle() {
        let state = test_state(dec!(100));
        let req = NewBetRequest { stake: field("10"), odds: field("2") };
        let (status, Json(snap)) = add_bet(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        let id = snap.bets[0].id;

        let req = SettleRequest { outcome: "green".into(), cashout: None };
        let Json(snap) = settle_bet(State(state), Path(id.to_string()), Json(req)).await.unwrap();
        assert_eq!(snap.current_balance, dec!(120));
        assert_eq!(snap.history, vec![dec!(100), dec!(120)]);
    }

    #[tokio::test]
    async fn test_add_bet_missing_field_is_rejected() {
        let state = test_state(dec!(100));
        let req = NewBetRequest { stake: field("10"), odds: None };
        let err = add_bet(State(state.clone()), Json(req)).await.unwrap_err();
        assert!(matches!(err, ApiError::Account(AccountError::Validation(_))));
        assert!(state.account.read().await.bets().is_empty());
    }

    #[tokio::test]
    async fn test_set_balance_rejects_text() {
        let state = test_state(dec!(100));
        let req = BalanceRequest { amount: field("lots") };
        assert!(set_balance(State(state.clone()), Json(req)).await.is_err());
        assert_eq!(state.account.read().await.base_balance(), dec!(100));
    }

    #[tokio::test]
    async fn test_delete_with_garbage_id() {
        let state = test_state(dec!(100));
        let err = delete_bet(State(state), Path("nope".into())).await.unwrap_err();
        assert!(matches!(err, ApiError::UnknownId(_)));
    }

    #[tokio::test]
    async fn test_get_info() {
        let state = test_state(dec!(1));
        let Json(info) = get_info(State(state)).await;
        assert_eq!(info.name, "TEST");
        assert_eq!(info.currency_symbol, "R$");
        assert_eq!(info.accumulation_order, "newest_first");
    }
}
