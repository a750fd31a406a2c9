//! Parsing of raw text fields into ledger inputs.
//!
//! The presentation layer hands over whatever the user typed. Nothing that
//! fails to parse here ever reaches [`crate::account::AccountState`].

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{AccountError, FILL_IN_BET_FIELDS};
use crate::types::Settlement;

/// Parse a user-entered amount. Accepts `,` as the decimal separator.
pub fn parse_amount(field: &str, raw: &str) -> Result<Decimal, AccountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AccountError::validation(format!("Fill in {field}")));
    }

    let normalized = trimmed.replace(',', ".");
    Decimal::from_str(&normalized)
        .map(|d| d.normalize())
        .map_err(|_| AccountError::validation(format!("{field} must be a number, got '{trimmed}'")))
}

/// Parse the stake and odds fields of a new bet.
///
/// Returns `(stake, odds)`. A missing field on either side yields the
/// single "fill in odds and stake" message.
pub fn parse_bet_fields(
    stake: Option<&str>,
    odds: Option<&str>,
) -> Result<(Decimal, Decimal), AccountError> {
    let (stake, odds) = match (non_blank(stake), non_blank(odds)) {
        (Some(s), Some(o)) => (s, o),
        _ => return Err(AccountError::validation(FILL_IN_BET_FIELDS)),
    };
    Ok((parse_amount("stake", stake)?, parse_amount("odds", odds)?))
}

/// Parse a settlement command.
///
/// `kind` accepts `won`/`green`, `lost`/`red` and `cashout`/`cashed_out`
/// (case-insensitive). A cashout needs a numeric `cashout` amount.
pub fn parse_settlement(kind: &str, cashout: Option<&str>) -> Result<Settlement, AccountError> {
    match kind.trim().to_lowercase().as_str() {
        "won" | "win" | "green" => Ok(Settlement::Won),
        "lost" | "loss" | "red" => Ok(Settlement::Lost),
        "cashout" | "cashed_out" | "cash_out" => {
            let raw = cashout.unwrap_or_default();
            Ok(Settlement::CashedOut(parse_amount("cashout amount", raw)?))
        }
        other => Err(AccountError::validation(format!("Unknown outcome: {other}"))),
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.trim().is_empty())
}
