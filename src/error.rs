//! Error types for ledger commands.
//!
//! Every variant means the command was rejected and the account was left
//! exactly as it was. None of them are fatal.

use crate::types::BetId;

/// Message shown when a new bet is submitted without both fields.
pub const FILL_IN_BET_FIELDS: &str = "Fill in odds and stake";

/// Message shown when a value or running balance leaves the `Decimal` range.
pub const AMOUNT_TOO_LARGE: &str = "Amount too large";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Bet not found: {0}")]
    NotFound(BetId),

    #[error("Bet already settled: {0}")]
    AlreadySettled(BetId),
}

impl AccountError {
    pub fn validation(message: impl Into<String>) -> Self {
        AccountError::Validation(message.into())
    }

    /// Text suitable for showing to the user as-is.
    pub fn user_message(&self) -> String {
        match self {
            AccountError::Validation(message) => message.clone(),
            AccountError::NotFound(_) => "That bet no longer exists".to_string(),
            AccountError::AlreadySettled(_) => {
                "This bet is already settled; delete it and add it again to change the result"
                    .to_string()
            }
        }
    }
}
