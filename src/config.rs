//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults, so a missing file still yields a working
//! tracker on the default port.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::ledger::AccumulationOrder;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TrackerConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Prefix used when formatting balances for display.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Applied as the first base balance at startup, if set.
    #[serde(default)]
    pub initial_balance: Option<Decimal>,
    #[serde(default)]
    pub accumulation_order: AccumulationOrder,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            currency_symbol: default_currency_symbol(),
            initial_balance: None,
            accumulation_order: AccumulationOrder::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            port: default_port(),
        }
    }
}

fn default_name() -> String {
    "STAKELINE".to_string()
}

fn default_currency_symbol() -> String {
    "R$".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_port() -> u16 {
    8080
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }
}
