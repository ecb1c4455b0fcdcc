//! Runtime configuration for banter.
//!
//! Everything is environment-driven: accounts are discovered through
//! `API_ID_<CODE>` key groups, the conversation topology through
//! `CHAT_PAIRS`, and script locations through `CHAT_SOURCE_BASE` plus
//! per-account `CHAT_SOURCE_<CODE>` overrides. The resolved [`Config`] is
//! built once at startup and passed by reference; there is no ambient
//! global state.

pub mod accounts;
pub mod error;
pub mod pairing;

use std::collections::HashMap;

use banter_script::ScriptSource;

pub use {
    accounts::{Account, AccountRegistry},
    error::{ConfigError, Result},
    pairing::PairingMap,
};

/// Key holding the comma-delimited pairing tokens.
const CHAT_PAIRS_KEY: &str = "CHAT_PAIRS";
/// Key holding the default script base (directory or HTTP URL).
const SOURCE_BASE_KEY: &str = "CHAT_SOURCE_BASE";
/// Prefix for per-account script source overrides.
const SOURCE_OVERRIDE_PREFIX: &str = "CHAT_SOURCE_";

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub accounts: AccountRegistry,
    pub pairings: PairingMap,
    source_base: String,
    source_overrides: HashMap<String, String>,
}

impl Config {
    /// Build from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Build from environment-style key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        let accounts = AccountRegistry::from_vars(vars.iter().cloned());
        let raw_pairs = lookup(&vars, CHAT_PAIRS_KEY).unwrap_or_default();
        let pairings = PairingMap::parse(&raw_pairs)?;
        let source_base = lookup(&vars, SOURCE_BASE_KEY).unwrap_or_else(|| ".".to_string());

        let mut source_overrides = HashMap::new();
        for (key, value) in &vars {
            if let Some(code) = key.strip_prefix(SOURCE_OVERRIDE_PREFIX)
                && code != "BASE"
                && !value.trim().is_empty()
            {
                source_overrides.insert(code.to_string(), value.trim().to_string());
            }
        }

        Ok(Self {
            accounts,
            pairings,
            source_base,
            source_overrides,
        })
    }

    /// Replace the script base (CLI flag overrides the environment).
    pub fn with_source_base(mut self, base: impl Into<String>) -> Self {
        self.source_base = base.into();
        self
    }

    /// Script source for an account: the explicit `CHAT_SOURCE_<CODE>`
    /// override when present, otherwise `<base>/<code>_chat.json`.
    pub fn script_source(&self, code: &str) -> ScriptSource {
        match self.source_overrides.get(code) {
            Some(raw) => ScriptSource::parse(raw),
            None => ScriptSource::for_account(&self.source_base, code),
        }
    }

    /// Check that every pairing endpoint names a configured account.
    pub fn validate(&self) -> Result<()> {
        for (sender, receivers) in self.pairings.iter() {
            if !self.accounts.contains(sender) {
                return Err(ConfigError::UnknownAccount {
                    code: sender.to_string(),
                });
            }
            for receiver in receivers {
                if !self.accounts.contains(receiver) {
                    return Err(ConfigError::UnknownAccount {
                        code: receiver.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn lookup(vars: &[(String, String)], key: &str) -> Option<String> {
    vars.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.trim().to_string())
}
