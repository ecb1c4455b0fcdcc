use std::collections::HashMap;

use crate::error::{ConfigError, Result};

/// Sender → receivers adjacency parsed from `CHAT_PAIRS`.
///
/// Receivers keep first-seen order and duplicates; senders are enumerable in
/// first-seen order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PairingMap {
    senders: Vec<String>,
    receivers: HashMap<String, Vec<String>>,
}

impl PairingMap {
    /// Parse a comma-delimited list of `"<sender>-<receiver>"` tokens.
    ///
    /// Blank tokens are dropped. A token without exactly one separator, or
    /// with an empty side, is a configuration error.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut map = Self::default();
        for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let mut parts = token.split('-');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(sender), Some(receiver), None)
                    if !sender.is_empty() && !receiver.is_empty() =>
                {
                    map.push(sender, receiver);
                },
                _ => {
                    return Err(ConfigError::MalformedPairing {
                        token: token.to_string(),
                    });
                },
            }
        }
        Ok(map)
    }

    fn push(&mut self, sender: &str, receiver: &str) {
        if !self.receivers.contains_key(sender) {
            self.senders.push(sender.to_string());
        }
        self.receivers
            .entry(sender.to_string())
            .or_default()
            .push(receiver.to_string());
    }

    /// Senders in first-seen order.
    pub fn senders(&self) -> &[String] {
        &self.senders
    }

    /// Receivers for a sender, first-seen order with duplicates preserved.
    /// Empty for an unknown sender.
    pub fn receivers(&self, sender: &str) -> &[String] {
        self.receivers.get(sender).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.senders
            .iter()
            .map(|s| (s.as_str(), self.receivers(s)))
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
