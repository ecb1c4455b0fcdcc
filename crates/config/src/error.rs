use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A `CHAT_PAIRS` token that is not exactly `<sender>-<receiver>`.
    #[error("malformed pairing token {token:?} (expected \"<sender>-<receiver>\")")]
    MalformedPairing { token: String },

    /// A pairing references an account code with no configured account.
    #[error("CHAT_PAIRS references unknown account {code:?}")]
    UnknownAccount { code: String },

    /// The requested sender does not appear in any pairing.
    #[error("sender {code:?} has no configured receivers")]
    UnknownSender { code: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
