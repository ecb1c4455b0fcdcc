use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The platform requires the account's second-factor password.
    #[error("two-factor password required")]
    TwoFactorRequired,

    /// Messaging platform error (connect, login, or delivery).
    #[error("platform: {message}")]
    Platform { message: String },

    /// Interactive prompt failure (stdin closed, I/O error).
    #[error("prompt: {message}")]
    Prompt { message: String },
}

impl Error {
    pub fn platform(err: impl std::fmt::Display) -> Self {
        Self::Platform {
            message: err.to_string(),
        }
    }

    pub fn prompt(err: impl std::fmt::Display) -> Self {
        Self::Prompt {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
