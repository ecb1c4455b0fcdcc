use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;

use banter_config::Account;

use crate::error::Result;

/// A live connection to the messaging platform for one account.
///
/// This is the delivery-adapter seam. The session manager drives the login
/// operations; the scheduler only ever calls [`Messenger::send_message`].
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn is_authorized(&self) -> Result<bool>;

    /// Ask the platform to deliver a one-time login code.
    async fn request_code(&self, phone: &str) -> Result<()>;

    /// Complete login with the delivered code.
    ///
    /// Fails with [`crate::Error::TwoFactorRequired`] when the account has a
    /// password set.
    async fn sign_in(&self, phone: &str, code: &str) -> Result<()>;

    /// Complete login with the second-factor password.
    async fn sign_in_with_password(&self, password: &str) -> Result<()>;

    /// Deliver `text` to the peer addressed by username.
    async fn send_message(&self, to: &str, text: &str) -> Result<()>;

    async fn disconnect(&self) -> Result<()>;
}

/// Creates connected (not necessarily authorized) messengers per account.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, account: &Account) -> Result<Arc<dyn Messenger>>;
}

/// Live sessions keyed by account code. Written once during startup,
/// read-only while the scheduler runs.
pub type SessionMap = HashMap<String, Arc<dyn Messenger>>;
