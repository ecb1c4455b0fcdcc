use std::{collections::HashMap, path::PathBuf, sync::Mutex};

use {
    async_trait::async_trait,
    grammers_client::{
        Client, SignInError,
        types::{LoginToken, PasswordToken},
    },
    grammers_session::PackedChat,
    tracing::debug,
};

use banter_session::{Error, Messenger, Result};

/// One account's live MTProto session.
pub struct TelegramMessenger {
    client: Client,
    session_path: PathBuf,
    /// Login-code token from `request_code`, consumed by `sign_in`.
    login_token: Mutex<Option<LoginToken>>,
    /// Password token handed back when the platform demands a second factor,
    /// consumed by `sign_in_with_password`.
    password_token: Mutex<Option<PasswordToken>>,
    /// Resolved usernames, so repeated sends skip the lookup round-trip.
    /// std::sync::Mutex: lookups are synchronous and never held across
    /// `.await` points.
    peers: Mutex<HashMap<String, PackedChat>>,
}

impl TelegramMessenger {
    pub fn new(client: Client, session_path: PathBuf) -> Self {
        Self {
            client,
            session_path,
            login_token: Mutex::new(None),
            password_token: Mutex::new(None),
            peers: Mutex::new(HashMap::new()),
        }
    }

    async fn resolve(&self, username: &str) -> Result<PackedChat> {
        if let Some(packed) = self
            .peers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(username)
        {
            return Ok(*packed);
        }

        debug!(username, "resolving peer");
        let chat = self
            .client
            .resolve_username(username)
            .await
            .map_err(Error::platform)?
            .ok_or_else(|| Error::Platform {
                message: format!("unknown username {username:?}"),
            })?;
        let packed = chat.pack();
        self.peers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(username.to_string(), packed);
        Ok(packed)
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn is_authorized(&self) -> Result<bool> {
        self.client.is_authorized().await.map_err(Error::platform)
    }

    async fn request_code(&self, phone: &str) -> Result<()> {
        let token = self
            .client
            .request_login_code(phone)
            .await
            .map_err(Error::platform)?;
        *self.login_token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token);
        Ok(())
    }

    async fn sign_in(&self, _phone: &str, code: &str) -> Result<()> {
        let token = self
            .login_token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .ok_or_else(|| Error::Platform {
                message: "no login code requested".into(),
            })?;

        match self.client.sign_in(&token, code).await {
            Ok(_user) => Ok(()),
            Err(SignInError::PasswordRequired(password_token)) => {
                *self
                    .password_token
                    .lock()
                    .unwrap_or_else(|e| e.into_inner()) = Some(password_token);
                Err(Error::TwoFactorRequired)
            },
            Err(e) => Err(Error::platform(e)),
        }
    }

    async fn sign_in_with_password(&self, password: &str) -> Result<()> {
        let token = self
            .password_token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .ok_or_else(|| Error::Platform {
                message: "no password challenge pending".into(),
            })?;

        self.client
            .check_password(token, password)
            .await
            .map(|_user| ())
            .map_err(Error::platform)
    }

    async fn send_message(&self, to: &str, text: &str) -> Result<()> {
        let peer = self.resolve(to).await?;
        self.client
            .send_message(peer, text)
            .await
            .map(|_message| ())
            .map_err(Error::platform)
    }

    async fn disconnect(&self) -> Result<()> {
        // Persist the authorization so the next run skips the login code.
        self.client
            .session()
            .save_to_file(&self.session_path)
            .map_err(Error::platform)
    }
}
