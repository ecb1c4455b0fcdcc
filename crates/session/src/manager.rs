use std::sync::Arc;

use tracing::{info, warn};

use banter_config::{Account, AccountRegistry};

use crate::{
    error::{Error, Result},
    messenger::{Connector, Messenger, SessionMap},
    prompt::LoginPrompt,
};

/// Drives interactive login for every configured account.
pub struct SessionManager<C, P> {
    connector: C,
    prompt: P,
}

impl<C: Connector, P: LoginPrompt> SessionManager<C, P> {
    pub fn new(connector: C, prompt: P) -> Self {
        Self { connector, prompt }
    }

    /// Establish sessions for every account in the registry, sequentially.
    ///
    /// One account's interactive login blocks the next account's setup. A
    /// failure at any step logs the account identity and excludes it from
    /// the returned map; the remaining accounts still get their turn.
    pub async fn establish_all(&self, registry: &AccountRegistry) -> SessionMap {
        let mut sessions = SessionMap::new();
        for account in registry.iter() {
            match self.establish(account).await {
                Ok(session) => {
                    info!(
                        account = %account.code,
                        username = %account.username,
                        "logged in"
                    );
                    sessions.insert(account.code.clone(), session);
                },
                Err(e) => {
                    warn!(
                        account = %account.code,
                        phone = %account.phone,
                        error = %e,
                        "login failed, account excluded"
                    );
                },
            }
        }
        sessions
    }

    async fn establish(&self, account: &Account) -> Result<Arc<dyn Messenger>> {
        let session = self.connector.connect(account).await?;
        if session.is_authorized().await? {
            return Ok(session);
        }

        info!(account = %account.code, phone = %account.phone, "login required");
        session.request_code(&account.phone).await?;
        let code = self.prompt.login_code(account).await?;

        match session.sign_in(&account.phone, &code).await {
            Ok(()) => {},
            Err(Error::TwoFactorRequired) => {
                let password = self.prompt.password(account).await?;
                session.sign_in_with_password(&password).await?;
            },
            Err(e) => return Err(e),
        }
        Ok(session)
    }
}

/// Disconnect all live sessions concurrently, best effort.
pub async fn teardown(sessions: &SessionMap) {
    let disconnects = sessions.iter().map(|(code, session)| async move {
        if let Err(e) = session.disconnect().await {
            warn!(account = %code, error = %e, "disconnect failed");
        }
    });
    futures::future::join_all(disconnects).await;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use async_trait::async_trait;

    use super::*;

    fn registry(codes: &[&str]) -> AccountRegistry {
        let vars = codes.iter().flat_map(|code| {
            vec![
                (format!("API_ID_{code}"), "1".to_string()),
                (format!("API_HASH_{code}"), "hash".to_string()),
                (format!("PHONE_{code}"), format!("+1555000{code}")),
                (format!("USERNAME_{code}"), format!("user_{code}")),
            ]
        });
        AccountRegistry::from_vars(vars)
    }

    #[derive(Default)]
    struct FakeSession {
        authorized: bool,
        needs_password: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeSession {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Messenger for FakeSession {
        async fn is_authorized(&self) -> Result<bool> {
            Ok(self.authorized)
        }

        async fn request_code(&self, phone: &str) -> Result<()> {
            self.record(format!("request_code {phone}"));
            Ok(())
        }

        async fn sign_in(&self, _phone: &str, code: &str) -> Result<()> {
            let first_attempt = !self
                .calls()
                .iter()
                .any(|c| c.starts_with("sign_in "));
            self.record(format!("sign_in {code}"));
            if self.needs_password && first_attempt {
                return Err(Error::TwoFactorRequired);
            }
            Ok(())
        }

        async fn sign_in_with_password(&self, password: &str) -> Result<()> {
            self.record(format!("password {password}"));
            Ok(())
        }

        async fn send_message(&self, _to: &str, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn disconnect(&self) -> Result<()> {
            self.record("disconnect");
            Ok(())
        }
    }

    /// Connector handing out pre-built sessions, retaining handles so tests
    /// can inspect the calls afterwards.
    #[derive(Default)]
    struct FakeConnector {
        sessions: HashMap<String, Arc<FakeSession>>,
        refuse: Vec<String>,
    }

    #[async_trait]
    impl Connector for FakeConnector {
        async fn connect(&self, account: &Account) -> Result<Arc<dyn Messenger>> {
            if self.refuse.contains(&account.code) {
                return Err(Error::platform("connection refused"));
            }
            let session = self
                .sessions
                .get(&account.code)
                .cloned()
                .unwrap_or_default();
            Ok(session)
        }
    }

    struct FixedPrompt;

    #[async_trait]
    impl LoginPrompt for FixedPrompt {
        async fn login_code(&self, _account: &Account) -> Result<String> {
            Ok("12345".to_string())
        }

        async fn password(&self, _account: &Account) -> Result<String> {
            Ok("hunter2".to_string())
        }
    }

    #[tokio::test]
    async fn authorized_account_skips_login() {
        let session = Arc::new(FakeSession {
            authorized: true,
            ..Default::default()
        });
        let connector = FakeConnector {
            sessions: HashMap::from([("A".to_string(), Arc::clone(&session))]),
            refuse: Vec::new(),
        };
        let manager = SessionManager::new(connector, FixedPrompt);

        let sessions = manager.establish_all(&registry(&["A"])).await;
        assert!(sessions.contains_key("A"));
        assert!(session.calls().is_empty());
    }

    #[tokio::test]
    async fn code_login_flow() {
        let session = Arc::new(FakeSession::default());
        let connector = FakeConnector {
            sessions: HashMap::from([("A".to_string(), Arc::clone(&session))]),
            refuse: Vec::new(),
        };
        let manager = SessionManager::new(connector, FixedPrompt);

        let sessions = manager.establish_all(&registry(&["A"])).await;
        assert!(sessions.contains_key("A"));
        assert_eq!(
            session.calls(),
            vec!["request_code +1555000A", "sign_in 12345"]
        );
    }

    #[tokio::test]
    async fn two_factor_login_flow() {
        let session = Arc::new(FakeSession {
            needs_password: true,
            ..Default::default()
        });
        let connector = FakeConnector {
            sessions: HashMap::from([("A".to_string(), Arc::clone(&session))]),
            refuse: Vec::new(),
        };
        let manager = SessionManager::new(connector, FixedPrompt);

        let sessions = manager.establish_all(&registry(&["A"])).await;
        assert!(sessions.contains_key("A"));
        assert_eq!(
            session.calls(),
            vec![
                "request_code +1555000A",
                "sign_in 12345",
                "password hunter2"
            ]
        );
    }

    #[tokio::test]
    async fn failed_login_excludes_account_only() {
        let connector = FakeConnector {
            sessions: HashMap::new(),
            refuse: vec!["A".to_string()],
        };
        let manager = SessionManager::new(connector, FixedPrompt);

        let sessions = manager.establish_all(&registry(&["A", "B"])).await;
        assert!(!sessions.contains_key("A"));
        assert!(sessions.contains_key("B"));
    }

    #[tokio::test]
    async fn teardown_disconnects_every_session() {
        let a = Arc::new(FakeSession::default());
        let b = Arc::new(FakeSession::default());
        let mut sessions = SessionMap::new();
        sessions.insert("A".to_string(), Arc::clone(&a) as Arc<dyn Messenger>);
        sessions.insert("B".to_string(), Arc::clone(&b) as Arc<dyn Messenger>);

        teardown(&sessions).await;
        assert_eq!(a.calls(), vec!["disconnect"]);
        assert_eq!(b.calls(), vec!["disconnect"]);
    }
}
