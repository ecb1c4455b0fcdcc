use std::{path::PathBuf, sync::Arc};

use {
    async_trait::async_trait,
    grammers_client::{Client, Config, InitParams},
    grammers_session::Session,
    secrecy::ExposeSecret,
    tracing::info,
};

use {
    banter_config::Account,
    banter_session::{Connector, Error, Messenger, Result},
};

use crate::messenger::TelegramMessenger;

/// Builds one connected MTProto client per account.
pub struct TelegramConnector {
    session_dir: PathBuf,
}

impl TelegramConnector {
    pub fn new(session_dir: impl Into<PathBuf>) -> Self {
        Self {
            session_dir: session_dir.into(),
        }
    }

    fn session_path(&self, account: &Account) -> PathBuf {
        self.session_dir.join(format!("session_{}", account.code))
    }
}

#[async_trait]
impl Connector for TelegramConnector {
    async fn connect(&self, account: &Account) -> Result<Arc<dyn Messenger>> {
        tokio::fs::create_dir_all(&self.session_dir)
            .await
            .map_err(Error::platform)?;

        let path = self.session_path(account);
        let session = Session::load_file_or_create(&path).map_err(Error::platform)?;
        let client = Client::connect(Config {
            session,
            api_id: account.api_id,
            api_hash: account.api_hash.expose_secret().clone(),
            params: InitParams::default(),
        })
        .await
        .map_err(Error::platform)?;

        info!(account = %account.code, session = %path.display(), "connected to telegram");
        Ok(Arc::new(TelegramMessenger::new(client, path)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn session_files_are_keyed_by_account_code() {
        let connector = TelegramConnector::new("sessions");
        let account = Account {
            code: "A".to_string(),
            api_id: 1,
            api_hash: SecretString::new("hash".to_string()),
            phone: "+15550000001".to_string(),
            username: "user_a".to_string(),
        };
        assert_eq!(
            connector.session_path(&account),
            PathBuf::from("sessions").join("session_A")
        );
    }
}
