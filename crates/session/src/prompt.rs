use async_trait::async_trait;

use banter_config::Account;

use crate::error::{Error, Result};

/// Interactive entry of login codes and second-factor passwords.
#[async_trait]
pub trait LoginPrompt: Send + Sync {
    async fn login_code(&self, account: &Account) -> Result<String>;
    async fn password(&self, account: &Account) -> Result<String>;
}

/// Prompts on the process's standard input/output.
pub struct StdinPrompt;

#[async_trait]
impl LoginPrompt for StdinPrompt {
    async fn login_code(&self, account: &Account) -> Result<String> {
        read_line(&format!("enter the code sent to {}: ", account.phone)).await
    }

    async fn password(&self, account: &Account) -> Result<String> {
        read_line(&format!(
            "two-factor password for {}: ",
            account.username
        ))
        .await
    }
}

async fn read_line(prompt: &str) -> Result<String> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(prompt.as_bytes())
        .await
        .map_err(Error::prompt)?;
    stdout.flush().await.map_err(Error::prompt)?;

    let mut line = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    let read = reader.read_line(&mut line).await.map_err(Error::prompt)?;
    if read == 0 {
        return Err(Error::Prompt {
            message: "stdin closed".into(),
        });
    }
    Ok(line.trim().to_string())
}
