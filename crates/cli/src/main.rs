//! banter: drives scripted conversations between Telegram accounts.
//!
//! One designated sender works through its chat script against the
//! receivers configured in `CHAT_PAIRS`; each receiver answers from its own
//! script. Accounts, credentials and script locations all come from the
//! environment (see `.env.example`).

use std::sync::Arc;

use {
    anyhow::Context,
    clap::Parser,
    tokio_util::sync::CancellationToken,
    tracing::info,
};

use {
    banter_config::{Config, ConfigError},
    banter_scheduler::{ConversationPlan, Pacing, Receiver, Scheduler},
    banter_script::ScriptLoader,
    banter_session::{SessionManager, StdinPrompt, teardown},
    banter_telegram::TelegramConnector,
};

#[derive(Parser)]
#[command(
    name = "banter",
    about = "Scripted conversations between Telegram accounts"
)]
struct Args {
    /// Account code that drives the conversation. Defaults to the first
    /// sender in CHAT_PAIRS.
    #[arg(long, env = "SENDER_CODE")]
    sender: Option<String>,

    /// Directory or HTTP base the chat scripts are fetched from.
    #[arg(long, env = "CHAT_SOURCE_BASE")]
    source_base: Option<String>,

    /// Directory holding the per-account Telegram session files.
    #[arg(long, env = "SESSION_DIR", default_value = "sessions")]
    session_dir: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banter=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(base) = args.source_base {
        config = config.with_source_base(base);
    }
    config.validate()?;

    info!(accounts = config.accounts.len(), "configuration loaded");
    for account in config.accounts.iter() {
        info!(
            code = %account.code,
            username = %account.username,
            phone = %account.phone,
            "account"
        );
    }
    for (sender, receivers) in config.pairings.iter() {
        info!(sender, ?receivers, "pairing");
    }

    let sender_code = match args.sender {
        Some(code) => code,
        None => config
            .pairings
            .senders()
            .first()
            .cloned()
            .context("CHAT_PAIRS is empty and no --sender given")?,
    };
    let receiver_codes = config.pairings.receivers(&sender_code);
    if receiver_codes.is_empty() {
        return Err(ConfigError::UnknownSender { code: sender_code }.into());
    }
    let plan = build_plan(&config, &sender_code, receiver_codes)?;

    let manager = SessionManager::new(TelegramConnector::new(&args.session_dir), StdinPrompt);
    let sessions = manager.establish_all(&config.accounts).await;
    if sessions.is_empty() {
        anyhow::bail!("no account could be logged in");
    }

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            signal_cancel.cancel();
        }
    });

    info!(sender = %sender_code, "starting conversation loop");
    let scheduler = Scheduler::new(
        sessions.clone(),
        Arc::new(ScriptLoader::new()),
        Pacing::default(),
        cancel,
    );
    let reason = scheduler.run(&plan).await;
    info!(?reason, "conversation loop stopped");

    teardown(&sessions).await;
    Ok(())
}

fn build_plan(
    config: &Config,
    sender_code: &str,
    receiver_codes: &[String],
) -> anyhow::Result<ConversationPlan> {
    let sender = config
        .accounts
        .get(sender_code)
        .ok_or_else(|| ConfigError::UnknownAccount {
            code: sender_code.to_string(),
        })?
        .clone();

    let receivers = receiver_codes
        .iter()
        .map(|code| {
            let account = config
                .accounts
                .get(code)
                .ok_or_else(|| ConfigError::UnknownAccount { code: code.clone() })?
                .clone();
            Ok(Receiver {
                source: config.script_source(code),
                account,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(ConversationPlan {
        sender_source: config.script_source(sender_code),
        sender,
        receivers,
    })
}
