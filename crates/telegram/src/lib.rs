//! Telegram delivery adapter.
//!
//! Implements the [`banter_session::Messenger`] contract on top of
//! `grammers-client` MTProto user sessions. Each account's authorization is
//! persisted as a session file so later runs skip the login code.

pub mod connector;
pub mod messenger;

pub use {connector::TelegramConnector, messenger::TelegramMessenger};
