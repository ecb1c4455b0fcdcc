//! Session establishment and teardown for configured accounts.
//!
//! The [`Messenger`] trait is the delivery-adapter seam: everything above it
//! (session manager, scheduler) is platform-agnostic, and the Telegram
//! implementation lives in its own crate. Login is interactive (a one-time
//! code, optionally followed by a second-factor password), and a failed
//! login excludes that account instead of aborting the run.

pub mod error;
pub mod manager;
pub mod messenger;
pub mod prompt;

pub use {
    error::{Error, Result},
    manager::{SessionManager, teardown},
    messenger::{Connector, Messenger, SessionMap},
    prompt::{LoginPrompt, StdinPrompt},
};
