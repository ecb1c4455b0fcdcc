//! The conversation scheduler.
//!
//! Drives one sender account through its chat script against an ordered list
//! of receivers: each script message goes to the next receiver in turn, the
//! receiver answers from its own script, and jittered delays pace every
//! step. The loop runs until the sender's script loads empty or the
//! cancellation token fires.

pub mod pacing;
pub mod plan;
pub mod scheduler;

pub use {
    pacing::Pacing,
    plan::{ConversationPlan, Receiver},
    scheduler::{Scheduler, StopReason},
};
