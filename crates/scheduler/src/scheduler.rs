use std::{collections::HashMap, sync::Arc, time::Duration};

use {
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use {
    banter_script::{ScriptCursor, ScriptStore},
    banter_session::{Messenger, SessionMap},
};

use crate::{
    pacing::Pacing,
    plan::{ConversationPlan, Receiver},
};

/// Why the scheduler stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The sender's script loaded empty at the start of a cycle.
    ScriptExhausted,
    /// The sender has no live session.
    NoSenderSession,
    /// The cancellation token fired.
    Cancelled,
}

enum ExchangeAbort {
    Cancelled,
    Delivery(banter_session::Error),
}

/// Drives the outer/inner/pass loops over one conversation plan.
///
/// Strictly sequential: one delivery at a time, delays and platform calls
/// suspending the single control flow. The cancellation token is observed
/// before every delivery and during every delay, so a shutdown request
/// always reaches the caller and teardown can run.
pub struct Scheduler {
    sessions: SessionMap,
    store: Arc<dyn ScriptStore>,
    pacing: Pacing,
    cancel: CancellationToken,
}

impl Scheduler {
    pub fn new(
        sessions: SessionMap,
        store: Arc<dyn ScriptStore>,
        pacing: Pacing,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            sessions,
            store,
            pacing,
            cancel,
        }
    }

    /// Run the conversation until the sender's script loads empty or the
    /// token fires.
    ///
    /// The sender script is reloaded at the start of every cycle; each
    /// receiver's reply script is reloaded whenever its cursor wraps.
    pub async fn run(&self, plan: &ConversationPlan) -> StopReason {
        let Some(sender_session) = self.sessions.get(&plan.sender.code).cloned() else {
            warn!(sender = %plan.sender.code, "sender has no live session");
            return StopReason::NoSenderSession;
        };

        // Preload every receiver's reply cursor. An empty initial script
        // behaves like an empty reload: that receiver just never replies.
        let mut replies: HashMap<String, ScriptCursor> = HashMap::new();
        for receiver in &plan.receivers {
            let code = &receiver.account.code;
            if replies.contains_key(code) {
                continue;
            }
            let script = self.store.load(&receiver.source).await;
            if script.is_empty() {
                warn!(
                    receiver = %code,
                    source = %receiver.source,
                    "no reply script, receiver stays silent"
                );
            }
            replies.insert(code.clone(), ScriptCursor::new(script));
        }

        let mut cycle: u64 = 0;
        loop {
            let script = self.store.load(&plan.sender_source).await;
            if script.is_empty() {
                info!(
                    sender = %plan.sender.code,
                    source = %plan.sender_source,
                    "sender script empty, stopping"
                );
                return StopReason::ScriptExhausted;
            }
            let mut sender_cursor = ScriptCursor::new(script);
            cycle += 1;
            info!(
                cycle,
                sender = %plan.sender.code,
                messages = sender_cursor.len(),
                "starting cycle"
            );

            'cycle: while sender_cursor.current().is_some() {
                for receiver in &plan.receivers {
                    if self.cancel.is_cancelled() {
                        return StopReason::Cancelled;
                    }
                    let Some(message) = sender_cursor.current().map(str::to_string) else {
                        break 'cycle;
                    };
                    let Some(receiver_session) = self.sessions.get(&receiver.account.code)
                    else {
                        warn!(
                            receiver = %receiver.account.code,
                            "receiver has no live session, skipping"
                        );
                        continue;
                    };
                    let Some(reply_cursor) = replies.get_mut(&receiver.account.code) else {
                        continue;
                    };

                    match self
                        .exchange(
                            plan,
                            receiver,
                            &sender_session,
                            receiver_session,
                            reply_cursor,
                            &message,
                        )
                        .await
                    {
                        Ok(()) => {},
                        Err(ExchangeAbort::Cancelled) => return StopReason::Cancelled,
                        Err(ExchangeAbort::Delivery(e)) => {
                            // The sender cursor stays put: this message goes
                            // to the next receiver instead.
                            warn!(
                                sender = %plan.sender.code,
                                receiver = %receiver.account.code,
                                error = %e,
                                "exchange failed, moving on"
                            );
                            continue;
                        },
                    }

                    if !sender_cursor.advance() {
                        debug!(
                            sender = %plan.sender.code,
                            "sender script exhausted for this cycle"
                        );
                        break 'cycle;
                    }
                    if !self
                        .wait("next receiver", Pacing::draw(&self.pacing.next_receiver))
                        .await
                    {
                        return StopReason::Cancelled;
                    }
                }
            }

            info!(cycle, "cycle complete, pausing before restart");
            if !self.wait("cycle pause", self.pacing.cycle_pause).await {
                return StopReason::Cancelled;
            }
        }
    }

    /// One sender→receiver delivery plus the receiver's scripted reply.
    async fn exchange(
        &self,
        plan: &ConversationPlan,
        receiver: &Receiver,
        sender_session: &Arc<dyn Messenger>,
        receiver_session: &Arc<dyn Messenger>,
        reply_cursor: &mut ScriptCursor,
        message: &str,
    ) -> Result<(), ExchangeAbort> {
        info!(
            from = %plan.sender.username,
            to = %receiver.account.username,
            text = message,
            "delivering"
        );
        sender_session
            .send_message(&receiver.account.username, message)
            .await
            .map_err(ExchangeAbort::Delivery)?;

        if !self
            .wait("reply gap", Pacing::draw(&self.pacing.before_reply))
            .await
        {
            return Err(ExchangeAbort::Cancelled);
        }

        match reply_cursor.current().map(str::to_string) {
            Some(reply) => {
                info!(
                    from = %receiver.account.username,
                    to = %plan.sender.username,
                    text = %reply,
                    "replying"
                );
                receiver_session
                    .send_message(&plan.sender.username, &reply)
                    .await
                    .map_err(ExchangeAbort::Delivery)?;

                if !reply_cursor.advance() {
                    let fresh = self.store.load(&receiver.source).await;
                    if fresh.is_empty() {
                        warn!(
                            receiver = %receiver.account.code,
                            "reply script reloaded empty, no further replies"
                        );
                    }
                    reply_cursor.restart(fresh);
                }

                if !self
                    .wait("send gap", Pacing::draw(&self.pacing.after_reply))
                    .await
                {
                    return Err(ExchangeAbort::Cancelled);
                }
            },
            None => {
                warn!(receiver = %receiver.account.code, "no reply available");
            },
        }
        Ok(())
    }

    /// Cancellation-aware sleep, logged before waiting. Returns `false`
    /// when cancelled.
    async fn wait(&self, what: &str, delay: Duration) -> bool {
        debug!(what, seconds = delay.as_secs_f64(), "waiting");
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}
