use {banter_config::Account, banter_script::ScriptSource};

/// Who talks to whom, and where their scripts come from.
///
/// Built once at startup from the validated configuration; the receiver
/// order is the pairing order and drives the round-robin.
#[derive(Debug, Clone)]
pub struct ConversationPlan {
    pub sender: Account,
    pub sender_source: ScriptSource,
    pub receivers: Vec<Receiver>,
}

#[derive(Debug, Clone)]
pub struct Receiver {
    pub account: Account,
    pub source: ScriptSource,
}
