use std::path::Path;

use {async_trait::async_trait, tracing::warn};

use crate::source::ScriptSource;

/// Source of chat scripts.
///
/// Implementations must be total: a script that cannot be fetched or decoded
/// yields an empty list, never an error.
#[async_trait]
pub trait ScriptStore: Send + Sync {
    async fn load(&self, source: &ScriptSource) -> Vec<String>;
}

/// Loads scripts from local JSON files or remote JSON documents.
pub struct ScriptLoader {
    http: reqwest::Client,
}

impl ScriptLoader {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    async fn load_file(&self, path: &Path) -> Vec<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => decode(&raw, &path.display().to_string()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "script file not readable");
                Vec::new()
            },
        }
    }

    async fn load_remote(&self, url: &str) -> Vec<String> {
        let response = match self.http.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(url, error = %e, "script fetch failed");
                return Vec::new();
            },
        };
        let response = match response.error_for_status() {
            Ok(r) => r,
            Err(e) => {
                warn!(url, error = %e, "script fetch returned error status");
                return Vec::new();
            },
        };
        match response.text().await {
            Ok(raw) => decode(&raw, url),
            Err(e) => {
                warn!(url, error = %e, "script response body unreadable");
                Vec::new()
            },
        }
    }
}

impl Default for ScriptLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScriptStore for ScriptLoader {
    async fn load(&self, source: &ScriptSource) -> Vec<String> {
        match source {
            ScriptSource::File(path) => self.load_file(path).await,
            ScriptSource::Remote(url) => self.load_remote(url).await,
        }
    }
}

fn decode(raw: &str, origin: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(messages) => messages,
        Err(e) => {
            warn!(origin, error = %e, "failed to decode script");
            Vec::new()
        },
    }
}
