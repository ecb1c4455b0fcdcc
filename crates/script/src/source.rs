use std::path::PathBuf;

/// Where an account's chat script lives.
///
/// Remote sources are distinguished by an `http`/`https` scheme prefix;
/// everything else is treated as a local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    File(PathBuf),
    Remote(String),
}

fn is_url(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

impl ScriptSource {
    pub fn parse(raw: &str) -> Self {
        if is_url(raw) {
            Self::Remote(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }

    /// Default source for an account code under a base that is either a
    /// directory or an HTTP URL: `<base>/<code>_chat.json`.
    pub fn for_account(base: &str, code: &str) -> Self {
        let file = format!("{code}_chat.json");
        if is_url(base) {
            Self::Remote(format!("{}/{file}", base.trim_end_matches('/')))
        } else {
            Self::File(PathBuf::from(base).join(file))
        }
    }
}

impl std::fmt::Display for ScriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}
