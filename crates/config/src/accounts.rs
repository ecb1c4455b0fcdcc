use std::collections::{BTreeMap, HashMap};

use {secrecy::SecretString, tracing::warn};

/// A configured Telegram identity.
///
/// Credentials are read once at startup and never change for the process
/// lifetime. The API hash is held as a secret so it cannot leak through
/// `Debug` output.
#[derive(Debug, Clone)]
pub struct Account {
    /// Short identity code, e.g. `"A"`.
    pub code: String,
    pub api_id: i32,
    pub api_hash: SecretString,
    pub phone: String,
    /// Display username other accounts address messages to.
    pub username: String,
}

/// Immutable account set keyed by code.
///
/// Iteration order is sorted by code so startup output does not depend on
/// environment ordering.
#[derive(Debug, Default, Clone)]
pub struct AccountRegistry {
    accounts: BTreeMap<String, Account>,
}

impl AccountRegistry {
    /// Build the registry from environment-style key/value pairs.
    ///
    /// An account code is discovered through its `API_ID_<CODE>` key. An
    /// entry missing any of its four keys, or whose API id does not parse,
    /// is skipped with a warning and absent from the registry.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let mut accounts = BTreeMap::new();

        for key in vars.keys() {
            let Some(code) = key.strip_prefix("API_ID_") else {
                continue;
            };
            match build_account(code, &vars) {
                Some(account) => {
                    accounts.insert(code.to_string(), account);
                },
                None => {
                    warn!(account = code, "incomplete account entry skipped");
                },
            }
        }

        Self { accounts }
    }

    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn get(&self, code: &str) -> Option<&Account> {
        self.accounts.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.accounts.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn build_account(code: &str, vars: &HashMap<String, String>) -> Option<Account> {
    let api_id = vars.get(&format!("API_ID_{code}"))?.trim().parse().ok()?;
    let api_hash = vars.get(&format!("API_HASH_{code}"))?.trim();
    let phone = vars.get(&format!("PHONE_{code}"))?.trim();
    let username = vars.get(&format!("USERNAME_{code}"))?.trim();
    if api_hash.is_empty() || phone.is_empty() || username.is_empty() {
        return None;
    }
    Some(Account {
        code: code.to_string(),
        api_id,
        api_hash: SecretString::new(api_hash.to_string()),
        phone: phone.to_string(),
        username: username.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn var(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    fn full_entry(code: &str) -> Vec<(String, String)> {
        vec![
            var(&format!("API_ID_{code}"), "12345"),
            var(&format!("API_HASH_{code}"), "deadbeef"),
            var(&format!("PHONE_{code}"), "+15550000001"),
            var(&format!("USERNAME_{code}"), &format!("user_{code}")),
        ]
    }

    #[test]
    fn complete_entry_is_registered() {
        let registry = AccountRegistry::from_vars(full_entry("A"));
        let account = registry.get("A").unwrap();
        assert_eq!(account.api_id, 12345);
        assert_eq!(account.phone, "+15550000001");
        assert_eq!(account.username, "user_A");
    }

    #[test]
    fn missing_field_skips_entry() {
        let mut vars = full_entry("A");
        vars.retain(|(k, _)| k != "PHONE_A");
        let registry = AccountRegistry::from_vars(vars);
        assert!(registry.is_empty());
    }

    #[test]
    fn unparseable_api_id_skips_entry() {
        let mut vars = full_entry("A");
        for (k, v) in &mut vars {
            if k == "API_ID_A" {
                *v = "not-a-number".into();
            }
        }
        let registry = AccountRegistry::from_vars(vars);
        assert!(registry.is_empty());
    }

    #[test]
    fn blank_field_skips_entry() {
        let mut vars = full_entry("A");
        for (k, v) in &mut vars {
            if k == "USERNAME_A" {
                *v = "  ".into();
            }
        }
        let registry = AccountRegistry::from_vars(vars);
        assert!(registry.is_empty());
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut vars = full_entry("A");
        vars.push(var("PATH", "/usr/bin"));
        vars.push(var("CHAT_PAIRS", "A-B"));
        let registry = AccountRegistry::from_vars(vars);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn iteration_is_sorted_by_code() {
        let mut vars = full_entry("C");
        vars.extend(full_entry("A"));
        vars.extend(full_entry("B"));
        let registry = AccountRegistry::from_vars(vars);
        let codes: Vec<&str> = registry.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["A", "B", "C"]);
    }
}
