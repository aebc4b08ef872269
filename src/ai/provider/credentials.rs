//! Credential resolution for remote providers.
//!
//! Lookup order: explicit argument, then the provider's named environment
//! variables in order. Blank values count as absent.

use secrecy::SecretString;
use std::collections::HashMap;

/// Source of named configuration values (normally the process environment)
pub trait CredentialSource: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads credentials from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl CredentialSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl CredentialSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

pub fn resolve_credential(
    explicit: Option<&str>,
    env_vars: &[&str],
    source: &dyn CredentialSource,
) -> Option<SecretString> {
    if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
        return Some(SecretString::from(key.to_string()));
    }

    env_vars
        .iter()
        .filter_map(|name| source.get(name))
        .find(|value| !value.trim().is_empty())
        .map(SecretString::from)
}
