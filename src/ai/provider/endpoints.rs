//! Fixed endpoint, credential and wire-schema facts for each remote provider.

use super::ProviderKind;

/// Static description of one remote chat-completions service
#[derive(Debug)]
pub struct RemoteSpec {
    pub kind: ProviderKind,
    pub endpoint: &'static str,
    /// Environment variables checked in order when no key is passed
    pub env_vars: &'static [&'static str],
    pub default_model: &'static str,
    /// Prepend the docstring-writer system message
    pub system_message: bool,
    /// Status meaning "warming up, retry after the fixed delay"
    pub warmup_status: Option<u16>,
    /// Send `X-Title` (and `HTTP-Referer` when configured)
    pub attribution_headers: bool,
}

pub const DEEPSEEK: RemoteSpec = RemoteSpec {
    kind: ProviderKind::DeepSeek,
    endpoint: "https://api.deepseek.com/v1/chat/completions",
    env_vars: &["DEEPSEEK_API_KEY", "HUGGINGFACE_API_KEY"],
    default_model: "deepseek-chat",
    system_message: true,
    warmup_status: Some(503),
    attribution_headers: false,
};

pub const OPENAI: RemoteSpec = RemoteSpec {
    kind: ProviderKind::OpenAi,
    endpoint: "https://api.openai.com/v1/chat/completions",
    env_vars: &["OPENAI_API_KEY"],
    default_model: "gpt-3.5-turbo",
    system_message: true,
    warmup_status: Some(503),
    attribution_headers: false,
};

pub const OPENROUTER: RemoteSpec = RemoteSpec {
    kind: ProviderKind::OpenRouter,
    endpoint: "https://openrouter.ai/api/v1/chat/completions",
    env_vars: &["OPENROUTER_API_KEY"],
    default_model: "deepseek/deepseek-r1:free",
    system_message: false,
    warmup_status: None,
    attribution_headers: true,
};

/// Endpoint description for a remote kind; `None` for the offline provider.
pub fn remote_spec(kind: ProviderKind) -> Option<&'static RemoteSpec> {
    match kind {
        ProviderKind::DeepSeek => Some(&DEEPSEEK),
        ProviderKind::OpenAi => Some(&OPENAI),
        ProviderKind::OpenRouter => Some(&OPENROUTER),
        ProviderKind::Offline => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_remote_kind_has_endpoint() {
        for kind in ProviderKind::ALL {
            let spec = remote_spec(kind);
            assert_eq!(spec.is_some(), kind.is_remote());
            if let Some(spec) = spec {
                assert_eq!(spec.kind, kind);
                assert!(spec.endpoint.starts_with("https://"));
                assert!(!spec.env_vars.is_empty());
            }
        }
    }

    #[test]
    fn test_openrouter_has_no_warmup_status() {
        assert!(OPENROUTER.warmup_status.is_none());
        assert_eq!(DEEPSEEK.warmup_status, Some(503));
    }
}
