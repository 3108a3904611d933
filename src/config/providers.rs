//! The static table of providers known at build time.

/// Describes one upstream provider kind known to the gateway.
///
/// Membership in this table is necessary but not sufficient for a provider
/// to be active — see `core::registry::ProviderRegistry::list_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Stable, opaque key, e.g. `"cerebras"`.
    pub key: &'static str,
    /// Human-readable display name.
    pub name: &'static str,
    /// Name of the environment variable holding this provider's API key.
    pub api_key_env_name: &'static str,
    /// Base URL of the upstream's OpenAI-compatible (or provider-specific)
    /// chat endpoint.
    pub base_url: &'static str,
    /// Which `core::upstream` adapter variant serves this provider.
    pub kind: UpstreamKind,
}

/// Which wire shape a provider's upstream adapter must speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    /// Standard OpenAI-compatible `/chat/completions` endpoint.
    OpenAiCompatible,
    /// Google-style endpoint that separates system prompt from turns.
    Google,
    /// OpenAI-compatible endpoint reachable over plain local HTTP (no auth
    /// header required, but one may still be configured).
    LocalHttp,
}

/// All providers known at build time. Whether one is *active* for a given
/// request additionally depends on environment, settings, and models config
/// (spec.md §4.1).
pub static KNOWN_PROVIDERS: &[ProviderDescriptor] = &[
    ProviderDescriptor {
        key: "cerebras",
        name: "Cerebras",
        api_key_env_name: "CEREBRAS_API_KEY",
        base_url: "https://api.cerebras.ai/v1",
        kind: UpstreamKind::OpenAiCompatible,
    },
    ProviderDescriptor {
        key: "groq",
        name: "Groq",
        api_key_env_name: "GROQ_API_KEY",
        base_url: "https://api.groq.com/openai/v1",
        kind: UpstreamKind::OpenAiCompatible,
    },
    ProviderDescriptor {
        key: "openrouter",
        name: "OpenRouter",
        api_key_env_name: "OPENROUTER_API_KEY",
        base_url: "https://openrouter.ai/api/v1",
        kind: UpstreamKind::OpenAiCompatible,
    },
    ProviderDescriptor {
        key: "gemini",
        name: "Gemini",
        api_key_env_name: "GEMINI_API_KEY",
        base_url: "https://generativelanguage.googleapis.com/v1beta",
        kind: UpstreamKind::Google,
    },
    ProviderDescriptor {
        key: "local",
        name: "Local",
        api_key_env_name: "LOCAL_API_KEY",
        base_url: "http://127.0.0.1:11434/v1",
        kind: UpstreamKind::LocalHttp,
    },
];

/// Look up a known provider descriptor by key.
pub fn find(key: &str) -> Option<&'static ProviderDescriptor> {
    KNOWN_PROVIDERS.iter().find(|p| p.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_are_unique() {
        let mut keys: Vec<&str> = KNOWN_PROVIDERS.iter().map(|p| p.key).collect();
        let len_before = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), len_before);
    }

    #[test]
    fn find_returns_known_provider() {
        assert_eq!(find("groq").unwrap().name, "Groq");
        assert!(find("nonexistent").is_none());
    }
}
