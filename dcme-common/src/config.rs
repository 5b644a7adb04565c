//! Configuration resolution for the metadata enhancer
//!
//! All options are read from the environment once at startup into an explicit
//! `EnhancerConfig`, then passed by value to the components that need them.
//! Unparsable values fall back to the documented defaults with a warning;
//! only the API key (checked in `main`, not here) is fatal.

use tracing::warn;

/// Default authority endpoint for notation validation
pub const DEFAULT_AUTHORITY_BASE: &str = "https://iconclass.org";

/// Default vocabulary scheme name emitted with each subject
pub const DEFAULT_SCHEME: &str = "Iconclass";

/// Enhancer configuration
///
/// | env var | default |
/// |---|---|
/// | `ICONCLASS_TOP_K` | 5 |
/// | `ICONCLASS_LANG` | `de` |
/// | `ICONCLASS_VALIDATE` | `true` |
/// | `ICONCLASS_SEARCH_URL` | unset (lexical search disabled) |
/// | `ICONCLASS_ENABLE` | `true` |
#[derive(Debug, Clone)]
pub struct EnhancerConfig {
    /// Maximum number of subjects per record
    pub top_k: usize,
    /// Preferred label language, sent to the lexical search endpoint
    pub lang: String,
    /// Validate notations against the authority endpoint
    pub validate: bool,
    /// Lexical search endpoint; `None` disables that candidate source
    pub search_url: Option<String>,
    /// Classification feature flag; `false` leaves records without subjects
    pub classify_enabled: bool,
    /// Authority base URL (notation lookups and synthesized URIs)
    pub authority_base: String,
    /// Vocabulary scheme name emitted with each subject
    pub scheme: String,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            lang: "de".to_string(),
            validate: true,
            search_url: None,
            classify_enabled: true,
            authority_base: DEFAULT_AUTHORITY_BASE.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

impl EnhancerConfig {
    /// Read configuration from the environment
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let top_k = match std::env::var("ICONCLASS_TOP_K") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(n) => n,
                Err(_) => {
                    warn!(value = %raw, "ICONCLASS_TOP_K is not a number, using default");
                    defaults.top_k
                }
            },
            Err(_) => defaults.top_k,
        };

        let lang = std::env::var("ICONCLASS_LANG")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.lang);

        let validate = parse_bool_env("ICONCLASS_VALIDATE", defaults.validate);
        let classify_enabled = parse_bool_env("ICONCLASS_ENABLE", defaults.classify_enabled);

        let search_url = std::env::var("ICONCLASS_SEARCH_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        Self {
            top_k,
            lang,
            validate,
            search_url,
            classify_enabled,
            authority_base: defaults.authority_base,
            scheme: defaults.scheme,
        }
    }
}

/// Parse a boolean env var: `true`/`false` case-insensitive, default otherwise
fn parse_bool_env(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                warn!(key = key, value = %raw, "expected true/false, using default");
                default
            }
        },
        Err(_) => default,
    }
}
