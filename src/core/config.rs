//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.lucky/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! API keys come from the file or the environment; none are compiled in.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::inference::GenerationParams;
use crate::{Capability, ProviderKind};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LuckyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub together: ProviderConfig,
    #[serde(default)]
    pub huggingface: ProviderConfig,
    #[serde(default)]
    pub gemini: ProviderConfig,
    #[serde(default)]
    pub relay: RelayConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub primary: Option<String>,
    pub fallback: Option<String>,
    pub greeting: Option<String>,
    pub system_prompt: Option<String>,
    pub system_prompt_file: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub reveal: Option<bool>,
    pub reveal_interval_ms: Option<u64>,
    pub capabilities: Option<Vec<Capability>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RelayConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub bucket: Option<String>,
    pub transcribe_function: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TOGETHER_BASE_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_TOGETHER_MODEL: &str = "meta-llama/Llama-3-8b-chat-hf";
pub const DEFAULT_HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_HUGGINGFACE_MODEL: &str = "meta-llama/Llama-3-8b-chat-hf";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_BUCKET: &str = "chat_attachments";
pub const DEFAULT_TRANSCRIBE_FUNCTION: &str = "transcribe-audio";
pub const DEFAULT_REVEAL_INTERVAL_MS: u64 = 20;

pub const DEFAULT_GREETING: &str = "Hello! 👋 Lucky is here. How can I help you today?";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Lucky, a helpful and friendly AI assistant. \
    Respond to users in a conversational, natural way. \
    Keep responses concise but informative.";

// ============================================================================
// Resolved Config (concrete values, no Options except genuinely optional ones)
// ============================================================================

/// Connection settings for one completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

/// Object storage + transcription function endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaySettings {
    pub url: String,
    pub anon_key: String,
    pub bucket: String,
    pub transcribe_function: String,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub primary: ProviderKind,
    pub fallback: Option<ProviderKind>,
    pub together: ProviderSettings,
    pub huggingface: ProviderSettings,
    pub gemini: ProviderSettings,
    pub greeting: String,
    pub system_prompt: String,
    pub params: GenerationParams,
    pub reveal: bool,
    pub reveal_interval: Duration,
    pub capabilities: Vec<Capability>,
    pub relay: Option<RelaySettings>,
}

impl ResolvedConfig {
    pub fn provider(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Together => &self.together,
            ProviderKind::HuggingFace => &self.huggingface,
            ProviderKind::Gemini => &self.gemini,
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// Values taken from command-line flags (None = not specified).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub provider: Option<ProviderKind>,
    pub fallback: Option<ProviderKind>,
    pub model: Option<String>,
    pub no_reveal: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// The named provider has no API key in the config file or environment.
    MissingApiKey(ProviderKind),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::MissingApiKey(kind) => write!(
                f,
                "no API key for {}: set {} or [{}] api_key in {}",
                kind.label(),
                api_key_env(*kind),
                kind.label(),
                config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "~/.lucky/config.toml".to_string()),
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Environment variable holding the API key for `kind`.
pub fn api_key_env(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Together => "TOGETHER_API_KEY",
        ProviderKind::HuggingFace => "HF_API_KEY",
        ProviderKind::Gemini => "GEMINI_API_KEY",
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.lucky/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".lucky").join("config.toml"))
}

/// Load config from `~/.lucky/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `LuckyConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<LuckyConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(LuckyConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(LuckyConfig::default());
    }

    load_config_from(&path)
}

/// Parses a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<LuckyConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: LuckyConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: general={:?} relay bucket={:?}", config.general, config.relay.bucket);
    Ok(config)
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Lucky Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# primary = "together"               # "together", "huggingface" or "gemini"
# fallback = "gemini"                # tried once if the primary fails; "none" to disable
# greeting = "Hello! 👋 Lucky is here. How can I help you today?"
# system_prompt = "You are Lucky, a helpful and friendly AI assistant."
# system_prompt_file = "system.md"   # Path relative to ~/.lucky/
# temperature = 0.7
# max_tokens = 800
# reveal = true                      # word-by-word typing effect for replies
# reveal_interval_ms = 20
# capabilities = ["text", "attachment", "voice"]

# [together]
# api_key = "..."                    # Or set TOGETHER_API_KEY env var
# base_url = "https://api.together.xyz/v1"
# model = "meta-llama/Llama-3-8b-chat-hf"

# [huggingface]
# api_key = "hf_..."                 # Or set HF_API_KEY env var
# base_url = "https://api-inference.huggingface.co"
# model = "meta-llama/Llama-3-8b-chat-hf"

# [gemini]
# api_key = "..."                    # Or set GEMINI_API_KEY env var
# base_url = "https://generativelanguage.googleapis.com/v1beta"
# model = "gemini-pro"

# [relay]                            # attachments and voice dictation
# url = "https://<project>.supabase.co"   # Or set SUPABASE_URL env var
# anon_key = "..."                   # Or set SUPABASE_ANON_KEY env var
# bucket = "chat_attachments"
# transcribe_function = "transcribe-audio"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_TEMPLATE) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &LuckyConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &LuckyConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Primary: CLI → env → config → default
    let primary = cli
        .provider
        .or_else(|| {
            env("LUCKY_PRIMARY")
                .or_else(|| config.general.primary.clone())
                .and_then(|name| parse_provider_name(&name, "primary"))
        })
        .unwrap_or_default();

    // Fallback: CLI → env → config; "none" disables
    let fallback = match cli.fallback {
        Some(kind) => Some(kind),
        None => env("LUCKY_FALLBACK")
            .or_else(|| config.general.fallback.clone())
            .and_then(|name| match name.trim() {
                "" | "none" => None,
                name => parse_provider_name(name, "fallback"),
            }),
    };
    let fallback = match fallback {
        Some(kind) if kind == primary => {
            warn!("Fallback provider is the same as primary ({}), ignoring it", kind.label());
            None
        }
        other => other,
    };

    let mut together = provider_settings(
        &config.together,
        &env,
        ProviderKind::Together,
        DEFAULT_TOGETHER_BASE_URL,
        DEFAULT_TOGETHER_MODEL,
    );
    let mut huggingface = provider_settings(
        &config.huggingface,
        &env,
        ProviderKind::HuggingFace,
        DEFAULT_HUGGINGFACE_BASE_URL,
        DEFAULT_HUGGINGFACE_MODEL,
    );
    let mut gemini = provider_settings(
        &config.gemini,
        &env,
        ProviderKind::Gemini,
        DEFAULT_GEMINI_BASE_URL,
        DEFAULT_GEMINI_MODEL,
    );

    // Model override applies to the primary provider only
    if let Some(model) = cli.model.clone().or_else(|| env("LUCKY_MODEL")) {
        let settings = match primary {
            ProviderKind::Together => &mut together,
            ProviderKind::HuggingFace => &mut huggingface,
            ProviderKind::Gemini => &mut gemini,
        };
        settings.model = model;
    }

    let relay = resolve_relay(&config.relay, &env);

    let mut capabilities = config
        .general
        .capabilities
        .clone()
        .unwrap_or_else(|| vec![Capability::Text, Capability::Attachment, Capability::Voice]);
    if !capabilities.contains(&Capability::Text) {
        capabilities.insert(0, Capability::Text);
    }
    if relay.is_none() {
        capabilities.retain(|c| *c == Capability::Text);
    }

    let reveal_interval_ms = config
        .general
        .reveal_interval_ms
        .unwrap_or(DEFAULT_REVEAL_INTERVAL_MS)
        .max(1);

    let defaults = GenerationParams::default();

    ResolvedConfig {
        primary,
        fallback,
        together,
        huggingface,
        gemini,
        greeting: config
            .general
            .greeting
            .clone()
            .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
        system_prompt: resolve_system_prompt(config),
        params: GenerationParams {
            temperature: config.general.temperature.unwrap_or(defaults.temperature),
            max_tokens: config.general.max_tokens.unwrap_or(defaults.max_tokens),
        },
        reveal: !cli.no_reveal && config.general.reveal.unwrap_or(true),
        reveal_interval: Duration::from_millis(reveal_interval_ms),
        capabilities,
        relay,
    }
}

fn parse_provider_name(name: &str, role: &str) -> Option<ProviderKind> {
    let kind = ProviderKind::parse(name);
    if kind.is_none() {
        warn!("Unknown {} provider '{}', ignoring", role, name);
    }
    kind
}

fn provider_settings(
    section: &ProviderConfig,
    env: &impl Fn(&str) -> Option<String>,
    kind: ProviderKind,
    default_base_url: &str,
    default_model: &str,
) -> ProviderSettings {
    ProviderSettings {
        // API key: env → config
        api_key: env(api_key_env(kind))
            .or_else(|| section.api_key.clone())
            .filter(|k| !k.trim().is_empty()),
        base_url: section
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url.to_string()),
        model: section
            .model
            .clone()
            .unwrap_or_else(|| default_model.to_string()),
    }
}

/// The relay is only available when both its URL and key are known.
fn resolve_relay(
    section: &RelayConfig,
    env: &impl Fn(&str) -> Option<String>,
) -> Option<RelaySettings> {
    let url = env("SUPABASE_URL").or_else(|| section.url.clone())?;
    let anon_key = env("SUPABASE_ANON_KEY").or_else(|| section.anon_key.clone())?;
    Some(RelaySettings {
        url: url.trim_end_matches('/').to_string(),
        anon_key,
        bucket: section
            .bucket
            .clone()
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        transcribe_function: section
            .transcribe_function
            .clone()
            .unwrap_or_else(|| DEFAULT_TRANSCRIBE_FUNCTION.to_string()),
    })
}

/// Resolves the system prompt: inline wins over file, both win over default.
fn resolve_system_prompt(config: &LuckyConfig) -> String {
    if let Some(ref prompt) = config.general.system_prompt {
        return prompt.clone();
    }

    // Try loading from system_prompt_file (relative to ~/.lucky/)
    if let Some(ref file) = config.general.system_prompt_file
        && let Some(home) = dirs::home_dir()
    {
        let prompt_path = home.join(".lucky").join(file);
        match fs::read_to_string(&prompt_path) {
            Ok(contents) => {
                let trimmed = contents.trim().to_string();
                if !trimmed.is_empty() {
                    info!("Loaded system prompt from {}", prompt_path.display());
                    return trimmed;
                }
                warn!("System prompt file is empty: {}", prompt_path.display());
            }
            Err(e) => {
                warn!(
                    "Failed to read system prompt file {}: {}",
                    prompt_path.display(),
                    e
                );
            }
        }
    }

    DEFAULT_SYSTEM_PROMPT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&LuckyConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.primary, ProviderKind::Together);
        assert_eq!(resolved.fallback, None);
        assert_eq!(resolved.together.model, DEFAULT_TOGETHER_MODEL);
        assert_eq!(resolved.together.api_key, None);
        assert_eq!(resolved.greeting, DEFAULT_GREETING);
        assert!(resolved.system_prompt.starts_with("You are Lucky"));
        assert_eq!(resolved.params, GenerationParams::default());
        assert!(resolved.reveal);
        assert_eq!(resolved.reveal_interval, Duration::from_millis(20));
        assert!(resolved.relay.is_none());
        assert_eq!(resolved.capabilities, vec![Capability::Text]);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = LuckyConfig {
            general: GeneralConfig {
                primary: Some("gemini".to_string()),
                fallback: Some("hf".to_string()),
                greeting: Some("Hey.".to_string()),
                system_prompt: Some("Custom prompt.".to_string()),
                temperature: Some(0.2),
                max_tokens: Some(256),
                reveal: Some(false),
                reveal_interval_ms: Some(50),
                ..Default::default()
            },
            gemini: ProviderConfig {
                api_key: Some("g-key".to_string()),
                model: Some("gemini-1.5-flash".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.primary, ProviderKind::Gemini);
        assert_eq!(resolved.fallback, Some(ProviderKind::HuggingFace));
        assert_eq!(resolved.gemini.api_key.as_deref(), Some("g-key"));
        assert_eq!(resolved.gemini.model, "gemini-1.5-flash");
        assert_eq!(resolved.greeting, "Hey.");
        assert_eq!(resolved.system_prompt, "Custom prompt.");
        assert_eq!(resolved.params.temperature, 0.2);
        assert_eq!(resolved.params.max_tokens, 256);
        assert!(!resolved.reveal);
        assert_eq!(resolved.reveal_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_env_wins_over_config_and_cli_wins_over_env() {
        let config = LuckyConfig {
            general: GeneralConfig {
                primary: Some("gemini".to_string()),
                ..Default::default()
            },
            together: ProviderConfig {
                api_key: Some("from-file".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = env_from(&[
            ("LUCKY_PRIMARY", "huggingface"),
            ("TOGETHER_API_KEY", "from-env"),
        ]);

        let resolved = resolve_with_env(&config, &CliOverrides::default(), &env);
        assert_eq!(resolved.primary, ProviderKind::HuggingFace);
        assert_eq!(resolved.together.api_key.as_deref(), Some("from-env"));

        let cli = CliOverrides {
            provider: Some(ProviderKind::Together),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, &env);
        assert_eq!(resolved.primary, ProviderKind::Together);
    }

    #[test]
    fn test_model_override_applies_to_primary_only() {
        let cli = CliOverrides {
            provider: Some(ProviderKind::HuggingFace),
            fallback: Some(ProviderKind::Together),
            model: Some("mistralai/Mixtral-8x7B-Instruct-v0.1".to_string()),
            no_reveal: false,
        };
        let resolved = resolve_with_env(&LuckyConfig::default(), &cli, no_env);
        assert_eq!(resolved.huggingface.model, "mistralai/Mixtral-8x7B-Instruct-v0.1");
        assert_eq!(resolved.together.model, DEFAULT_TOGETHER_MODEL);
    }

    #[test]
    fn test_fallback_none_and_same_as_primary_are_dropped() {
        let env = env_from(&[("LUCKY_FALLBACK", "none")]);
        let config = LuckyConfig {
            general: GeneralConfig {
                fallback: Some("gemini".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(resolve_with_env(&config, &CliOverrides::default(), env).fallback, None);

        let cli = CliOverrides {
            provider: Some(ProviderKind::Gemini),
            ..Default::default()
        };
        assert_eq!(resolve_with_env(&config, &cli, no_env).fallback, None);
    }

    #[test]
    fn test_unknown_provider_name_falls_back_to_default() {
        let env = env_from(&[("LUCKY_PRIMARY", "perplexity")]);
        let resolved = resolve_with_env(&LuckyConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.primary, ProviderKind::Together);
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let env = env_from(&[("GEMINI_API_KEY", "   ")]);
        let resolved = resolve_with_env(&LuckyConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.gemini.api_key, None);
    }

    #[test]
    fn test_no_reveal_flag_disables_reveal() {
        let cli = CliOverrides {
            no_reveal: true,
            ..Default::default()
        };
        let resolved = resolve_with_env(&LuckyConfig::default(), &cli, no_env);
        assert!(!resolved.reveal);
    }

    #[test]
    fn test_relay_enables_attachment_and_voice() {
        let env = env_from(&[
            ("SUPABASE_URL", "https://proj.supabase.co/"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]);
        let resolved = resolve_with_env(&LuckyConfig::default(), &CliOverrides::default(), env);
        let relay = resolved.relay.clone().unwrap();
        assert_eq!(relay.url, "https://proj.supabase.co");
        assert_eq!(relay.bucket, DEFAULT_BUCKET);
        assert_eq!(relay.transcribe_function, DEFAULT_TRANSCRIBE_FUNCTION);
        assert!(resolved.has_capability(Capability::Attachment));
        assert!(resolved.has_capability(Capability::Voice));
    }

    #[test]
    fn test_capabilities_always_include_text() {
        let config = LuckyConfig {
            general: GeneralConfig {
                capabilities: Some(vec![Capability::Voice]),
                ..Default::default()
            },
            relay: RelayConfig {
                url: Some("http://localhost:54321".to_string()),
                anon_key: Some("anon".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.capabilities, vec![Capability::Text, Capability::Voice]);
    }

    #[test]
    fn test_toml_parses_all_sections() {
        let toml_str = r#"
[general]
primary = "together"
fallback = "gemini"
reveal_interval_ms = 30
capabilities = ["text", "attachment"]

[together]
api_key = "tg-test-123"

[gemini]
model = "gemini-1.5-pro"

[relay]
url = "https://proj.supabase.co"
bucket = "uploads"
"#;
        let config: LuckyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.primary.as_deref(), Some("together"));
        assert_eq!(config.general.reveal_interval_ms, Some(30));
        assert_eq!(
            config.general.capabilities,
            Some(vec![Capability::Text, Capability::Attachment])
        );
        assert_eq!(config.together.api_key.as_deref(), Some("tg-test-123"));
        assert_eq!(config.gemini.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.relay.bucket.as_deref(), Some("uploads"));
        assert!(config.huggingface.api_key.is_none());
    }

    #[test]
    fn test_default_template_is_valid_toml() {
        let config: LuckyConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(config.general.primary.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("lucky-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[general\nprimary = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_api_key_message_names_env_var() {
        let msg = ConfigError::MissingApiKey(ProviderKind::HuggingFace).to_string();
        assert!(msg.contains("HF_API_KEY"));
        assert!(msg.contains("[huggingface]"));
    }
}
