use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

/// Upstream model used when `GENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-flash-latest";

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// 20MB, the same ceiling the document upload path has always used.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Instruction sent with a document when the caller gives no prompt
/// ("Please summarise the following document").
pub const DEFAULT_DOCUMENT_PROMPT: &str = "Tolong buat ringkasan dari dokumen berikut";

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
    pub api_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model identifier passed to the upstream (e.g. gemini-flash-latest)
    pub text_model: String,
    /// Upstream client timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Largest accepted file part, in bytes
    pub max_upload_bytes: usize,
    pub default_document_prompt: String,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the relay settings from a variable lookup.
    ///
    /// Only the API key is mandatory; every other setting falls back to its
    /// default, in production too.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").as_deref() == Some("prod");

        // API_KEY is the documented name; GOOGLE_API_KEY is accepted for
        // deployments that share credentials with other Google clients.
        let api_key = lookup("API_KEY")
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .filter(|key| !key.is_empty())
            .ok_or_else(|| missing_var("API_KEY", is_prod))?;

        let env_or =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(RelayConfig {
            common,
            google: GoogleConfig {
                api_key,
                api_base_url: env_or("GENAI_API_BASE_URL", DEFAULT_API_BASE_URL),
            },
            models: ModelConfig {
                text_model: env_or("GENAI_MODEL", DEFAULT_MODEL),
                request_timeout_secs: parse_var(
                    "GENAI_REQUEST_TIMEOUT_SECS",
                    lookup("GENAI_REQUEST_TIMEOUT_SECS"),
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
            },
            uploads: UploadConfig {
                max_upload_bytes: parse_var(
                    "GENAI_MAX_UPLOAD_BYTES",
                    lookup("GENAI_MAX_UPLOAD_BYTES"),
                    DEFAULT_MAX_UPLOAD_BYTES,
                )?,
                default_document_prompt: env_or(
                    "GENAI_DEFAULT_DOCUMENT_PROMPT",
                    DEFAULT_DOCUMENT_PROMPT,
                ),
            },
        })
    }

    /// Configuration with every default applied, listening on a random port.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        RelayConfig {
            common: core_config::Config { port: 0 },
            google: GoogleConfig {
                api_key: api_key.into(),
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
            },
            models: ModelConfig {
                text_model: DEFAULT_MODEL.to_string(),
                request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            uploads: UploadConfig {
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
                default_document_prompt: DEFAULT_DOCUMENT_PROMPT.to_string(),
            },
        }
    }
}

fn missing_var(key: &str, is_prod: bool) -> AppError {
    if is_prod {
        AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but not set",
            key
        ))
    } else {
        AppError::ConfigError(anyhow::anyhow!("{} is required but not set", key))
    }
}

fn parse_var<T>(key: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{} is not valid: {}", key, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn common() -> core_config::Config {
        core_config::Config { port: 3000 }
    }

    #[test]
    fn test_prod_with_only_api_key_uses_defaults() {
        let config = RelayConfig::from_lookup(
            common(),
            lookup_from(&[("ENVIRONMENT", "prod"), ("API_KEY", "secret")]),
        )
        .unwrap();

        assert_eq!(config.google.api_key, "secret");
        assert_eq!(config.google.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.models.text_model, DEFAULT_MODEL);
        assert_eq!(config.models.request_timeout_secs, 120);
        assert_eq!(config.uploads.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.uploads.default_document_prompt, DEFAULT_DOCUMENT_PROMPT);
    }

    #[test]
    fn test_missing_api_key_is_an_error_in_prod() {
        let err = RelayConfig::from_lookup(common(), lookup_from(&[("ENVIRONMENT", "prod")]))
            .unwrap_err();
        assert!(err.to_string().contains("API_KEY is required in production"));
    }

    #[test]
    fn test_missing_api_key_is_an_error_outside_prod() {
        let err = RelayConfig::from_lookup(common(), lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_google_api_key_fallback() {
        let config =
            RelayConfig::from_lookup(common(), lookup_from(&[("GOOGLE_API_KEY", "g")])).unwrap();
        assert_eq!(config.google.api_key, "g");
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = RelayConfig::from_lookup(
            common(),
            lookup_from(&[
                ("API_KEY", "k"),
                ("GENAI_MODEL", "gemini-2.0-flash"),
                ("GENAI_MAX_UPLOAD_BYTES", "1024"),
            ]),
        )
        .unwrap();
        assert_eq!(config.models.text_model, "gemini-2.0-flash");
        assert_eq!(config.uploads.max_upload_bytes, 1024);
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = RelayConfig::from_lookup(
            common(),
            lookup_from(&[("API_KEY", "k"), ("GENAI_REQUEST_TIMEOUT_SECS", "soon")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("GENAI_REQUEST_TIMEOUT_SECS is not valid"));
    }

    #[test]
    fn test_with_api_key_defaults() {
        let config = RelayConfig::with_api_key("k");
        assert_eq!(config.google.api_key, "k");
        assert_eq!(config.models.text_model, DEFAULT_MODEL);
        assert_eq!(config.uploads.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.common.port, 0);
    }
}
