use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSTAND_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSTAND_CONFIG_DIR";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub storefront: StorefrontSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Default to repo root `config` directory.
                std::env::current_dir()
                    .map(|cwd| cwd.join("config"))
                    .unwrap_or_else(|_| PathBuf::from("config"))
            });

        let base_path = config_dir.join("base.toml");
        let environment_filename = format!("{}.toml", environment);
        let environment_path = config_dir.join(environment_filename);

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(config::Environment::with_prefix("BOOKSTAND").separator("_"));

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // Override environment field with parsed enum variant.
        settings.environment = match environment.as_str() {
            "local" => Environment::Local,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(anyhow!(
                    "unsupported environment '{}'; expected local/staging/production",
                    other
                ));
            }
        };

        // The generator credential is a plain environment secret, never a
        // config-file entry. Absence is tolerated here: the generator client
        // degrades to its "service unavailable" state instead of failing load.
        if settings.generator.api_key.is_none() {
            settings.generator.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.is_empty());
        }

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Settings for the catalog generator client.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorSettings {
    #[serde(default = "GeneratorSettings::default_model")]
    pub model: String,
    #[serde(default = "GeneratorSettings::default_api_base")]
    pub api_base: String,
    #[serde(default = "GeneratorSettings::default_timeout_ms")]
    pub timeout_ms: u64,
    /// Credential for the generative-text service; filled from the
    /// `GEMINI_API_KEY` environment variable when absent.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl GeneratorSettings {
    fn default_model() -> String {
        "gemini-2.5-flash".to_string()
    }

    fn default_api_base() -> String {
        "https://generativelanguage.googleapis.com".to_string()
    }

    fn default_timeout_ms() -> u64 {
        30000
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            api_base: Self::default_api_base(),
            timeout_ms: Self::default_timeout_ms(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontSettings {
    /// Cosmetic admin gate, compared verbatim against the prompted string.
    /// Not a security boundary.
    #[serde(default = "StorefrontSettings::default_admin_password")]
    pub admin_password: String,
}

impl StorefrontSettings {
    fn default_admin_password() -> String {
        "2086".to_string()
    }
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        Self {
            admin_password: Self::default_admin_password(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_generator_targets_flash_model() {
        let settings = Settings::default();
        assert_eq!(settings.generator.model, "gemini-2.5-flash");
        assert!(settings.generator.api_key.is_none());
    }

    #[test]
    fn default_admin_password_matches_gate() {
        let settings = Settings::default();
        assert_eq!(settings.storefront.admin_password, "2086");
    }
}
