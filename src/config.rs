//! Configuration types, built from environment variables.

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::{DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_MODEL, LlmConfig, prompts};
use crate::notify::{DEFAULT_RESEND_BASE_URL, NotifyBackend, NotifyConfig, SmtpConfig};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8787;

/// Default public origin of the site the form lives on.
pub const DEFAULT_SITE_ORIGIN: &str = "https://socialtradingvlog.com";

/// Default sender used when `FROM_EMAIL` is unset.
pub const DEFAULT_FROM_ADDRESS: &str = "SocialTradingVlog <noreply@socialtradingvlog.com>";

/// Settings describing the website the relay serves.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Display name used in email copy ("From socialtradingvlog.com").
    pub name: String,
    /// Origin allowed by CORS, e.g. `https://socialtradingvlog.com`.
    pub origin: String,
    /// Where direct submissions are redirected after processing.
    pub thanks_url: String,
}

impl SiteConfig {
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        let name = origin
            .split("://")
            .nth(1)
            .unwrap_or(&origin)
            .trim_start_matches("www.")
            .to_string();
        Self {
            thanks_url: format!("{origin}/contact-thanks.html"),
            name,
            origin,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_ORIGIN)
    }
}

/// Complete relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    pub site: SiteConfig,
    pub llm: LlmConfig,
    pub notify: NotifyConfig,
}

impl RelayConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require =
            |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.into()));

        let port = match get("RELAY_PORT") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "RELAY_PORT".into(),
                message: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let origin = get("RELAY_SITE_ORIGIN").unwrap_or_else(|| DEFAULT_SITE_ORIGIN.into());
        let mut site = SiteConfig::new(origin);
        if let Some(name) = get("RELAY_SITE_NAME") {
            site.name = name;
        }
        if let Some(thanks_url) = get("RELAY_THANKS_URL") {
            site.thanks_url = thanks_url;
        }

        let llm = LlmConfig {
            api_key: SecretString::from(require("ANTHROPIC_API_KEY")?),
            model: get("RELAY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            base_url: get("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.into()),
            system_prompt: get("RELAY_SYSTEM_PROMPT")
                .unwrap_or_else(|| prompts::SITE_CONTEXT.into()),
        };

        let backend = match get("RELAY_NOTIFY_BACKEND").as_deref() {
            None | Some("resend") => NotifyBackend::Resend {
                api_key: SecretString::from(require("RESEND_API_KEY")?),
                base_url: get("RESEND_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_RESEND_BASE_URL.into()),
            },
            Some("smtp") => {
                let port = match get("SMTP_PORT") {
                    Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                        key: "SMTP_PORT".into(),
                        message: format!("{e}"),
                    })?,
                    None => 587,
                };
                NotifyBackend::Smtp(SmtpConfig {
                    host: require("SMTP_HOST")?,
                    port,
                    username: get("SMTP_USERNAME").unwrap_or_default(),
                    password: SecretString::from(get("SMTP_PASSWORD").unwrap_or_default()),
                })
            }
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "RELAY_NOTIFY_BACKEND".into(),
                    message: format!("unknown backend '{other}' (expected 'resend' or 'smtp')"),
                });
            }
        };

        let notify = NotifyConfig {
            backend,
            to: require("NOTIFY_EMAIL")?,
            from: get("FROM_EMAIL").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.into()),
        };

        Ok(Self {
            port,
            site,
            llm,
            notify,
        })
    }
}
