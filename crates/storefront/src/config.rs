//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## General
//! - `CATZO_DATA_DIR` - Directory for local snapshots (default: .catzo)
//! - `SHOP_PHONE` - Shop phone number quoted in confirmations (default: 8637498818)
//! - `SHOP_EMAIL` - Shop email quoted in confirmations (default: catzowithao@gmail.com)
//!
//! ## Supabase (optional block; required by catalog and order commands)
//! - `SUPABASE_URL` - Project URL (e.g., <https://abcd.supabase.co>)
//! - `SUPABASE_ANON_KEY` - Public anon API key
//! - `SUPABASE_ACCESS_TOKEN` - Signed-in user's access token (optional)
//!
//! ## EmailJS (optional block; order confirmations are skipped without it)
//! - `EMAILJS_SERVICE_ID` - Email service ID
//! - `EMAILJS_TEMPLATE_ID` - Order confirmation template ID
//! - `EMAILJS_PUBLIC_KEY` - Public key
//! - `EMAILJS_PRIVATE_KEY` - Private access token
//!
//! A block is enabled by its first variable (`SUPABASE_URL`,
//! `EMAILJS_SERVICE_ID`); once enabled, its other required variables must be
//! present.

use std::collections::HashMap;
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".catzo";
const DEFAULT_SHOP_PHONE: &str = "8637498818";
const DEFAULT_SHOP_EMAIL: &str = "catzowithao@gmail.com";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding local snapshots such as the cart
    pub data_dir: PathBuf,
    /// Shop contact details quoted in confirmations
    pub shop: ShopContact,
    /// Supabase configuration, if enabled
    pub supabase: Option<SupabaseConfig>,
    /// EmailJS configuration, if enabled
    pub emailjs: Option<EmailJsConfig>,
}

/// Shop contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopContact {
    pub phone: String,
    pub email: String,
}

impl Default for ShopContact {
    fn default() -> Self {
        Self {
            phone: DEFAULT_SHOP_PHONE.to_string(),
            email: DEFAULT_SHOP_EMAIL.to_string(),
        }
    }
}

/// Supabase project configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL
    pub url: Url,
    /// Public anon API key (sent as `apikey`)
    pub anon_key: SecretString,
    /// Signed-in user's access token (sent as bearer token when present)
    pub access_token: Option<SecretString>,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url.as_str())
            .field("anon_key", &"[REDACTED]")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// EmailJS configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    /// Public key (safe to expose in browser)
    pub public_key: String,
    /// Private access token (server-side only)
    pub private_key: SecretString,
}

impl std::fmt::Debug for EmailJsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailJsConfig")
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an enabled block is incomplete, a value is
    /// invalid, or a secret fails validation (placeholder detection,
    /// entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let data_dir = PathBuf::from(env.or_default("CATZO_DATA_DIR", DEFAULT_DATA_DIR));
        let shop = ShopContact {
            phone: env.or_default("SHOP_PHONE", DEFAULT_SHOP_PHONE),
            email: env.or_default("SHOP_EMAIL", DEFAULT_SHOP_EMAIL),
        };
        let supabase = SupabaseConfig::from_env(&env)?;
        let emailjs = EmailJsConfig::from_env(&env)?;

        Ok(Self {
            data_dir,
            shop,
            supabase,
            emailjs,
        })
    }

    /// Supabase configuration, or an error naming the variable that enables it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if Supabase is not configured.
    pub fn require_supabase(&self) -> Result<&SupabaseConfig, ConfigError> {
        self.supabase
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("SUPABASE_URL".to_string()))
    }
}

impl SupabaseConfig {
    fn from_env(env: &Env<'_>) -> Result<Option<Self>, ConfigError> {
        let Some(raw_url) = env.optional("SUPABASE_URL") else {
            return Ok(None);
        };

        let url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SUPABASE_URL".to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "SUPABASE_URL".to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        Ok(Some(Self {
            url,
            anon_key: env.validated_secret("SUPABASE_ANON_KEY")?,
            access_token: env.optional("SUPABASE_ACCESS_TOKEN").map(SecretString::from),
        }))
    }
}

impl EmailJsConfig {
    fn from_env(env: &Env<'_>) -> Result<Option<Self>, ConfigError> {
        let Some(service_id) = env.optional("EMAILJS_SERVICE_ID") else {
            return Ok(None);
        };

        Ok(Some(Self {
            service_id,
            template_id: env.required("EMAILJS_TEMPLATE_ID")?,
            public_key: env.required("EMAILJS_PUBLIC_KEY")?,
            private_key: env.validated_secret("EMAILJS_PRIVATE_KEY")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the helpers every block uses.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real keys and tokens have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the provider."
            ),
        ));
    }

    Ok(())
}

/// Expose a secret for use in an HTTP header.
pub(crate) fn expose(secret: &SecretString) -> &str {
    secret.expose_secret()
}
