//! Environment-driven client configuration and tracing setup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chronopay_application::ReferenceErrorPolicy;
use chronopay_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::{AesPermissionDecryptor, FileSessionStore, HttpBackendClient};

const DEFAULT_SESSION_FILE: &str = "session.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Runtime settings for the admin client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root without a trailing slash.
    pub api_base_url: String,
    /// JSON file holding the persisted session state.
    pub session_file: PathBuf,
    /// Hex-encoded AES-256 key for permission fields.
    pub permission_key: String,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
    /// Behaviour when a picker list fails to load.
    pub reference_error_policy: ReferenceErrorPolicy,
}

impl ClientConfig {
    /// Loads `.env` then reads the configuration from the environment.
    pub fn load() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns a variable's
    /// value when set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Validation(format!("{name} is required")))
        };

        let api_base_url = required("CHRONOPAY_API_BASE_URL")?
            .trim()
            .trim_end_matches('/')
            .to_owned();
        Url::parse(api_base_url.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "invalid CHRONOPAY_API_BASE_URL '{api_base_url}': {error}"
            ))
        })?;

        let session_file = lookup("CHRONOPAY_SESSION_FILE")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        let permission_key = required("CHRONOPAY_PERMISSION_KEY")?.trim().to_owned();
        if permission_key.len() != 64 || hex::decode(permission_key.as_str()).is_err() {
            return Err(AppError::Validation(
                "CHRONOPAY_PERMISSION_KEY must be exactly 32 bytes (64 hex chars)".to_owned(),
            ));
        }

        let http_timeout_secs = match lookup("CHRONOPAY_HTTP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|error| {
                AppError::Validation(format!(
                    "invalid CHRONOPAY_HTTP_TIMEOUT_SECS value '{value}': {error}"
                ))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if http_timeout_secs == 0 {
            return Err(AppError::Validation(
                "CHRONOPAY_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        let reference_error_policy = match lookup("CHRONOPAY_REFERENCE_ERRORS") {
            Some(value) => parse_reference_error_policy(value.as_str())?,
            None => ReferenceErrorPolicy::default(),
        };

        Ok(Self {
            api_base_url,
            session_file,
            permission_key,
            http_timeout: Duration::from_secs(http_timeout_secs),
            reference_error_policy,
        })
    }

    /// Builds the backend client for the configured API.
    pub fn http_backend_client(&self) -> AppResult<HttpBackendClient> {
        let http_client = HttpBackendClient::build_http_client(self.http_timeout)?;
        Ok(HttpBackendClient::new(http_client, self.api_base_url.as_str()))
    }

    /// Builds the permission field decryptor.
    pub fn permission_decryptor(&self) -> AppResult<AesPermissionDecryptor> {
        AesPermissionDecryptor::from_hex(self.permission_key.as_str())
    }

    /// Builds the session store over the configured file.
    #[must_use]
    pub fn session_store(&self) -> FileSessionStore {
        FileSessionStore::new(self.session_file.clone())
    }
}

fn parse_reference_error_policy(value: &str) -> AppResult<ReferenceErrorPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "surface" => Ok(ReferenceErrorPolicy::Surface),
        "silent" | "" => Ok(ReferenceErrorPolicy::Silent),
        other => Err(AppError::Validation(format!(
            "invalid CHRONOPAY_REFERENCE_ERRORS value '{other}': expected 'surface' or 'silent'"
        ))),
    }
}

/// Installs the global tracing subscriber, honouring `RUST_LOG`.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;
    use std::time::Duration;

    use chronopay_application::ReferenceErrorPolicy;
    use chronopay_core::{AppError, AppResult};

    use super::ClientConfig;

    const KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn load(pairs: &[(&str, &str)]) -> AppResult<ClientConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ClientConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn applies_defaults() -> AppResult<()> {
        let config = load(&[
            ("CHRONOPAY_API_BASE_URL", "https://payroll.example.com/api/"),
            ("CHRONOPAY_PERMISSION_KEY", KEY),
        ])?;

        assert_eq!(config.api_base_url, "https://payroll.example.com/api");
        assert_eq!(config.session_file, Path::new("session.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.reference_error_policy, ReferenceErrorPolicy::Silent);

        let client = config.http_backend_client()?;
        assert_eq!(client.base_url(), "https://payroll.example.com/api");
        assert!(config.permission_decryptor().is_ok());
        Ok(())
    }

    #[test]
    fn reads_overrides() -> AppResult<()> {
        let config = load(&[
            ("CHRONOPAY_API_BASE_URL", "http://localhost:5000"),
            ("CHRONOPAY_PERMISSION_KEY", KEY),
            ("CHRONOPAY_SESSION_FILE", "/tmp/state.json"),
            ("CHRONOPAY_HTTP_TIMEOUT_SECS", "5"),
            ("CHRONOPAY_REFERENCE_ERRORS", "Surface"),
        ])?;

        assert_eq!(config.session_store().path(), Path::new("/tmp/state.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.reference_error_policy, ReferenceErrorPolicy::Surface);
        Ok(())
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            load(&[("CHRONOPAY_PERMISSION_KEY", KEY)]),
            Err(AppError::Validation(_))
        ));
        assert!(
            load(&[
                ("CHRONOPAY_API_BASE_URL", "not a url"),
                ("CHRONOPAY_PERMISSION_KEY", KEY),
            ])
            .is_err()
        );
        assert!(
            load(&[
                ("CHRONOPAY_API_BASE_URL", "http://localhost:5000"),
                ("CHRONOPAY_PERMISSION_KEY", "abcd"),
            ])
            .is_err()
        );
        assert!(
            load(&[
                ("CHRONOPAY_API_BASE_URL", "http://localhost:5000"),
                ("CHRONOPAY_PERMISSION_KEY", KEY),
                ("CHRONOPAY_HTTP_TIMEOUT_SECS", "0"),
            ])
            .is_err()
        );
        assert!(
            load(&[
                ("CHRONOPAY_API_BASE_URL", "http://localhost:5000"),
                ("CHRONOPAY_PERMISSION_KEY", KEY),
                ("CHRONOPAY_REFERENCE_ERRORS", "loud"),
            ])
            .is_err()
        );
    }
}
