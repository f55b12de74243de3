//! Server configuration loaded from environment variables.
//!
//! All settings have defaults so the server starts with zero configuration
//! for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use tracing::warn;

use skillswap_shared::constants::{DEFAULT_CREDENTIAL_TTL_SECS, DEFAULT_HTTP_PORT, MAX_PAGE_SIZE};
use skillswap_shared::credential::{parse_hex_seed, CredentialSigner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl StoreBackend {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Where the signing key for bearer credentials comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum SigningKeySource {
    /// `CREDENTIAL_SIGNING_KEY`: a 32-byte seed, hex-encoded.
    Seed([u8; 32]),
    /// `CREDENTIAL_SECRET`: a passphrase run through the BLAKE3 KDF.
    Passphrase(String),
    /// Random key per process.
    Ephemeral,
}

impl std::fmt::Debug for SigningKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Seed(_) => "Seed(..)",
            Self::Passphrase(_) => "Passphrase(..)",
            Self::Ephemeral => "Ephemeral",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP API.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:5000`
    pub http_addr: SocketAddr,

    /// Env: `STORE_BACKEND` (`sqlite` or `memory`)
    /// Default: `sqlite`
    pub store_backend: StoreBackend,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: `None`, meaning `skillswap.db` in the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Env: `CREDENTIAL_SIGNING_KEY` (64 hex chars), else `CREDENTIAL_SECRET`.
    /// Default: ephemeral.
    pub signing_key: SigningKeySource,

    /// Lifetime of an issued credential, in seconds.
    /// Env: `CREDENTIAL_TTL_SECS`
    /// Default: `3600`
    pub credential_ttl_secs: i64,

    /// Upper bound on the directory page size a client may request.
    /// Env: `MAX_PAGE_SIZE`
    /// Default: `100`
    pub max_page_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            store_backend: StoreBackend::Sqlite,
            database_path: None,
            signing_key: SigningKeySource::Ephemeral,
            credential_ttl_secs: DEFAULT_CREDENTIAL_TTL_SECS,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = var("HTTP_ADDR") {
            match addr.parse::<SocketAddr>() {
                Ok(parsed) => config.http_addr = parsed,
                Err(_) => warn!(value = %addr, "Invalid HTTP_ADDR, using default"),
            }
        }

        if let Some(backend) = var("STORE_BACKEND") {
            match StoreBackend::parse(&backend) {
                Some(parsed) => config.store_backend = parsed,
                None => warn!(value = %backend, "Invalid STORE_BACKEND, using sqlite"),
            }
        }

        if let Some(path) = var("DATABASE_PATH").filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(hex_seed) = var("CREDENTIAL_SIGNING_KEY") {
            match parse_hex_seed(&hex_seed) {
                Ok(seed) => config.signing_key = SigningKeySource::Seed(seed),
                Err(e) => warn!(error = %e, "Invalid CREDENTIAL_SIGNING_KEY, ignoring"),
            }
        }
        if config.signing_key == SigningKeySource::Ephemeral {
            if let Some(secret) = var("CREDENTIAL_SECRET").filter(|s| !s.is_empty()) {
                config.signing_key = SigningKeySource::Passphrase(secret);
            }
        }

        if let Some(val) = var("CREDENTIAL_TTL_SECS") {
            match val.trim().parse::<i64>() {
                Ok(secs) if secs > 0 => config.credential_ttl_secs = secs,
                _ => warn!(value = %val, "Invalid CREDENTIAL_TTL_SECS, using default"),
            }
        }

        if let Some(val) = var("MAX_PAGE_SIZE") {
            match val.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.max_page_size = n,
                _ => warn!(value = %val, "Invalid MAX_PAGE_SIZE, using default"),
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter.

        config
    }

    pub fn credential_signer(&self) -> CredentialSigner {
        let ttl = Duration::seconds(self.credential_ttl_secs);
        match &self.signing_key {
            SigningKeySource::Seed(seed) => CredentialSigner::from_seed(seed, ttl),
            SigningKeySource::Passphrase(secret) => {
                CredentialSigner::from_passphrase(secret.as_bytes(), ttl)
            }
            SigningKeySource::Ephemeral => {
                warn!(
                    "No CREDENTIAL_SIGNING_KEY or CREDENTIAL_SECRET set; using an ephemeral key. \
                     Credentials will not survive a restart."
                );
                CredentialSigner::generate(ttl)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use skillswap_shared::UserId;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]);
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 5000).into());
        assert_eq!(config.store_backend, StoreBackend::Sqlite);
        assert_eq!(config.database_path, None);
        assert_eq!(config.signing_key, SigningKeySource::Ephemeral);
        assert_eq!(config.credential_ttl_secs, 3600);
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn test_overrides() {
        let seed = "ab".repeat(32);
        let config = config_from(&[
            ("HTTP_ADDR", "127.0.0.1:8081"),
            ("STORE_BACKEND", "Memory"),
            ("DATABASE_PATH", "/tmp/swap.db"),
            ("CREDENTIAL_SIGNING_KEY", &seed),
            ("CREDENTIAL_SECRET", "ignored when a seed is set"),
            ("CREDENTIAL_TTL_SECS", "60"),
            ("MAX_PAGE_SIZE", "25"),
        ]);
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 8081).into());
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/swap.db")));
        assert_eq!(config.signing_key, SigningKeySource::Seed([0xab; 32]));
        assert_eq!(config.credential_ttl_secs, 60);
        assert_eq!(config.max_page_size, 25);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("HTTP_ADDR", "localhost"),
            ("STORE_BACKEND", "postgres"),
            ("CREDENTIAL_SIGNING_KEY", "abcd"),
            ("CREDENTIAL_TTL_SECS", "-5"),
            ("MAX_PAGE_SIZE", "0"),
        ]);
        let defaults = ServerConfig::default();
        assert_eq!(config.http_addr, defaults.http_addr);
        assert_eq!(config.store_backend, StoreBackend::Sqlite);
        assert_eq!(config.signing_key, SigningKeySource::Ephemeral);
        assert_eq!(config.credential_ttl_secs, defaults.credential_ttl_secs);
        assert_eq!(config.max_page_size, defaults.max_page_size);
    }

    #[test]
    fn test_configured_keys_are_stable_across_restarts() {
        let seed = "01".repeat(32);
        let first = config_from(&[("CREDENTIAL_SIGNING_KEY", &seed)]).credential_signer();
        let second = config_from(&[("CREDENTIAL_SIGNING_KEY", &seed)]).credential_signer();
        let token = first.issue(UserId::new()).unwrap();
        assert!(second.verify(&token).is_ok());

        let a = config_from(&[("CREDENTIAL_SECRET", "hunter2")]).credential_signer();
        let b = config_from(&[("CREDENTIAL_SECRET", "hunter2")]).credential_signer();
        assert!(b.verify(&a.issue(UserId::new()).unwrap()).is_ok());
    }

    #[test]
    fn test_debug_hides_key_material() {
        let config = config_from(&[("CREDENTIAL_SECRET", "hunter2")]);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("Passphrase(..)"));
    }
}
