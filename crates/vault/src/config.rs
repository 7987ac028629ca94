//! Configuration loading and validation for the encryption service.
//!
//! All values are read from environment variables at startup. The process
//! will exit with a clear error message if the key or IV is missing or
//! malformed — there is no safe default key.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::{CipherKeys, IV_LEN, KEY_LEN};

/// Validated service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Hex-encoded 256-bit encryption key (64 hex characters). **Required.**
    pub encryption_key: String,

    /// Hex-encoded 128-bit initialisation vector (32 hex characters). **Required.**
    pub encryption_iv: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP endpoint for span export. Optional; when unset only local JSON
    /// logs are emitted.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,
}

fn default_http_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENCRYPTION_KEY` or `ENCRYPTION_IV` is absent or
    /// not hex of the required length.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        decode_hex(&self.encryption_key, KEY_LEN, "ENCRYPTION_KEY")?;
        decode_hex(&self.encryption_iv, IV_LEN, "ENCRYPTION_IV")?;
        Ok(())
    }

    /// Decode the configured key and IV into cipher key material.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Config::validate`].
    pub fn cipher_keys(&self) -> Result<CipherKeys> {
        let key = decode_hex(&self.encryption_key, KEY_LEN, "ENCRYPTION_KEY")?;
        let iv = decode_hex(&self.encryption_iv, IV_LEN, "ENCRYPTION_IV")?;
        CipherKeys::from_slices(&key, &iv).context("invalid cipher key material")
    }
}

fn decode_hex(value: &str, expected_len: usize, name: &str) -> Result<Vec<u8>> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    let bytes = hex::decode(value)
        .with_context(|| format!("{name} must be valid hexadecimal"))?;
    if bytes.len() != expected_len {
        anyhow::bail!(
            "{name} must be {} hex characters ({expected_len} bytes), got {} characters",
            expected_len * 2,
            value.len()
        );
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            encryption_key: "42".repeat(KEY_LEN),
            encryption_iv: "24".repeat(IV_LEN),
            http_port: default_http_port(),
            log_level: default_log_level(),
            otel_exporter_otlp_endpoint: None,
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_http_port(), 8080);
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
        assert!(valid_config().cipher_keys().is_ok());
    }

    #[test]
    fn validate_rejects_empty_key() {
        let mut cfg = valid_config();
        cfg.encryption_key = "".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_hex_key() {
        let mut cfg = valid_config();
        cfg.encryption_key = "zz".repeat(KEY_LEN);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_short_key() {
        let mut cfg = valid_config();
        cfg.encryption_key = "42".repeat(16);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_wrong_length_iv() {
        let mut cfg = valid_config();
        cfg.encryption_iv = "24".repeat(8);
        assert!(cfg.validate().is_err());
    }
}
