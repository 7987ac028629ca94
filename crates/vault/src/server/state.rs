//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::{CipherKeys, FieldCipher, IV_LEN, KEY_LEN};
use crate::registry::SensitiveFieldRegistry;

/// Application state shared across all request handlers.
///
/// Both fields are `Arc`-wrapped so that Axum can clone the state for each
/// request without copying key material or the registry.
#[derive(Clone)]
pub struct AppState {
    /// The field cipher holding the process-lifetime key material.
    pub cipher: Arc<FieldCipher>,
    /// The sensitive-field registry, reported by the health endpoint.
    pub registry: Arc<SensitiveFieldRegistry>,
}

impl AppState {
    /// Create a new [`AppState`] with the provided cipher and registry.
    pub fn new(cipher: Arc<FieldCipher>, registry: Arc<SensitiveFieldRegistry>) -> Self {
        Self { cipher, registry }
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] with a fixed throwaway key and the
    /// standard registry, suitable for tests.
    fn default() -> Self {
        Self::new(
            Arc::new(FieldCipher::new(CipherKeys::new(
                Box::new([0x42u8; KEY_LEN]),
                [0x24u8; IV_LEN],
            ))),
            Arc::new(SensitiveFieldRegistry::standard()),
        )
    }
}
