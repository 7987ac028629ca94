//! Request and response types for the encryption utility endpoints.
//!
//! These types are serialised as JSON over the HTTP API. Field names follow
//! the camelCase convention of the review platform's other services.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /utils/encryption/encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptTextRequest {
    /// Plaintext to encrypt.
    pub text: String,
}

/// Successful response body for `POST /utils/encryption/encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptTextResponse {
    /// Lowercase-hex ciphertext of the request's `text`.
    pub encrypted: String,
}

// ---------------------------------------------------------------------------
// Decrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /utils/encryption/decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptTextRequest {
    /// Hex ciphertext previously produced by the encrypt endpoint or the
    /// persistence interceptor.
    pub encrypted_text: String,
}

/// Successful response body for `POST /utils/encryption/decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptTextResponse {
    /// Recovered plaintext. If the input was not decryptable it is returned
    /// unchanged (best-effort fallback).
    pub decrypted: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Number of entity kinds with sensitive fields registered.
    pub registered_kinds: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_request_round_trip() {
        let req = EncryptTextRequest {
            text: "Este é um texto super secreto!".into(),
        };
        let json = serde_json::to_string(&req).unwrap();
        let decoded: EncryptTextRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.text, req.text);
    }

    #[test]
    fn decrypt_request_uses_camel_case() {
        let decoded: DecryptTextRequest =
            serde_json::from_str(r#"{"encryptedText":"deadbeef"}"#).unwrap();
        assert_eq!(decoded.encrypted_text, "deadbeef");
        let json = serde_json::to_string(&decoded).unwrap();
        assert!(json.contains("encryptedText"));
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("bad_request", "text must not be empty");
        assert_eq!(e.code, "bad_request");
        assert!(e.message.contains("must not be empty"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            registered_kinds: 7,
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.registered_kinds, 7);
    }
}
