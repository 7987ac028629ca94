//! Axum request handlers for the encryption utility endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DecryptTextRequest, DecryptTextResponse, EncryptTextRequest, EncryptTextResponse,
    ErrorResponse, HealthResponse,
};
use tracing::warn;

use super::state::AppState;
use crate::crypto::Decrypted;

/// `POST /utils/encryption/encrypt` — encrypt an ad-hoc text value.
///
/// Returns the lowercase-hex ciphertext of the request's `text`.
pub async fn encrypt(
    State(state): State<AppState>,
    Json(req): Json<EncryptTextRequest>,
) -> Response {
    let encrypted = state.cipher.encrypt(&req.text);
    (StatusCode::OK, Json(EncryptTextResponse { encrypted })).into_response()
}

/// `POST /utils/encryption/decrypt` — decrypt an ad-hoc ciphertext.
///
/// Best-effort, matching the persistence layer: a value that cannot be
/// decrypted is returned unchanged rather than producing an error.
pub async fn decrypt(
    State(state): State<AppState>,
    Json(req): Json<DecryptTextRequest>,
) -> Response {
    let decrypted = match state.cipher.decrypt(&req.encrypted_text) {
        Decrypted::Plaintext(text) => text,
        Decrypted::Fallback { original, reason } => {
            warn!(reason = %reason, "decrypt request fell back to original value");
            original
        }
    };
    (StatusCode::OK, Json(DecryptTextResponse { decrypted })).into_response()
}

/// `GET /health` — liveness and readiness check.
///
/// The cipher is constructed before the server starts, so readiness reduces
/// to the registry being populated.
pub async fn health(State(state): State<AppState>) -> Response {
    let registered_kinds = state.registry.len();
    let (status_code, status_str) = if registered_kinds > 0 {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        registered_kinds,
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        routing::post,
        Router,
    };
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new()
            .route("/utils/encryption/encrypt", post(encrypt))
            .route("/utils/encryption/decrypt", post(decrypt))
            .with_state(AppState::default())
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    #[tokio::test]
    async fn encrypt_then_decrypt_round_trip() {
        let body = serde_json::json!({"text": "Este é um texto super secreto!"}).to_string();
        let (status, encrypted) =
            post_json(test_router(), "/utils/encryption/encrypt", &body).await;
        assert_eq!(status, StatusCode::OK);

        let ciphertext = encrypted["encrypted"].as_str().unwrap();
        assert!(ciphertext.len() % 2 == 0);
        assert!(ciphertext
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(ciphertext, "Este é um texto super secreto!");

        let body = serde_json::json!({ "encryptedText": ciphertext }).to_string();
        let (status, decrypted) =
            post_json(test_router(), "/utils/encryption/decrypt", &body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(decrypted["decrypted"], "Este é um texto super secreto!");
    }

    #[tokio::test]
    async fn decrypt_garbage_returns_input_unchanged() {
        let body = serde_json::json!({"encryptedText": "not-a-valid-hex-ciphertext"}).to_string();
        let (status, decrypted) =
            post_json(test_router(), "/utils/encryption/decrypt", &body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(decrypted["decrypted"], "not-a-valid-hex-ciphertext");
    }

    #[tokio::test]
    async fn encrypt_rejects_malformed_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/utils/encryption/encrypt")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"wrong": 1}"#))
            .unwrap();
        let resp = test_router().oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn health_reports_registered_kinds() {
        let app = Router::new()
            .route("/health", axum::routing::get(health))
            .with_state(AppState::default());
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["registered_kinds"], 7);
    }
}
