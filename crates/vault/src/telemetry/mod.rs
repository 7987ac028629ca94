//! Tracing and OpenTelemetry setup.
//!
//! Structured JSON logs always; OTLP span export only when an endpoint is
//! configured, since the service must be able to boot with nothing but the
//! encryption key and IV.
//!
//! # Telemetry invariants
//!
//! - **No plaintext field values or key material** must appear in any span
//!   attribute, metric label, or log field. Log sites emit entity kinds,
//!   field names, and failure reasons only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
