//! Transparent field-level encryption for the review platform's persistence
//! layer.
//!
//! Two layers, strictly ordered:
//!
//! - [`crypto`] — the stateless AES-256-CBC field cipher, parameterised by a
//!   key and IV loaded once at process start. The only code that touches raw
//!   key material.
//! - [`store`] — a decorator around the persistence-operation interface that
//!   encrypts the fields listed in the [`registry`] before every write and
//!   decrypts them after every read.
//!
//! The [`server`] module exposes the thin ad-hoc encrypt/decrypt HTTP
//! surface; [`config`] and [`telemetry`] carry the service plumbing.

pub mod config;
pub mod crypto;
pub mod registry;
pub mod server;
pub mod store;
pub mod telemetry;
