//! AES-256-CBC field encryption primitives.
//!
//! This module is intentionally free of HTTP and persistence dependencies.
//! It provides the low-level encrypt/decrypt operations used by the store
//! interceptor and the utility endpoints.
//!
//! # Ciphertext format
//!
//! Lowercase hexadecimal of the CBC ciphertext (PKCS#7 padded), with no
//! prefix or framing. The key and IV are fixed for the process lifetime, so
//! identical plaintexts produce identical ciphertexts. That keeps stored
//! values stable across rewrites but offers no semantic security: equality
//! of two stored values is observable to anyone who can read the store.

pub mod cipher;

pub use cipher::{CipherError, CipherKeys, DecryptFailure, Decrypted, FieldCipher, IV_LEN, KEY_LEN};
