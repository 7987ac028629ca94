//! Transparent encryption decorator around a [`Store`].
//!
//! Sits at the single choke point every persistence operation passes through.
//! Write payloads have their registered sensitive fields encrypted before the
//! inner store sees them; read results have them decrypted before the caller
//! does. Call sites never know encryption is happening.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::warn;

use crate::crypto::{Decrypted, FieldCipher};
use crate::registry::{KindFields, SensitiveFieldRegistry};

use super::{Request, Store, StoreError};

/// A [`Store`] decorator that applies the field cipher to registered
/// sensitive fields on every write and read.
///
/// Holds only immutable state; cheap to share behind an `Arc` and safe to
/// call from any number of concurrent tasks.
pub struct EncryptingStore<S> {
    inner: S,
    cipher: Arc<FieldCipher>,
    registry: Arc<SensitiveFieldRegistry>,
}

impl<S> EncryptingStore<S> {
    /// Wrap `inner` with the given cipher and registry.
    pub fn new(inner: S, cipher: Arc<FieldCipher>, registry: Arc<SensitiveFieldRegistry>) -> Self {
        Self {
            inner,
            cipher,
            registry,
        }
    }
}

#[async_trait]
impl<S: Store> Store for EncryptingStore<S> {
    async fn execute(&self, mut request: Request) -> Result<Value, StoreError> {
        let Some(fields) = self.registry.fields_for(&request.entity) else {
            // Unregistered kind: nothing to transform in either direction.
            return self.inner.execute(request).await;
        };

        if request.action.is_write() {
            for record in records_mut(&mut request.payload) {
                encrypt_record(record, fields, &self.cipher);
            }
            self.inner.execute(request).await
        } else if request.action.is_read() {
            let entity = request.entity.clone();
            let mut result = self.inner.execute(request).await?;
            for record in records_mut(&mut result) {
                decrypt_record(record, fields, &self.cipher, &entity);
            }
            Ok(result)
        } else {
            // Deletes, counts, aggregates never carry registered field values.
            self.inner.execute(request).await
        }
    }
}

/// View a payload or result as a sequence of record objects.
///
/// A single object is a sequence of one; an array yields its object elements;
/// `Null` and scalars yield nothing.
fn records_mut(value: &mut Value) -> Box<dyn Iterator<Item = &mut Map<String, Value>> + '_> {
    match value {
        Value::Object(map) => Box::new(std::iter::once(map)),
        Value::Array(items) => Box::new(items.iter_mut().filter_map(Value::as_object_mut)),
        _ => Box::new(std::iter::empty()),
    }
}

/// Encrypt the registered fields of one outgoing record in place.
///
/// Opaque fields must currently hold a string, structured fields an object or
/// array; anything else (absent, `null`, unexpected type) is left untouched.
fn encrypt_record(record: &mut Map<String, Value>, fields: &KindFields, cipher: &FieldCipher) {
    for name in fields.opaque() {
        let Some(value) = record.get_mut(name) else {
            continue;
        };
        if let Value::String(plaintext) = value {
            let encrypted = cipher.encrypt(plaintext);
            *value = Value::String(encrypted);
        }
    }

    for name in fields.structured() {
        let Some(value) = record.get_mut(name) else {
            continue;
        };
        if value.is_object() || value.is_array() {
            match serde_json::to_string(&*value) {
                Ok(serialized) => *value = Value::String(cipher.encrypt(&serialized)),
                Err(e) => {
                    warn!(field = %name, error = %e, "structured field failed to serialise; leaving unencrypted");
                }
            }
        }
    }
}

/// Decrypt the registered fields of one fetched record in place, best-effort.
fn decrypt_record(
    record: &mut Map<String, Value>,
    fields: &KindFields,
    cipher: &FieldCipher,
    entity: &str,
) {
    for name in fields.opaque() {
        let Some(value) = record.get_mut(name) else {
            continue;
        };
        if let Value::String(stored) = value {
            match cipher.decrypt(stored) {
                Decrypted::Plaintext(text) => *value = Value::String(text),
                Decrypted::Fallback { reason, .. } => {
                    // Legacy plaintext or corrupted ciphertext: serve as-is.
                    warn!(entity = %entity, field = %name, reason = %reason, "stored value not decryptable; serving unchanged");
                }
            }
        }
    }

    for name in fields.structured() {
        let Some(value) = record.get_mut(name) else {
            continue;
        };
        if let Value::String(stored) = value {
            match cipher.decrypt(stored) {
                Decrypted::Plaintext(text) => match serde_json::from_str::<Value>(&text) {
                    Ok(parsed) => *value = parsed,
                    Err(_) => {
                        warn!(entity = %entity, field = %name, "decrypted structured field is not valid JSON; serving raw text");
                        *value = Value::String(text);
                    }
                },
                Decrypted::Fallback { reason, .. } => {
                    warn!(entity = %entity, field = %name, reason = %reason, "stored value not decryptable; serving unchanged");
                }
            }
        }
    }
}
