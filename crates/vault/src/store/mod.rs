//! Persistence-operation boundary and the encrypting decorator around it.
//!
//! # Responsibilities
//!
//! - Define the narrow [`Store`] interface the review platform's data-access
//!   layer dispatches through: one [`Request`] in, one JSON result out.
//! - Wrap any [`Store`] in [`EncryptingStore`], which encrypts registered
//!   sensitive fields on the way in and decrypts them on the way out.
//!
//! # Module invariants
//!
//! - The interceptor adds no store round trips; all transformation happens
//!   in memory on the payload or result already in flight.
//! - Plaintext field values never appear in logs — only entity kind, field
//!   name, and failure reason.

pub mod interceptor;

pub use interceptor::EncryptingStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// The operation category of a persistence call.
///
/// Write and read actions are the ones the interceptor transforms; everything
/// else (deletes, aggregates) passes through untouched because those never
/// carry registered field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    CreateMany,
    Update,
    UpdateMany,
    Upsert,
    FindUnique,
    FindFirst,
    FindMany,
    FindUniqueOrThrow,
    FindFirstOrThrow,
    Delete,
    DeleteMany,
    Count,
    Aggregate,
}

impl Action {
    /// Actions whose outgoing payload carries record fields to encrypt.
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Action::Create
                | Action::CreateMany
                | Action::Update
                | Action::UpdateMany
                | Action::Upsert
        )
    }

    /// Actions whose incoming result carries record fields to decrypt.
    pub fn is_read(self) -> bool {
        matches!(
            self,
            Action::FindUnique
                | Action::FindFirst
                | Action::FindMany
                | Action::FindUniqueOrThrow
                | Action::FindFirstOrThrow
        )
    }
}

/// An in-flight description of a single persistence call.
///
/// Constructed per call by the data-access layer, consumed synchronously by
/// the interceptor, then discarded — it holds no state across calls.
#[derive(Debug, Clone)]
pub struct Request {
    /// The entity kind the operation targets (e.g. `"SelfEvaluation"`).
    pub entity: String,
    /// The operation category.
    pub action: Action,
    /// Outgoing payload: a single record object, an array of records for the
    /// `*Many` writes, or `Null` for reads and passthrough actions.
    pub payload: Value,
}

impl Request {
    /// Build a request with a payload (write actions).
    pub fn new(entity: impl Into<String>, action: Action, payload: Value) -> Self {
        Self {
            entity: entity.into(),
            action,
            payload,
        }
    }

    /// Build a payload-less request (reads, deletes, aggregates).
    pub fn query(entity: impl Into<String>, action: Action) -> Self {
        Self::new(entity, action, Value::Null)
    }
}

/// Errors surfaced by a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A `findUniqueOrThrow`/`findFirstOrThrow` matched no record.
    #[error("no {entity} record matched the query")]
    NotFound { entity: String },

    /// The backend failed (connection, constraint, transaction, ...).
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// The narrow persistence interface the interceptor wraps.
///
/// The underlying implementation keeps whatever concurrency and transactional
/// semantics the actual store provides; the interceptor does not change them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Dispatch one persistence operation and return its JSON result:
    /// `Null`, a single record object, or an array of records.
    async fn execute(&self, request: Request) -> Result<Value, StoreError>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    async fn execute(&self, request: Request) -> Result<Value, StoreError> {
        (**self).execute(request).await
    }
}
