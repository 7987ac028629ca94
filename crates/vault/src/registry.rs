//! Declarative registry of sensitive fields per entity kind.
//!
//! Each entity kind maps to two ordered lists of field names:
//!
//! - **opaque** fields hold free text and are encrypted/decrypted as-is;
//! - **structured** fields hold a JSON document that is serialised to text
//!   before encryption and parsed back after decryption.
//!
//! The registry is built once at startup and never mutated. Entity kinds not
//! present here pass through the persistence layer untouched.

use std::collections::HashMap;

use thiserror::Error;

/// Errors produced while building a [`SensitiveFieldRegistry`].
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A field name was declared both opaque and structured for one kind.
    #[error("field `{field}` of kind `{kind}` is declared both opaque and structured")]
    OverlappingField { kind: String, field: String },

    /// The same entity kind was registered twice.
    #[error("entity kind `{0}` registered more than once")]
    DuplicateKind(String),
}

/// The sensitive fields of a single entity kind.
#[derive(Debug, Clone, Default)]
pub struct KindFields {
    opaque: Vec<String>,
    structured: Vec<String>,
}

impl KindFields {
    /// Field names encrypted/decrypted as free text, in declaration order.
    pub fn opaque(&self) -> &[String] {
        &self.opaque
    }

    /// Field names serialised to JSON text before encryption.
    pub fn structured(&self) -> &[String] {
        &self.structured
    }
}

/// Immutable mapping from entity kind to its sensitive fields.
#[derive(Debug, Clone)]
pub struct SensitiveFieldRegistry {
    kinds: HashMap<String, KindFields>,
}

impl SensitiveFieldRegistry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder { kinds: Vec::new() }
    }

    /// The review platform's standard registry.
    ///
    /// Mirrors the sensitive-field table of the persistence layer. The field
    /// lists below are disjoint per kind, so this constructor is infallible;
    /// custom registries go through [`SensitiveFieldRegistry::builder`],
    /// which enforces the invariant.
    pub fn standard() -> Self {
        let mut kinds = HashMap::new();
        kinds.insert(
            "SelfEvaluation".to_owned(),
            fields(&["justification", "scoreDescription"], &[]),
        );
        kinds.insert(
            "PeerEvaluation".to_owned(),
            fields(
                &["pointsToImprove", "pointsToExplore", "motivatedToWorkAgain"],
                &[],
            ),
        );
        kinds.insert(
            "ReferenceIndication".to_owned(),
            fields(&["justification"], &[]),
        );
        kinds.insert(
            "LeaderEvaluation".to_owned(),
            fields(&["justification"], &[]),
        );
        kinds.insert(
            "EqualizationLog".to_owned(),
            fields(&["observation", "previousValue", "newValue"], &[]),
        );
        kinds.insert("AISummary".to_owned(), fields(&["content"], &[]));
        kinds.insert("AuditLog".to_owned(), fields(&[], &["details"]));
        Self { kinds }
    }

    /// Look up the sensitive fields for an entity kind.
    ///
    /// Returns `None` for kinds with no registered fields — the interceptor
    /// treats those as plain passthrough.
    pub fn fields_for(&self, kind: &str) -> Option<&KindFields> {
        self.kinds.get(kind)
    }

    /// Number of registered entity kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

fn fields(opaque: &[&str], structured: &[&str]) -> KindFields {
    KindFields {
        opaque: opaque.iter().map(|s| (*s).to_owned()).collect(),
        structured: structured.iter().map(|s| (*s).to_owned()).collect(),
    }
}

/// Builder for [`SensitiveFieldRegistry`]; validates at [`RegistryBuilder::build`].
pub struct RegistryBuilder {
    kinds: Vec<(String, KindFields)>,
}

impl RegistryBuilder {
    /// Register an entity kind with its opaque and structured field names.
    pub fn kind(mut self, name: &str, opaque: &[&str], structured: &[&str]) -> Self {
        self.kinds.push((name.to_owned(), fields(opaque, structured)));
        self
    }

    /// Finish building, checking the registry invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OverlappingField`] if a field appears in both
    /// lists for one kind, or [`RegistryError::DuplicateKind`] if a kind was
    /// registered twice.
    pub fn build(self) -> Result<SensitiveFieldRegistry, RegistryError> {
        let mut map = HashMap::new();
        for (name, kind_fields) in self.kinds {
            if let Some(field) = kind_fields
                .opaque
                .iter()
                .find(|f| kind_fields.structured.contains(f))
            {
                return Err(RegistryError::OverlappingField {
                    kind: name,
                    field: field.clone(),
                });
            }
            if map.insert(name.clone(), kind_fields).is_some() {
                return Err(RegistryError::DuplicateKind(name));
            }
        }
        Ok(SensitiveFieldRegistry { kinds: map })
    }
}
