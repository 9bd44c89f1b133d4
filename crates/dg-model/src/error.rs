//! Model construction and loading errors.

use std::path::PathBuf;

use crate::entity::{EntityId, EntityKind};

/// Error building or loading an entity model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// An entity refers to an id outside the model.
    #[error("Entity {entity:?} refers to missing entity #{}", .target.index())]
    DanglingReference {
        /// Name of the referring entity.
        entity: String,
        /// Missing id.
        target: EntityId,
    },
    /// An entity refers to an entity of the wrong kind.
    #[error("Entity {entity:?} expects a {} at #{}", .expected.as_str(), .target.index())]
    KindMismatch {
        entity: String,
        target: EntityId,
        expected: EntityKind,
    },
    /// Following outer scopes from an entity loops back on itself.
    #[error("Scope chain of {entity:?} is cyclic")]
    CyclicScope {
        /// Name of an entity on the cycle.
        entity: String,
    },
    /// Model file could not be read.
    #[error("Failed to read model {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Model JSON is malformed.
    #[error("Model parse error: {0}")]
    Json(#[from] serde_json::Error),
}
