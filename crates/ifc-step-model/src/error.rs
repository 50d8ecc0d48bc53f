// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for STEP reading, writing and model editing

use crate::EntityId;
use thiserror::Error;

/// Result type alias for model and codec operations
pub type Result<T> = std::result::Result<T, StepError>;

/// Errors that can occur while reading, linking or editing a STEP model
///
/// Some variants are also used as non-fatal diagnostics: the reader collects
/// them in its report and keeps going, leaving the offending value absent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepError {
    /// Invalid STEP file layout (missing sections, garbage between records)
    #[error("Invalid STEP format: {0}")]
    InvalidFormat(String),

    /// Failed to parse header section
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Failed to tokenize an entity record
    #[error("Failed to parse entity {0}: {1}")]
    EntityParse(EntityId, String),

    /// Entity type name is not part of the schema
    #[error("Unknown entity type {type_name} for entity {entity}")]
    UnknownEntityType { entity: EntityId, type_name: String },

    /// Abstract entity types cannot be instantiated
    #[error("Entity type {type_name} is abstract and cannot be instantiated (entity {entity})")]
    AbstractEntity { entity: EntityId, type_name: String },

    /// Entity id is already used in the model
    #[error("Entity {0} already exists in model")]
    DuplicateEntity(EntityId),

    /// Entity not found
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// Argument count of a record does not match the schema arity
    #[error(
        "Wrong parameter count for entity {type_name}, expecting {expected}, having {actual}. Entity ID: {entity}"
    )]
    ArgumentCount {
        entity: EntityId,
        type_name: String,
        expected: usize,
        actual: usize,
    },

    /// Reference to an id that does not exist in the model
    #[error("Entity {entity} attribute {attribute}: referenced entity {target} not found")]
    UnresolvedReference {
        entity: EntityId,
        attribute: String,
        target: EntityId,
    },

    /// Value does not fit the attribute kind
    #[error(
        "Type mismatch at entity {entity} attribute {attribute}: expected {expected}, got {actual}"
    )]
    TypeMismatch {
        entity: EntityId,
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Enumeration token outside the closed set
    #[error("Invalid enumeration value .{value}. for {enumeration} at entity {entity} attribute {attribute}")]
    InvalidEnumeration {
        entity: EntityId,
        attribute: String,
        enumeration: String,
        value: String,
    },

    /// Attribute name not declared for the entity type
    #[error("Entity type {type_name} has no attribute {attribute}")]
    UnknownAttribute { type_name: String, attribute: String },

    /// Mandatory attribute without a value
    #[error("Entity {entity} attribute {attribute} is mandatory but absent")]
    MissingAttribute { entity: EntityId, attribute: String },

    /// No id left above the largest id in use
    #[error("No entity id left above {0}")]
    IdSpaceExhausted(EntityId),

    /// Entity was built against a different schema than the model
    #[error("Entity {entity} uses schema {entity_schema}, model uses {model_schema}")]
    SchemaMismatch {
        entity: EntityId,
        entity_schema: String,
        model_schema: String,
    },

    /// Inverse list does not match the forward references
    #[error("Inverse {inverse} of entity {entity}: {message}")]
    InverseMismatch {
        entity: EntityId,
        inverse: String,
        message: String,
    },

    /// IO error (stored as text so diagnostics stay cloneable)
    #[error("IO error: {0}")]
    Io(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl StepError {
    /// Create a new format error
    pub fn format(msg: impl Into<String>) -> Self {
        StepError::InvalidFormat(msg.into())
    }

    /// Create a new entity parse error
    pub fn entity_parse(id: EntityId, msg: impl Into<String>) -> Self {
        StepError::EntityParse(id, msg.into())
    }

    /// Create a type mismatch error
    pub fn type_mismatch(
        entity: EntityId,
        attribute: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        StepError::TypeMismatch {
            entity,
            attribute: attribute.to_string(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        StepError::Other(msg.into())
    }

    /// Entity the error refers to, if any
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            StepError::EntityParse(id, _)
            | StepError::DuplicateEntity(id)
            | StepError::EntityNotFound(id)
            | StepError::IdSpaceExhausted(id) => Some(*id),
            StepError::UnknownEntityType { entity, .. }
            | StepError::AbstractEntity { entity, .. }
            | StepError::ArgumentCount { entity, .. }
            | StepError::UnresolvedReference { entity, .. }
            | StepError::TypeMismatch { entity, .. }
            | StepError::InvalidEnumeration { entity, .. }
            | StepError::MissingAttribute { entity, .. }
            | StepError::SchemaMismatch { entity, .. }
            | StepError::InverseMismatch { entity, .. } => Some(*entity),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StepError {
    fn from(err: std::io::Error) -> Self {
        StepError::Io(err.to_string())
    }
}
