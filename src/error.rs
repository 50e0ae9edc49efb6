//! Error types for draftdown operations.

use thiserror::Error;

use crate::block::EntityKey;

/// Errors that can occur while loading or converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// A block references an entity that the entity map does not contain.
    #[error("block {block:?} references entity {key} which is missing from the entity map")]
    MissingEntity { key: EntityKey, block: String },

    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
