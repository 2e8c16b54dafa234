use thiserror::Error;

use crate::model::ItemId;

#[derive(Error, Debug)]
pub enum StartmarksError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid parent: {0} is not an existing folder")]
    InvalidParent(ItemId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    #[error("Icon lookup error: {0}")]
    IconLookup(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StartmarksError>;
