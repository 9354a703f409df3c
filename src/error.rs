//! Error types for sorrel.

use thiserror::Error;

/// Result type alias using [`SorrelError`].
pub type Result<T> = std::result::Result<T, SorrelError>;

/// Errors surfaced by the indexing and query engine.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum SorrelError {
    /// The field is not declared sortable in the schema.
    #[error("field '{0}' not sortable")]
    FieldNotSortable(String),

    /// The field is not declared text-searchable in the schema.
    #[error("field '{0}' not text-searchable")]
    FieldNotTextSearchable(String),

    /// An ordering option other than `asc`/`desc` was given.
    #[error("unknown order option '{0}'")]
    UnknownOrderOption(String),

    /// The value has no natural order and cannot be scored for an index.
    #[error("{0} value has no score")]
    UnscorableValue(String),

    /// An explicitly supplied record id collides with a live record.
    #[error("record id {0} already exists")]
    DuplicateId(u64),

    /// A secondary-index write failed partway through a field write.
    ///
    /// Sub-writes completed before the failure are not rolled back; the
    /// record hash and its index entries may diverge until the field is
    /// written again.
    #[error("index write failed: {0}")]
    IndexWriteFailed(String),

    /// The underlying store could not be reached or refused the command.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Caller misuse that is neither a store nor a schema failure.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SorrelError {
    pub fn field_not_sortable(field: impl Into<String>) -> Self {
        SorrelError::FieldNotSortable(field.into())
    }

    pub fn field_not_text_searchable(field: impl Into<String>) -> Self {
        SorrelError::FieldNotTextSearchable(field.into())
    }

    pub fn unknown_order(option: impl Into<String>) -> Self {
        SorrelError::UnknownOrderOption(option.into())
    }

    pub fn unscorable(kind: impl Into<String>) -> Self {
        SorrelError::UnscorableValue(kind.into())
    }

    pub fn index_write(message: impl Into<String>) -> Self {
        SorrelError::IndexWriteFailed(message.into())
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        SorrelError::StoreUnavailable(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        SorrelError::InvalidArgument(message.into())
    }
}
