use thiserror::Error;

pub type StatekeepResult<T> = Result<T, StatekeepError>;

/// Top-level error type for delegate, coordinator and registry operations.
///
/// Every variant is a programming error on the caller's side; nothing here is
/// transient or retriable.
#[derive(Error, Debug)]
pub enum StatekeepError {
    #[error("host does not provide the saved-state registry and lifecycle capabilities")]
    UnsupportedHost,

    #[error("field `{key}` was read before it was assigned or restored")]
    UninitializedAccess { key: String },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors raised while encoding values into a [`Record`](crate::record::Record)
/// or converting stored entries back into Rust values.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("no capability rule accepts a value of shape `{kind}` for key `{key}`")]
    UnsupportedValueType { key: String, kind: &'static str },

    #[error("container element of shape `{kind}` is not supported for key `{key}`")]
    UnsupportedElementType { key: String, kind: &'static str },

    #[error("stored value has shape `{found}`, expected `{expected}`")]
    ValueShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("archived value is a `{found}`, expected a `{expected}`")]
    WrongArchivedType {
        found: String,
        expected: &'static str,
    },

    #[error("failed to archive value: {0}")]
    Archive(#[from] bincode::error::EncodeError),

    #[error("failed to unarchive value: {0}")]
    Unarchive(#[from] bincode::error::DecodeError),
}
