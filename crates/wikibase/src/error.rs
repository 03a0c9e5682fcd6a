//! Error types for the Wikibase data model, its JSON codec and the API glue.

use thiserror::Error;

use crate::model::PropertyId;

/// Broad error categories.
///
/// Every [`Error`] maps to exactly one kind, so callers can branch on the
/// category without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed identifier or blank required field.
    Validation,
    /// Invalid argument to a constructor, setter or parser.
    Argument,
    /// Unknown data value or entity type discriminator.
    UnsupportedType,
    /// Encoding a value whose required enum field is unset.
    InvalidState,
    /// Operation needs a server id or hash that does not exist yet.
    InvalidOperation,
    /// Keyed collection lookup of a missing key.
    KeyNotFound,
    /// Keyed collection insert of an existing key.
    DuplicateKey,
    /// Failure reported by the remote API or the transport.
    Api,
}

impl ErrorKind {
    /// Returns a short stable name for the kind (e.g. "validation").
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Argument => "argument",
            ErrorKind::UnsupportedType => "unsupported-type",
            ErrorKind::InvalidState => "invalid-state",
            ErrorKind::InvalidOperation => "invalid-operation",
            ErrorKind::KeyNotFound => "key-not-found",
            ErrorKind::DuplicateKey => "duplicate-key",
            ErrorKind::Api => "api",
        }
    }
}

/// Errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // === Validation ===
    #[error("invalid {expected} id {found:?}: must match {pattern}")]
    InvalidId {
        expected: &'static str,
        found: String,
        pattern: &'static str,
    },

    #[error("{field} must not be blank")]
    BlankField { field: &'static str },

    // === Argument ===
    #[error("{argument} must not be blank")]
    BlankArgument { argument: &'static str },

    #[error("{found:?} is not a property id")]
    NotAPropertyId { found: String },

    #[error("main snak property is immutable: expected {expected}, found {found}")]
    PropertyMismatch {
        expected: PropertyId,
        found: PropertyId,
    },

    #[error("a {snak_type} snak must carry a data value")]
    MissingDataValue { snak_type: &'static str },

    #[error("a {snak_type} snak cannot carry a data value")]
    UnexpectedDataValue { snak_type: &'static str },

    #[error("invalid snak serialization: missing {field}")]
    InvalidSnak { field: &'static str },

    #[error("unknown snak type {found:?}")]
    UnknownSnakType { found: String },

    #[error("missing field {field:?} in {context}")]
    MissingField {
        context: &'static str,
        field: &'static str,
    },

    #[error("field {field:?} in {context} must be {expected}")]
    WrongFieldType {
        context: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("invalid {field} in {context}: {reason}")]
    InvalidField {
        context: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("a reference needs at least one snak")]
    EmptyReference,

    // === Unsupported type ===
    #[error("unsupported data value type {found:?}")]
    UnsupportedDataValueType { found: String },

    #[error("unsupported entity type {found:?}")]
    UnsupportedEntityType { found: String },

    // === Invalid state ===
    #[error("{field} value not set")]
    ValueNotSet { field: &'static str },

    // === Invalid operation ===
    #[error("{object} has no id yet: save it first")]
    NotSaved { object: &'static str },

    #[error("{operation} is only available on statements")]
    NotAStatement { operation: &'static str },

    // === Keyed collections ===
    #[error("key {key:?} not found")]
    KeyNotFound { key: String },

    #[error("key {key:?} already present")]
    DuplicateKey { key: String },

    // === API ===
    #[error("api error {code}: {info}")]
    Api { code: String, info: String },

    #[error("transport failed: {0}")]
    Transport(String),

    #[error("malformed json: {0}")]
    Json(String),
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidId { .. } | Error::BlankField { .. } => ErrorKind::Validation,
            Error::BlankArgument { .. }
            | Error::NotAPropertyId { .. }
            | Error::PropertyMismatch { .. }
            | Error::MissingDataValue { .. }
            | Error::UnexpectedDataValue { .. }
            | Error::InvalidSnak { .. }
            | Error::UnknownSnakType { .. }
            | Error::MissingField { .. }
            | Error::WrongFieldType { .. }
            | Error::InvalidField { .. }
            | Error::EmptyReference => ErrorKind::Argument,
            Error::UnsupportedDataValueType { .. } | Error::UnsupportedEntityType { .. } => {
                ErrorKind::UnsupportedType
            }
            Error::ValueNotSet { .. } => ErrorKind::InvalidState,
            Error::NotSaved { .. } | Error::NotAStatement { .. } => ErrorKind::InvalidOperation,
            Error::KeyNotFound { .. } => ErrorKind::KeyNotFound,
            Error::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Error::Api { .. } | Error::Transport(_) | Error::Json(_) => ErrorKind::Api,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
