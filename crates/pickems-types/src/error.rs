use std::path::PathBuf;

use thiserror::Error;

use crate::document::DocumentKind;

/// Reasons a raw string is not a valid tenant id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenantIdError {
    #[error("tenant id is empty")]
    Empty,

    #[error("tenant id is {0} characters long (max 64)")]
    TooLong(usize),

    #[error("tenant id contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// Errors from the typed document codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("malformed tagged value at '{pointer}': {message}")]
    Shape { pointer: String, message: String },

    #[error("failed to serialize document: {0}")]
    Serialize(String),
}

/// Errors from the document store and entity accessors.
///
/// An absent document is not an error; reads return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid tenant id: {0}")]
    InvalidTenant(#[from] TenantIdError),

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {kind} document: {message}")]
    Encode { kind: DocumentKind, message: String },
}

/// Errors reported by the chat-platform collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error("missing permission: {0}")]
    Forbidden(String),

    #[error("invalid platform id: '{0}'")]
    InvalidId(String),

    #[error("platform request failed: {0}")]
    Request(String),
}

/// Errors from first-time tenant bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("tenant '{0}' is already bootstrapped")]
    AlreadyBootstrapped(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("provisioning failed: {0}")]
    Platform(#[from] PlatformError),
}
