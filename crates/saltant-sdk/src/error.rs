// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for saltant-sdk.

use thiserror::Error;

/// Result type using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors that can occur when using the saltant SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The startup authentication check was rejected.
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Transport-level failure talking to the server.
    #[error("connection error: {0}")]
    Connection(String),

    /// A bounded wait ran out of time.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// The server answered with a status code other than the one the
    /// operation expects. Carries the raw response body for diagnosis.
    #[error("request to {url} returned status {status} (expected {expected}): {body}")]
    BadRequest {
        url: String,
        status: u16,
        expected: u16,
        body: String,
    },

    /// A lookup by name matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid input (caller misuse, detected before any request is sent).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A wait was abandoned through its cancel flag.
    #[error("wait cancelled: {0}")]
    Cancelled(String),
}

impl SdkError {
    /// HTTP status of a `BadRequest`, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::BadRequest { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        SdkError::Connection(err.to_string())
    }
}

impl From<ureq::Transport> for SdkError {
    fn from(err: ureq::Transport) -> Self {
        SdkError::Connection(err.to_string())
    }
}
