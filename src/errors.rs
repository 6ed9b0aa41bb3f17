// ABOUTME: Centralized error handling for the tool-discovery core.
// ABOUTME: Defines AppError/ErrorKind shared by the resolver, search, and tool layers.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Unified Error Handling
//!
//! A single error type, [`AppError`], is threaded through the resolver,
//! search, and built-in tool layers. Its [`ErrorKind`] enumerates exactly the
//! error kinds named in the specification: `NotFound`, `Unauthorized`,
//! `Invalid`, `Store`, `Search`, `Dispatch`, plus `Internal` for anything that
//! doesn't fit those categories.

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Category of failure, matching the error kinds named in the specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Namespace, endpoint, or tool mapping absent.
    NotFound,
    /// Caller does not own the target.
    Unauthorized,
    /// Argument validation or JSON-Schema compile failure.
    Invalid,
    /// Persistent-store error (FK, unique, connectivity).
    Store,
    /// Search-provider failure.
    Search,
    /// Upstream invocation failure via the proxy callback.
    Dispatch,
    /// Anything not covered by the categories above.
    Internal,
}

impl ErrorKind {
    /// Short, stable tag used in log fields and external error codes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Invalid => "invalid",
            Self::Store => "store",
            Self::Search => "search",
            Self::Dispatch => "dispatch",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The crate's error type.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// Category of failure.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Underlying cause, if any.
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new error with no source.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach an underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// `NotFound` convenience constructor.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, resource)
    }

    /// `Unauthorized` convenience constructor.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// `Invalid` convenience constructor.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Invalid, message)
    }

    /// `Store` convenience constructor.
    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Store, message)
    }

    /// `Search` convenience constructor.
    #[must_use]
    pub fn search(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Search, message)
    }

    /// `Dispatch` convenience constructor.
    #[must_use]
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Dispatch, message)
    }

    /// `Internal` convenience constructor.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

/// Result alias used throughout the crate.
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorKind::Invalid, format!("JSON error: {error}"))
    }
}
