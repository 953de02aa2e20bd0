#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the slug crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.

use std::path::{Path, PathBuf};

/// Unified error type returned by configuration loading, slug stores and the
/// CLI.
///
/// Blank source text is never an error: slug building yields `None` instead.
/// The only error the slug algorithm itself can surface is a store failure or
/// a uniqueness violation reported by the store on commit.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading configuration or record files.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// Location of the file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse document: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when a configuration or input violates invariants.
    #[error("invalid configuration: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when writing JSON output.
    #[error("failed to serialize output: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// Returned when a sibling pattern cannot be compiled.
    #[error("failed to compile sibling pattern: {source}")]
    Pattern {
        /// Underlying regex compilation error.
        source: regex::Error
    },
    /// Returned by a store when a slug violates the scoped uniqueness
    /// constraint on commit.
    #[error("slug '{slug}' is already taken within {scope}")]
    SlugTaken {
        /// Slug that was rejected.
        slug:  String,
        /// Rendered scope value the collision happened in.
        scope: String
    },
    /// Failures reported by a backing store.
    #[error("store error: {message}")]
    Store {
        /// Human readable message describing the store failure.
        message: String
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a store error from the provided displayable value.
    pub fn store<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Store {
            message: message.into()
        }
    }

    /// Returns `true` when the error is a scoped uniqueness violation, the
    /// only failure a save retry can recover from.
    pub fn is_slug_taken(&self) -> bool {
        matches!(self, Self::SlugTaken { .. })
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<regex::Error> for Error {
    fn from(source: regex::Error) -> Self {
        Self::Pattern {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}
