// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error("conflicting requests for {name}: {reason}")]
    ConflictingRequests { name: String, reason: String },
    #[error(transparent)]
    InvalidName(#[from] spk_foundation::name::InvalidNameError),
    #[error(transparent)]
    InvalidVersion(#[from] spk_foundation::version::InvalidVersionError),
    #[error(transparent)]
    InvalidRange(#[from] spk_version_range::InvalidRangeError),
    #[error("invalid build: {0}")]
    InvalidBuild(String),
    #[error("{0}")]
    String(String),
}

impl From<&str> for Error {
    fn from(err: &str) -> Error {
        Error::String(err.to_owned())
    }
}

impl Error {
    /// Wraps an error message with a prefix, creating a contextual but generic error.
    pub fn wrap<S: AsRef<str>>(prefix: S, err: Self) -> Self {
        Error::String(format!("{}: {}", prefix.as_ref(), err))
    }
}
