// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error("package not found: {0}")]
    PackageNotFound(String),
    #[error(transparent)]
    Spec(#[from] spk_spec::Error),
    #[error(transparent)]
    Ident(#[from] spk_ident::Error),
    #[error("Error: {0}")]
    String(String),
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::String(value.to_string())
    }
}
