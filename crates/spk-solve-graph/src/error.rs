// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Ident(#[from] spk_ident::Error),
    #[error("{name} is already resolved in this state")]
    DuplicatePackage { name: String },
    #[error("solver search exhausted without a solution")]
    FailedToResolve(Box<crate::Graph>),
    #[error("{0}")]
    String(String),
}

impl From<&str> for Error {
    fn from(err: &str) -> Error {
        Error::String(err.to_owned())
    }
}
