// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use miette::Diagnostic;
use spk_ident::PkgRequest;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Diagnostic, Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] spk_solve_graph::Error),
    #[error(transparent)]
    Ident(#[from] spk_ident::Error),
    #[error("{0}")]
    OutOfOptions(OutOfOptions),
    #[error("package '{0}' not found in any repository")]
    PackageNotFound(PkgRequest),
    #[error(transparent)]
    Repo(#[from] spk_repo::Error),
    #[error("solver was interrupted: {0}")]
    SolverInterrupted(String),
    #[error("{0}")]
    String(String),
}

impl From<&str> for Error {
    fn from(err: &str) -> Error {
        Error::String(err.to_owned())
    }
}

/// A pending request for which no candidate build satisfied every validator.
#[derive(Debug, Clone)]
pub struct OutOfOptions {
    pub request: PkgRequest,
    pub notes: Vec<spk_solve_graph::Note>,
}

impl std::fmt::Display for OutOfOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "out of options for {}", self.request.pkg)
    }
}
