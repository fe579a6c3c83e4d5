// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

mod candidates;
mod error;
mod solver;

pub use candidates::{enumerate_candidates, Candidate};
pub use error::{Error, OutOfOptions, Result};
pub use solver::{Solver, SolverRuntime};
