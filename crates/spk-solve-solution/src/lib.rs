// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

mod error;
mod package_source;
mod solution;

pub use error::{Error, Result};
pub use package_source::PackageSource;
pub use solution::{SolvedRequest, Solution};
