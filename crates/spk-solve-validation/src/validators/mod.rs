// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

mod deprecation;
mod options;
mod pkg_request;
mod pkg_requirements;
mod var_requirements;

pub use deprecation::DeprecationValidator;
pub use options::OptionsValidator;
pub use pkg_request::PkgRequestValidator;
pub use pkg_requirements::PkgRequirementsValidator;
pub use var_requirements::VarRequirementsValidator;
