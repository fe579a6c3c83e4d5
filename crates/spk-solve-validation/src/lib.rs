// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

mod error;
mod validation;
mod validators;

pub use error::{Error, Result};
pub use validation::{default_validators, validate_all, ValidatorT, Validators};
pub use validators::{
    DeprecationValidator, OptionsValidator, PkgRequestValidator, PkgRequirementsValidator,
    VarRequirementsValidator,
};
