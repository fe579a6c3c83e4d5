// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use enum_dispatch::enum_dispatch;
use spk_foundation::version::Compatibility;
use spk_solve_graph::State;
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use crate::validators::{
    DeprecationValidator, OptionsValidator, PkgRequestValidator, PkgRequirementsValidator,
    VarRequirementsValidator,
};

#[cfg(test)]
#[path = "./validation_test.rs"]
mod validation_test;

/// A single check run against a candidate before it may be resolved.
#[enum_dispatch]
pub trait ValidatorT {
    fn validate(&self, state: &State, spec: &Spec, source: &PackageSource) -> Compatibility;
}

/// Every validator this solver knows how to run, dispatched without a
/// vtable indirection.
#[derive(Clone, Copy, Debug)]
#[enum_dispatch(ValidatorT)]
pub enum Validators {
    Deprecation(DeprecationValidator),
    PkgRequest(PkgRequestValidator),
    Options(OptionsValidator),
    VarRequirements(VarRequirementsValidator),
    PkgRequirements(PkgRequirementsValidator),
}

/// The validators run for every candidate, in the order they run.
///
/// Cheapest and most likely to reject first (deprecation, request range),
/// then the option and install-requirement consistency checks.
pub const fn default_validators() -> &'static [Validators] {
    &[
        Validators::Deprecation(DeprecationValidator),
        Validators::PkgRequest(PkgRequestValidator),
        Validators::Options(OptionsValidator),
        Validators::VarRequirements(VarRequirementsValidator),
        Validators::PkgRequirements(PkgRequirementsValidator),
    ]
}

/// Run every validator in order, stopping at the first incompatibility.
pub fn validate_all(
    validators: &[Validators],
    state: &State,
    spec: &Spec,
    source: &PackageSource,
) -> Compatibility {
    for validator in validators {
        let compat = validator.validate(state, spec, source);
        if compat.is_err() {
            return compat;
        }
    }
    Compatibility::Compatible
}
