// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use spk_foundation::version::{Compatibility, IncompatibleReason};
use spk_ident::Request;
use spk_solve_graph::State;
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use crate::ValidatorT;

#[cfg(test)]
#[path = "./var_requirements_test.rs"]
mod var_requirements_test;

/// Ensures a candidate's `var` install requirements agree with whatever
/// value is already bound for that variable in the state's options.
#[derive(Clone, Copy, Debug, Default)]
pub struct VarRequirementsValidator;

impl ValidatorT for VarRequirementsValidator {
    fn validate(&self, state: &State, spec: &Spec, _source: &PackageSource) -> Compatibility {
        for request in spec.install.requirements.iter() {
            let Request::Var(request) = request else {
                continue;
            };
            let Some(requested) = &request.value else {
                continue;
            };

            for (name, value) in state.get_options().iter() {
                if value.is_empty() {
                    continue;
                }
                if name.base_name() != request.name.base_name() {
                    continue;
                }
                // An unqualified bound value applies everywhere; a
                // qualified one only applies to the package it names.
                if name.namespace().is_some() && name != &request.name {
                    continue;
                }
                if requested != value {
                    return Compatibility::Incompatible(IncompatibleReason::VarRequirementMismatch {
                        var: request.name.to_string(),
                        requested: requested.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        Compatibility::Compatible
    }
}
