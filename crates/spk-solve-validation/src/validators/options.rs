// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use spk_foundation::version::Compatibility;
use spk_solve_graph::State;
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use crate::ValidatorT;

#[cfg(test)]
#[path = "./options_test.rs"]
mod options_test;

/// Ensures every bound variable request, global or namespaced to this
/// package, is satisfiable by the candidate's build options.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptionsValidator;

impl ValidatorT for OptionsValidator {
    fn validate(&self, state: &State, spec: &Spec, _source: &PackageSource) -> Compatibility {
        for request in state.get_var_requests() {
            let Some(value) = &request.value else {
                continue;
            };
            if value.is_empty() {
                continue;
            }

            let target_base = match request.name.namespace() {
                Some(ns) if ns.as_str() == spec.pkg.name().as_str() => request.name.base_name(),
                Some(_) => continue,
                None => request.name.as_str(),
            };

            let Some(opt) = spec
                .build
                .options
                .iter()
                .find(|opt| opt.full_name().base_name() == target_base)
            else {
                continue;
            };

            let compat = opt.validate(Some(value.as_str()));
            if compat.is_err() {
                return compat;
            }
        }
        Compatibility::Compatible
    }
}
