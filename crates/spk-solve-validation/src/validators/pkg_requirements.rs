// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use spk_foundation::version::{Compatibility, IncompatibleReason};
use spk_ident::Request;
use spk_solve_graph::State;
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use crate::ValidatorT;

#[cfg(test)]
#[path = "./pkg_requirements_test.rs"]
mod pkg_requirements_test;

/// Ensures a candidate's `pkg` install requirements can be merged with
/// whatever is already pending or resolved in the state.
#[derive(Clone, Copy, Debug, Default)]
pub struct PkgRequirementsValidator;

impl ValidatorT for PkgRequirementsValidator {
    fn validate(&self, state: &State, spec: &Spec, _source: &PackageSource) -> Compatibility {
        for request in spec.install.requirements.iter() {
            let Request::Pkg(request) = request else {
                continue;
            };

            if let Some(resolved) = state.get_solution().get(request.pkg.name().as_str()) {
                if !request.pkg.is_applicable(&resolved.spec.pkg) {
                    return Compatibility::Incompatible(IncompatibleReason::RangesDoNotIntersect {
                        self_range: request.pkg.to_string(),
                        other_range: resolved.spec.pkg.to_string(),
                    });
                }
                continue;
            }

            if let Some(pending) = state
                .get_unresolved_requests()
                .iter()
                .find(|r| r.pkg.name() == request.pkg.name())
            {
                let mut merged = pending.clone();
                if let Err(err) = merged.restrict(request) {
                    return Compatibility::Incompatible(IncompatibleReason::Other(err.to_string()));
                }
            }
        }
        Compatibility::Compatible
    }
}
