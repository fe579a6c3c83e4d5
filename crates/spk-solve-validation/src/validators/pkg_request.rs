// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use spk_foundation::version::{Compatibility, IncompatibleReason};
use spk_ident::PreReleasePolicy;
use spk_solve_graph::State;
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use crate::ValidatorT;

#[cfg(test)]
#[path = "./pkg_request_test.rs"]
mod pkg_request_test;

/// Checks a candidate against the pending request that names it: the
/// version/build range must apply, and prereleases must be allowed if the
/// candidate is one.
#[derive(Clone, Copy, Debug, Default)]
pub struct PkgRequestValidator;

impl ValidatorT for PkgRequestValidator {
    fn validate(&self, state: &State, spec: &Spec, _source: &PackageSource) -> Compatibility {
        let Some(request) = state
            .get_unresolved_requests()
            .iter()
            .find(|r| r.pkg.name() == spec.pkg.name())
        else {
            return Compatibility::Incompatible(IncompatibleReason::Other(format!(
                "package '{}' was not requested",
                spec.pkg.name()
            )));
        };

        if !request.pkg.is_applicable(&spec.pkg) {
            return Compatibility::Incompatible(IncompatibleReason::RangesDoNotIntersect {
                self_range: request.pkg.to_string(),
                other_range: spec.pkg.to_string(),
            });
        }

        if request.prerelease_policy == PreReleasePolicy::ExcludeAll
            && !spec.pkg.version().pre.is_empty()
        {
            return Compatibility::Incompatible(IncompatibleReason::PrereleasesNotAllowed);
        }

        Compatibility::Compatible
    }
}
