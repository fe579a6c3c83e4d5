// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use spk_foundation::version::{Compatibility, IncompatibleReason};
use spk_solve_graph::State;
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use crate::ValidatorT;

#[cfg(test)]
#[path = "./deprecation_test.rs"]
mod deprecation_test;

/// Rejects deprecated builds unless the pending request names that exact
/// build, in which case the deprecation is assumed deliberate.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeprecationValidator;

impl ValidatorT for DeprecationValidator {
    fn validate(&self, state: &State, spec: &Spec, _source: &PackageSource) -> Compatibility {
        if !spec.is_deprecated() {
            return Compatibility::Compatible;
        }

        let named_exactly = state
            .get_unresolved_requests()
            .iter()
            .find(|r| r.pkg.name() == spec.pkg.name())
            .is_some_and(|r| r.pkg.build.as_ref() == spec.pkg.build());

        if named_exactly {
            Compatibility::Compatible
        } else {
            Compatibility::Incompatible(IncompatibleReason::BuildDeprecated)
        }
    }
}
