// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use spk_repo::Digest;
use spk_spec::Spec;

use crate::Solution;

#[cfg(test)]
#[path = "./package_source_test.rs"]
mod package_source_test;

/// Where a resolved package's payload comes from.
#[derive(Clone, Debug)]
pub enum PackageSource {
    /// A prebuilt binary, found in a repository registered under `repo_name`.
    Repository {
        repo_name: String,
        components: BTreeMap<String, Digest>,
    },
    /// Must be built from source; carries the recipe and the solved
    /// environment it would be built in.
    BuildFromSource {
        recipe: Box<Spec>,
        environment: Box<Solution>,
    },
    /// Implied by another package's install requirements.
    Embedded,
}

impl PackageSource {
    pub fn is_build_from_source(&self) -> bool {
        matches!(self, Self::BuildFromSource { .. })
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded)
    }

    /// The recipe this package would be built from, if it is a source build.
    pub fn recipe(&self) -> Option<&Spec> {
        match self {
            Self::BuildFromSource { recipe, .. } => Some(recipe),
            _ => None,
        }
    }

    /// The resolved build environment, if it is a source build.
    pub fn environment(&self) -> Option<&Solution> {
        match self {
            Self::BuildFromSource { environment, .. } => Some(environment),
            _ => None,
        }
    }
}
