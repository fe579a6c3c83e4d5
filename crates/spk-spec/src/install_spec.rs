// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use spk_ident::Request;

use crate::{RequirementsList, Spec};

#[cfg(test)]
#[path = "./install_spec_test.rs"]
mod install_spec_test;

/// A set of structured installation parameters for a package.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InstallSpec {
    #[serde(default, skip_serializing_if = "RequirementsList::is_default")]
    pub requirements: RequirementsList,
    /// Packages whose presence is implied by this one: a full spec for
    /// each, marked as an embedded build. Resolving the parent adds them
    /// to the solution atomically.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedded: Vec<Spec>,
}

impl InstallSpec {
    pub fn is_default(&self) -> bool {
        self.requirements.is_default() && self.embedded.is_empty()
    }

    /// Add or update a requirement to the set of installation requirements.
    pub fn upsert_requirement(&mut self, request: Request) {
        self.requirements.upsert(request);
    }
}
