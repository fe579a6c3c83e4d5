// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use spk_foundation::version::Compat;
use spk_ident::Identifier;

use crate::{BuildSpec, Error, InstallSpec, Result, SourceSpec, TestSpec};

#[cfg(test)]
#[path = "./spec_test.rs"]
mod spec_test;

/// The complete definition of a package: its identity, compatibility
/// contract, sources, build process, tests and install requirements.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Spec {
    pub pkg: Identifier,
    #[serde(default, skip_serializing_if = "Spec::is_default_compat")]
    pub compat: Compat,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceSpec>,
    #[serde(default, skip_serializing_if = "BuildSpec::is_default")]
    pub build: BuildSpec,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestSpec>,
    #[serde(default, skip_serializing_if = "InstallSpec::is_default")]
    pub install: InstallSpec,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Spec {
    /// Create a new, empty spec for the given identifier.
    pub fn new(pkg: Identifier) -> Self {
        Self {
            pkg,
            compat: Compat::default(),
            deprecated: false,
            sources: Vec::new(),
            build: BuildSpec::default(),
            tests: Vec::new(),
            install: InstallSpec::default(),
        }
    }

    fn is_default_compat(compat: &Compat) -> bool {
        compat == &Compat::default()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    pub fn deprecate(&mut self) {
        self.deprecated = true;
    }

    pub fn undeprecate(&mut self) {
        self.deprecated = false;
    }

    /// Validate invariants that span more than one field of the spec.
    fn validate(&self) -> Result<()> {
        let pkg_name = self.pkg.name().as_str();
        for request in self.install.requirements.iter() {
            if request.name() == pkg_name {
                return Err(Error::Validation(format!(
                    "install requirement '{pkg_name}' must not share a name with the package itself"
                )));
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Spec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Unchecked {
            pkg: Identifier,
            #[serde(default)]
            compat: Compat,
            #[serde(default)]
            deprecated: bool,
            #[serde(default)]
            sources: Vec<SourceSpec>,
            #[serde(default)]
            build: BuildSpec,
            #[serde(default)]
            tests: Vec<TestSpec>,
            #[serde(default)]
            install: InstallSpec,
        }

        let raw = Unchecked::deserialize(deserializer)?;
        let spec = Spec {
            pkg: raw.pkg,
            compat: raw.compat,
            deprecated: raw.deprecated,
            sources: raw.sources,
            build: raw.build,
            tests: raw.tests,
            install: raw.install,
        };
        spec.validate().map_err(serde::de::Error::custom)?;
        Ok(spec)
    }
}
