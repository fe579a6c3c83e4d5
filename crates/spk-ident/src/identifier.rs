// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use spk_foundation::name::PkgNameBuf;
use spk_foundation::version::Version;

use crate::{parsing, Build, Error, Result};

#[cfg(test)]
#[path = "./identifier_test.rs"]
mod identifier_test;

/// Identifies a specific package: its name, version, and (if resolved to a
/// concrete build) its build.
///
/// A single struct covers every stage a package identifier passes through
/// here (unresolved name, versioned, built) rather than a family of
/// distinct `VersionIdent`/`BuildIdent`/`AnyIdent` types, since `build` is
/// already optional: `(name, version?, build?)`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Identifier {
    name: PkgNameBuf,
    version: Version,
    build: Option<Build>,
}

impl Identifier {
    pub fn new(name: PkgNameBuf, version: Version, build: Option<Build>) -> Self {
        Self {
            name,
            version,
            build,
        }
    }

    /// An identifier for the given name with no version or build (`Version::default()`).
    pub fn new_zero(name: PkgNameBuf) -> Self {
        Self::new(name, Version::default(), None)
    }

    pub fn name(&self) -> &PkgNameBuf {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn build(&self) -> Option<&Build> {
        self.build.as_ref()
    }

    pub fn with_build(&self, build: Option<Build>) -> Self {
        Self::new(self.name.clone(), self.version.clone(), build)
    }

    pub fn is_source(&self) -> bool {
        self.build.as_ref().is_some_and(Build::is_source)
    }

    pub fn is_embedded(&self) -> bool {
        self.build.as_ref().is_some_and(Build::is_embedded)
    }

    pub fn into_inner(self) -> (PkgNameBuf, Version, Option<Build>) {
        (self.name, self.version, self.build)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.name.fmt(f)?;
        match &self.build {
            Some(build) => write!(f, "/{}/{build}", self.version),
            None => {
                if !self.version.is_zero() {
                    write!(f, "/{}", self.version)?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        parsing::parse_identifier(source)
    }
}

impl Serialize for Identifier {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
