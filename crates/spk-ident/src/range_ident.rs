// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use spk_foundation::name::PkgNameBuf;
use spk_version_range::{InvalidRangeError, Ranged, RestrictMode, VersionFilter};

use crate::{parsing, Build, Error, Identifier, Result};

#[cfg(test)]
#[path = "./range_ident_test.rs"]
mod range_ident_test;

/// Identifies a range of versions (and optionally a single build) of a
/// named package.
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct RangeIdent {
    name: PkgNameBuf,
    pub version: VersionFilter,
    pub build: Option<Build>,
}

impl RangeIdent {
    pub fn new(name: PkgNameBuf, version: VersionFilter, build: Option<Build>) -> Self {
        Self {
            name,
            version,
            build,
        }
    }

    pub fn name(&self) -> &PkgNameBuf {
        &self.name
    }

    pub fn is_source(&self) -> bool {
        self.build.as_ref().is_some_and(Build::is_source)
    }

    /// Return true if the given concrete identifier is applicable to this
    /// range. Applicable is not the same as satisfactory: a version may be
    /// applicable without the full package spec having been checked yet.
    pub fn is_applicable(&self, ident: &Identifier) -> bool {
        if ident.name() != &self.name {
            return false;
        }
        if self.version.is_applicable(ident.version()).is_err() {
            return false;
        }
        if self.build.is_some() && self.build.as_ref() != ident.build() {
            return false;
        }
        true
    }

    /// True if this range is at least as restrictive as `other`: anything
    /// that satisfies this range is guaranteed to satisfy `other` too.
    pub fn contains(&self, other: &RangeIdent) -> bool {
        if other.name != self.name {
            return false;
        }
        if self
            .version
            .contains(&other.version.to_version_range())
            .is_err()
        {
            return false;
        }
        other.build.is_none() || self.build == other.build || self.build.is_none()
    }

    /// Reduce this range to the intersection of it and `other`.
    pub fn restrict(
        &mut self,
        other: &RangeIdent,
        mode: RestrictMode,
    ) -> std::result::Result<(), InvalidRangeError> {
        self.version
            .restrict(&other.version.to_version_range(), mode)?;

        if other.build.is_none() {
            return Ok(());
        }
        if self.build.is_none() || self.build == other.build {
            self.build = other.build.clone();
            Ok(())
        } else {
            Err(InvalidRangeError {
                message: format!(
                    "incompatible builds for {}: {:?} != {:?}",
                    self.name, self.build, other.build
                ),
            })
        }
    }
}

impl std::fmt::Display for RangeIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.name.fmt(f)?;
        if !self.version.is_empty() {
            write!(f, "/{}", self.version)?;
        }
        if let Some(build) = &self.build {
            write!(f, "/{build}")?;
        }
        Ok(())
    }
}

impl FromStr for RangeIdent {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        parsing::parse_range_ident(source)
    }
}

impl From<Identifier> for RangeIdent {
    fn from(ident: Identifier) -> Self {
        let (name, version, build) = ident.into_inner();
        Self {
            name,
            version: VersionFilter::from(version),
            build,
        }
    }
}

impl Serialize for RangeIdent {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RangeIdent {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}
