// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use spk_foundation::name::OptNameBuf;
use spk_version_range::RestrictMode;

use crate::{parsing, Error, RangeIdent, Result};

#[cfg(test)]
#[path = "./request_test.rs"]
mod request_test;

/// Whether prerelease versions are considered for a package request.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum PreReleasePolicy {
    #[default]
    ExcludeAll,
    IncludeAll,
}

impl std::fmt::Display for PreReleasePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Whether a package request must be satisfied even if the package has not
/// otherwise become part of the resolved state.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum InclusionPolicy {
    #[default]
    Always,
    IfAlreadyPresent,
}

impl std::fmt::Display for InclusionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A constraint placed on a variable in the resolved environment.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct VarRequest {
    pub name: OptNameBuf,
    /// The fixed value this variable is constrained to, or `None` if it
    /// must be pinned from the build environment (see `from_build_env`).
    pub value: Option<String>,
    #[serde(default)]
    pub from_build_env: bool,
}

impl VarRequest {
    pub fn new(name: OptNameBuf, value: impl Into<String>) -> Self {
        Self {
            name,
            value: Some(value.into()),
            from_build_env: false,
        }
    }

    pub fn from_build_env(name: OptNameBuf) -> Self {
        Self {
            name,
            value: None,
            from_build_env: true,
        }
    }
}

impl std::fmt::Display for VarRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={value}", self.name),
            None => write!(f, "{}=<fromBuildEnv>", self.name),
        }
    }
}

impl FromStr for VarRequest {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        parsing::parse_var_request(source)
    }
}

/// A desired package, and the restrictions placed on which of its versions
/// and builds may be selected.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PkgRequest {
    pub pkg: RangeIdent,
    #[serde(default)]
    pub prerelease_policy: PreReleasePolicy,
    #[serde(default)]
    pub inclusion_policy: InclusionPolicy,
    /// A template describing how to pin this request's version range from
    /// the resolved build environment (e.g. `Binary`, `x.x`), if any.
    #[serde(default)]
    pub pin: Option<String>,
}

impl PkgRequest {
    pub fn new(pkg: RangeIdent) -> Self {
        Self {
            pkg,
            prerelease_policy: PreReleasePolicy::default(),
            inclusion_policy: InclusionPolicy::default(),
            pin: None,
        }
    }

    /// True if this request is at least as restrictive as `other`: anything
    /// that satisfies this request is guaranteed to satisfy `other` too.
    pub fn contains(&self, other: &Self) -> bool {
        if !self.pkg.contains(&other.pkg) {
            return false;
        }
        self.prerelease_policy >= other.prerelease_policy
            && self.inclusion_policy >= other.inclusion_policy
    }

    /// Reduce the scope of this request to the intersection with `other`.
    ///
    /// Fails with [`Error::ConflictingRequests`] if the two version ranges
    /// do not intersect.
    pub fn restrict(&mut self, other: &PkgRequest) -> Result<()> {
        self.prerelease_policy = min(self.prerelease_policy, other.prerelease_policy);
        self.inclusion_policy = min(self.inclusion_policy, other.inclusion_policy);
        let mode = if self.inclusion_policy == InclusionPolicy::IfAlreadyPresent {
            RestrictMode::AllowNonIntersectingRanges
        } else {
            RestrictMode::RequireIntersectingRanges
        };
        self.pkg.restrict(&other.pkg, mode).map_err(|err| {
            Error::ConflictingRequests {
                name: self.pkg.name().to_string(),
                reason: err.to_string(),
            }
        })
    }
}

impl std::fmt::Display for PkgRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.pkg.fmt(f)
    }
}

impl FromStr for PkgRequest {
    type Err = Error;

    fn from_str(source: &str) -> Result<Self> {
        parsing::parse_pkg_request(source)
    }
}

/// A constraint added to a resolved environment: either a package or a
/// variable request.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Request {
    Pkg(PkgRequest),
    Var(VarRequest),
}

impl Request {
    pub fn name(&self) -> &str {
        match self {
            Self::Pkg(r) => r.pkg.name().as_str(),
            Self::Var(r) => r.name.as_str(),
        }
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Pkg(r) => r.fmt(f),
            Self::Var(r) => r.fmt(f),
        }
    }
}

impl From<PkgRequest> for Request {
    fn from(req: PkgRequest) -> Self {
        Self::Pkg(req)
    }
}

impl From<VarRequest> for Request {
    fn from(req: VarRequest) -> Self {
        Self::Var(req)
    }
}
