// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use spk_foundation::name::{OptName, OptNameBuf, PkgName, PkgNameBuf};
use spk_foundation::version::Compatibility;
use spk_ident::{PreReleasePolicy, Request, VarRequest};

use crate::{Error, Result};

#[cfg(test)]
#[path = "./option_test.rs"]
mod option_test;

/// Defines the way a build option is inherited by downstream packages.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize, PartialOrd, Ord)]
pub enum Inheritance {
    /// Not inherited by downstream packages unless redefined.
    #[default]
    Weak,
    /// Inherited by downstream packages as a build option only.
    StrongForBuildOnly,
    /// Inherited by downstream packages as both a build option and an
    /// install requirement.
    Strong,
}

impl std::fmt::Display for Inheritance {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// An option that can be given to a package's build process.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(untagged)]
pub enum Opt {
    Pkg(PkgOpt),
    Var(VarOpt),
}

impl Opt {
    /// The name of this option with any associated namespace.
    pub fn full_name(&self) -> &OptName {
        match self {
            Self::Pkg(opt) => opt.pkg.as_opt_name(),
            Self::Var(opt) => &opt.var,
        }
    }

    /// The package namespace of this option, if any.
    pub fn namespace(&self) -> Option<&PkgName> {
        match self {
            Self::Pkg(opt) => Some(&opt.pkg),
            Self::Var(opt) => opt.var.namespace(),
        }
    }

    pub fn inheritance(&self) -> Inheritance {
        match self {
            Self::Pkg(_) => Inheritance::Weak,
            Self::Var(opt) => opt.inheritance,
        }
    }

    /// Validate a candidate value against this option's constraints, given
    /// a value already bound in the resolving state (if any).
    pub fn validate(&self, value: Option<&str>) -> Compatibility {
        match self {
            Self::Pkg(opt) => opt.validate(value),
            Self::Var(opt) => opt.validate(value),
        }
    }

    /// The effective value of this option: an explicitly assigned value,
    /// else the given value, else the option's default.
    pub fn get_value(&self, given: Option<&str>) -> Option<String> {
        match self {
            Self::Pkg(opt) => opt.get_value(given),
            Self::Var(opt) => opt.get_value(given),
        }
    }

    /// Assign a static value to this option, freezing it for future lookups.
    pub fn set_value(&mut self, value: String) -> Result<()> {
        match self {
            Self::Pkg(opt) => opt.set_value(value),
            Self::Var(opt) => opt.set_value(value),
        }
    }

    pub fn is_pkg(&self) -> bool {
        matches!(self, Self::Pkg(_))
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Self::Var(_))
    }
}

impl<'de> Deserialize<'de> for Opt {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        /// Captures all fields that could be valid for either variant
        /// before deciding, at the end, which variant to build. The
        /// presence of the `pkg` or `var` key is the discriminator.
        #[derive(Default)]
        struct OptVisitor {
            pkg: Option<PkgNameBuf>,
            prerelease_policy: Option<PreReleasePolicy>,

            var: Option<OptNameBuf>,
            choices: Option<IndexSet<String>>,
            inheritance: Option<Inheritance>,

            default: Option<String>,
            value: Option<String>,
        }

        impl<'de> serde::de::Visitor<'de> for OptVisitor {
            type Value = Opt;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a pkg or var build option")
            }

            fn visit_map<A>(mut self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "pkg" => self.pkg = Some(map.next_value::<PkgNameBuf>()?),
                        "var" => self.var = Some(map.next_value::<OptNameBuf>()?),
                        "prereleasePolicy" => {
                            self.prerelease_policy = Some(map.next_value::<PreReleasePolicy>()?)
                        }
                        "choices" => self.choices = Some(map.next_value::<IndexSet<String>>()?),
                        "inheritance" => {
                            self.inheritance = Some(map.next_value::<Inheritance>()?)
                        }
                        "default" => self.default = Some(map.next_value::<String>()?),
                        "static" => self.value = Some(map.next_value::<String>()?),
                        _ => {
                            map.next_value::<serde::de::IgnoredAny>()?;
                        }
                    }
                }

                match (self.pkg, self.var) {
                    (Some(pkg), None) => Ok(Opt::Pkg(PkgOpt {
                        pkg,
                        default: self.default.unwrap_or_default(),
                        prerelease_policy: self.prerelease_policy.unwrap_or_default(),
                        value: self.value,
                    })),
                    (None, Some(var)) => Ok(Opt::Var(VarOpt {
                        var,
                        default: self.default.unwrap_or_default(),
                        choices: self.choices.unwrap_or_default(),
                        inheritance: self.inheritance.unwrap_or_default(),
                        value: self.value,
                    })),
                    (Some(_), Some(_)) => Err(serde::de::Error::custom(
                        "could not determine option type, it may only contain one of the `pkg` or `var` fields",
                    )),
                    (None, None) => Err(serde::de::Error::custom(
                        "could not determine option type, it must include either a `pkg` or `var` field",
                    )),
                }
            }
        }

        deserializer.deserialize_map(OptVisitor::default())
    }
}

/// A build option naming a variable value, e.g. `debug=on`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct VarOpt {
    pub var: OptNameBuf,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default: String,
    #[serde(skip_serializing_if = "IndexSet::is_empty")]
    pub choices: IndexSet<String>,
    #[serde(skip_serializing_if = "Inheritance::is_default_copy")]
    pub inheritance: Inheritance,
    #[serde(rename = "static", skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

trait IsDefaultCopy: Copy + Default + PartialEq {
    fn is_default_copy(&self) -> bool {
        *self == Self::default()
    }
}
impl IsDefaultCopy for Inheritance {}

impl Ord for VarOpt {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.var.cmp(&other.var) {
            std::cmp::Ordering::Equal => {}
            ord => return ord,
        }
        match self.default.cmp(&other.default) {
            std::cmp::Ordering::Equal => {}
            ord => return ord,
        }
        match self.choices.iter().cmp(other.choices.iter()) {
            std::cmp::Ordering::Equal => {}
            ord => return ord,
        }
        match self.inheritance.cmp(&other.inheritance) {
            std::cmp::Ordering::Equal => {}
            ord => return ord,
        }
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for VarOpt {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl VarOpt {
    pub fn new(var: OptNameBuf) -> Self {
        Self {
            var,
            default: String::default(),
            choices: IndexSet::default(),
            inheritance: Inheritance::default(),
            value: None,
        }
    }

    pub fn get_value(&self, given: Option<&str>) -> Option<String> {
        if let Some(v) = &self.value {
            return Some(v.clone());
        }
        given
            .map(String::from)
            .or_else(|| (!self.default.is_empty()).then(|| self.default.clone()))
    }

    pub fn set_value(&mut self, value: String) -> Result<()> {
        if !self.choices.is_empty() && !value.is_empty() && !self.choices.contains(&value) {
            return Err(Error::String(format!(
                "invalid value '{}' for option '{}', must be one of {:?}",
                value, self.var, self.choices
            )));
        }
        self.value = Some(value);
        Ok(())
    }

    pub fn validate(&self, value: Option<&str>) -> Compatibility {
        if value.is_none() {
            if let Some(assigned) = &self.value {
                return self.validate(Some(assigned.as_str()));
            }
        }
        match (value, self.value.as_deref()) {
            (None, _) => Compatibility::Compatible,
            (Some(value), Some(assigned)) => {
                if value == assigned {
                    Compatibility::Compatible
                } else {
                    Compatibility::Incompatible(
                        spk_foundation::version::IncompatibleReason::VarOptionMismatch {
                            option: self.var.to_string(),
                            value: value.to_string(),
                            reason: format!("wanted '{assigned}'"),
                        },
                    )
                }
            }
            (Some(value), None) => {
                if !self.choices.is_empty() && !self.choices.contains(value) {
                    Compatibility::Incompatible(
                        spk_foundation::version::IncompatibleReason::VarOptionMismatch {
                            option: self.var.to_string(),
                            value: value.to_string(),
                            reason: format!("must be one of {:?}", self.choices),
                        },
                    )
                } else {
                    Compatibility::Compatible
                }
            }
        }
    }

    pub fn to_request(&self, given_value: Option<&str>) -> VarRequest {
        VarRequest::new(self.var.clone(), self.get_value(given_value).unwrap_or_default())
    }
}

/// A build option naming a dependency on another package, e.g. `python`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PkgOpt {
    pub pkg: PkgNameBuf,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default: String,
    #[serde(
        rename = "prereleasePolicy",
        skip_serializing_if = "PreReleasePolicy::is_default_copy"
    )]
    pub prerelease_policy: PreReleasePolicy,
    #[serde(rename = "static", skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl IsDefaultCopy for PreReleasePolicy {}

impl PkgOpt {
    pub fn new(pkg: PkgNameBuf) -> Self {
        Self {
            pkg,
            default: String::default(),
            prerelease_policy: PreReleasePolicy::default(),
            value: None,
        }
    }

    pub fn get_value(&self, given: Option<&str>) -> Option<String> {
        if let Some(v) = &self.value {
            return Some(v.clone());
        }
        given
            .map(String::from)
            .or_else(|| Some(self.default.clone()))
    }

    pub fn set_value(&mut self, value: String) -> Result<()> {
        if !value.is_empty() {
            spk_version_range::VersionFilter::from_str(&value).map_err(|err| {
                Error::wrap(
                    format!(
                        "invalid value '{}' for option '{}', not a valid version range",
                        value, self.pkg
                    ),
                    Error::InvalidRange(err),
                )
            })?;
        }
        self.value = Some(value);
        Ok(())
    }

    pub fn validate(&self, value: Option<&str>) -> Compatibility {
        let value = value.unwrap_or_default();
        let Some(base) = &self.value else {
            return Compatibility::Compatible;
        };
        let base_range = match spk_version_range::VersionFilter::from_str(base) {
            Ok(r) => r,
            Err(err) => {
                return Compatibility::Incompatible(
                    spk_foundation::version::IncompatibleReason::Other(format!(
                        "invalid value '{base}' for option '{}': {err}",
                        self.pkg
                    )),
                )
            }
        };
        match spk_version_range::VersionFilter::from_str(value) {
            Ok(value_range) => {
                use spk_version_range::Ranged;
                if value_range.intersects(&base_range.to_version_range()).is_ok() {
                    Compatibility::Compatible
                } else {
                    Compatibility::Incompatible(
                        spk_foundation::version::IncompatibleReason::Other(format!(
                            "invalid value '{value}' for option '{}', does not intersect '{base}'",
                            self.pkg
                        )),
                    )
                }
            }
            Err(err) => Compatibility::Incompatible(
                spk_foundation::version::IncompatibleReason::Other(format!(
                    "invalid value '{value}' for option '{}': {err}",
                    self.pkg
                )),
            ),
        }
    }

    /// Build a `PkgRequest` for the dependency described by this option.
    pub fn to_request(&self, given_value: Option<&str>) -> Result<spk_ident::PkgRequest> {
        let value = self.get_value(given_value).unwrap_or_default();
        let ident_range = if value.is_empty() {
            self.pkg.to_string()
        } else {
            format!("{}/{value}", self.pkg)
        };
        let pkg = spk_ident::RangeIdent::from_str(&ident_range)?;
        let mut request = spk_ident::PkgRequest::new(pkg);
        request.prerelease_policy = self.prerelease_policy;
        Ok(request)
    }
}

impl TryFrom<Request> for Opt {
    type Error = Error;

    /// Create a build option from a matching request, e.g. when promoting
    /// an install requirement into a build option of the same name.
    fn try_from(request: Request) -> Result<Opt> {
        match request {
            Request::Pkg(request) => {
                let default = if request.pkg.version.is_empty() {
                    String::new()
                } else {
                    request.pkg.version.to_string()
                };
                Ok(Opt::Pkg(PkgOpt {
                    pkg: request.pkg.name().clone(),
                    default,
                    prerelease_policy: request.prerelease_policy,
                    value: None,
                }))
            }
            Request::Var(request) => Ok(Opt::Var(VarOpt {
                var: request.name,
                default: request.value.unwrap_or_default(),
                choices: Default::default(),
                inheritance: Default::default(),
                value: None,
            })),
        }
    }
}
