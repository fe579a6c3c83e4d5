// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

#![deny(unsafe_op_in_unsafe_fn)]

mod parsing;

#[cfg(test)]
#[path = "./lib_test.rs"]
mod lib_test;

use std::collections::BTreeSet;
use std::fmt::{Display, Write};
use std::str::FromStr;

use itertools::Itertools;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use spk_foundation::version::{Compat, CompatRule, Compatibility, IncompatibleReason, Version};
use thiserror::Error;

pub const VERSION_RANGE_SEP: &str = ",";

/// Denotes that a version range could not be parsed.
#[derive(Diagnostic, Debug, Error)]
#[error("invalid version range: {message}")]
pub struct InvalidRangeError {
    pub message: String,
}

impl InvalidRangeError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Anything that a package's [`Compat`] contract can be asked about: does
/// this version satisfy that range, under this compatibility requirement.
pub trait CompatProvider {
    fn version(&self) -> &Version;
    fn compat(&self) -> &Compat;
}

/// Common behavior for every kind of version range atom.
///
/// Not every range has both bounds: `>1.0` has only a lower bound, `<2.0`
/// only an upper bound. A range with neither bound matches any version.
pub trait Ranged: Display {
    /// The lower, inclusive bound for this range, if any.
    fn greater_or_equal_to(&self) -> Option<Version>;

    /// The upper, exclusive bound for this range, if any.
    fn less_than(&self) -> Option<Version>;

    /// This range's own compat requirement, if it overrides the caller's.
    fn get_compat_rule(&self) -> Option<CompatRule> {
        None
    }

    /// Whether `version` falls within this range's bounds.
    ///
    /// A version that is applicable is not necessarily satisfactory for a
    /// compat-contract range, which additionally consults the package's
    /// `Compat` field; see [`Ranged::is_satisfied_by`].
    fn is_applicable(&self, version: &Version) -> Compatibility {
        if let Some(gt) = self.greater_or_equal_to() {
            if version < &gt {
                return incompatible(format!("version too low for >= {gt}"));
            }
        }
        if let Some(lt) = self.less_than() {
            if version >= &lt {
                return incompatible(format!("version too high for < {lt}"));
            }
        }
        Compatibility::Compatible
    }

    /// Whether the given package (version + compat contract) satisfies this
    /// range under the given compat requirement.
    fn is_satisfied_by(&self, provider: &dyn CompatProvider, _required: CompatRule) -> Compatibility {
        self.is_applicable(provider.version())
    }

    /// The set of atomic rules this range decomposes to (a [`VersionFilter`]
    /// decomposes to more than one; every other range is its own only rule).
    fn rules(&self) -> BTreeSet<VersionRange> {
        BTreeSet::from([self.to_version_range()])
    }

    fn to_version_range(&self) -> VersionRange;

    /// Whether every version matching `other` also matches `self`.
    fn contains(&self, other: &VersionRange) -> Compatibility {
        if let (Some(x), Some(y)) = (self.get_compat_rule(), other.get_compat_rule()) {
            if x > y {
                return incompatible(format!(
                    "{self} has stronger compatibility requirements than {other}"
                ));
            }
        }

        let self_lower = self.greater_or_equal_to();
        let self_upper = self.less_than();
        let other_lower = other.greater_or_equal_to();
        let other_upper = other.less_than();

        match (&self_lower, &other_lower) {
            (Some(a), Some(b)) if a > b => {
                return incompatible(format!("{self} does not contain {other} [lower bound]"));
            }
            (Some(_), None) => {
                return incompatible(format!("{self} does not contain {other} [lower bound]"));
            }
            _ => {}
        }

        match (&self_upper, &other_upper) {
            (Some(a), Some(b)) if a < b => {
                return incompatible(format!("{self} does not contain {other} [upper bound]"));
            }
            (Some(_), None) => {
                return incompatible(format!("{self} does not contain {other} [upper bound]"));
            }
            _ => {}
        }

        self.intersects(other)
    }

    /// Whether the set of versions matching `self` and the set matching
    /// `other` have any overlap.
    fn intersects(&self, other: &VersionRange) -> Compatibility {
        let self_lower = self.greater_or_equal_to();
        let self_upper = self.less_than();
        let other_lower = other.greater_or_equal_to();
        let other_upper = other.less_than();

        if let (Some(su), Some(ol)) = (&self_upper, &other_lower) {
            if su <= ol {
                return incompatible(format!("{self} does not intersect with {other}"));
            }
        }
        if let (Some(ou), Some(sl)) = (&other_upper, &self_lower) {
            if ou <= sl {
                return incompatible(format!("{self} does not intersect with {other}"));
            }
        }
        Compatibility::Compatible
    }
}

fn incompatible(message: String) -> Compatibility {
    Compatibility::Incompatible(IncompatibleReason::Other(message))
}

/// A single version range expression, e.g. `>1.0`, `~2.3`, `Binary:1.0`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum VersionRange {
    Compat(CompatRange),
    Equals(EqualsVersion),
    NotEquals(NotEqualsVersion),
    GreaterThan(GreaterThanRange),
    GreaterThanOrEqualTo(GreaterThanOrEqualToRange),
    LessThan(LessThanRange),
    LessThanOrEqualTo(LessThanOrEqualToRange),
    LowestSpecified(LowestSpecifiedRange),
    Semver(SemverRange),
    Filter(VersionFilter),
}

macro_rules! dispatch {
    ($self:expr, $method:ident $(, $arg:expr)*) => {
        match $self {
            VersionRange::Compat(r) => r.$method($($arg),*),
            VersionRange::Equals(r) => r.$method($($arg),*),
            VersionRange::NotEquals(r) => r.$method($($arg),*),
            VersionRange::GreaterThan(r) => r.$method($($arg),*),
            VersionRange::GreaterThanOrEqualTo(r) => r.$method($($arg),*),
            VersionRange::LessThan(r) => r.$method($($arg),*),
            VersionRange::LessThanOrEqualTo(r) => r.$method($($arg),*),
            VersionRange::LowestSpecified(r) => r.$method($($arg),*),
            VersionRange::Semver(r) => r.$method($($arg),*),
            VersionRange::Filter(r) => r.$method($($arg),*),
        }
    };
}

impl Ranged for VersionRange {
    fn greater_or_equal_to(&self) -> Option<Version> {
        dispatch!(self, greater_or_equal_to)
    }

    fn less_than(&self) -> Option<Version> {
        dispatch!(self, less_than)
    }

    fn get_compat_rule(&self) -> Option<CompatRule> {
        dispatch!(self, get_compat_rule)
    }

    fn is_applicable(&self, version: &Version) -> Compatibility {
        dispatch!(self, is_applicable, version)
    }

    fn is_satisfied_by(&self, provider: &dyn CompatProvider, required: CompatRule) -> Compatibility {
        dispatch!(self, is_satisfied_by, provider, required)
    }

    fn rules(&self) -> BTreeSet<VersionRange> {
        dispatch!(self, rules)
    }

    fn to_version_range(&self) -> VersionRange {
        self.clone()
    }
}

impl Display for VersionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        dispatch!(self, fmt, f)
    }
}

impl FromStr for VersionRange {
    type Err = InvalidRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(VersionRange::GreaterThanOrEqualTo(
                GreaterThanOrEqualToRange::new(Version::default()),
            ));
        }
        parsing::parse_version_range(s)
    }
}

impl Serialize for VersionRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        VersionRange::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// `=1.2.3` — matches exactly this version (ignoring any unspecified
/// trailing zero parts).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct EqualsVersion {
    version: Version,
}

impl EqualsVersion {
    pub fn new(version: Version) -> Self {
        Self { version }
    }
}

impl Ranged for EqualsVersion {
    fn greater_or_equal_to(&self) -> Option<Version> {
        Some(self.version.clone())
    }

    fn less_than(&self) -> Option<Version> {
        Some(self.version.clone())
    }

    fn is_applicable(&self, other: &Version) -> Compatibility {
        if !self.version.parts_eq(other) || self.version.pre != other.pre {
            return incompatible(format!("{other} != {self}"));
        }
        Compatibility::Compatible
    }

    fn to_version_range(&self) -> VersionRange {
        VersionRange::Equals(self.clone())
    }
}

impl Display for EqualsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_char('=')?;
        f.write_str(&self.version.to_string())
    }
}

/// `!=1.2.3` — matches any version except this one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct NotEqualsVersion {
    base: Version,
}

impl NotEqualsVersion {
    pub fn new(base: Version) -> Self {
        Self { base }
    }
}

impl Ranged for NotEqualsVersion {
    fn greater_or_equal_to(&self) -> Option<Version> {
        None
    }

    fn less_than(&self) -> Option<Version> {
        None
    }

    fn is_applicable(&self, version: &Version) -> Compatibility {
        if version.parts_eq(&self.base) && version.pre == self.base.pre {
            return incompatible(format!("excluded [{self}]"));
        }
        Compatibility::Compatible
    }

    fn to_version_range(&self) -> VersionRange {
        VersionRange::NotEquals(self.clone())
    }
}

impl Display for NotEqualsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("!=")?;
        f.write_str(&self.base.to_string())
    }
}

/// `>1.2.3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct GreaterThanRange {
    bound: Version,
}

impl GreaterThanRange {
    pub fn new(bound: Version) -> Self {
        Self { bound }
    }
}

impl Ranged for GreaterThanRange {
    fn greater_or_equal_to(&self) -> Option<Version> {
        None
    }

    fn less_than(&self) -> Option<Version> {
        None
    }

    fn is_applicable(&self, version: &Version) -> Compatibility {
        if version <= &self.bound {
            return incompatible(format!("not {self} [too low]"));
        }
        Compatibility::Compatible
    }

    fn to_version_range(&self) -> VersionRange {
        VersionRange::GreaterThan(self.clone())
    }
}

impl Display for GreaterThanRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_char('>')?;
        f.write_str(&self.bound.to_string())
    }
}

/// `<1.2.3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct LessThanRange {
    bound: Version,
}

impl LessThanRange {
    pub fn new(bound: Version) -> Self {
        Self { bound }
    }
}

impl Ranged for LessThanRange {
    fn greater_or_equal_to(&self) -> Option<Version> {
        None
    }

    fn less_than(&self) -> Option<Version> {
        Some(self.bound.clone())
    }

    fn is_applicable(&self, version: &Version) -> Compatibility {
        if version >= &self.bound {
            return incompatible(format!("not {self} [too high]"));
        }
        Compatibility::Compatible
    }

    fn to_version_range(&self) -> VersionRange {
        VersionRange::LessThan(self.clone())
    }
}

impl Display for LessThanRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_char('<')?;
        f.write_str(&self.bound.to_string())
    }
}

/// `>=1.2.3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct GreaterThanOrEqualToRange {
    bound: Version,
}

impl GreaterThanOrEqualToRange {
    pub fn new(bound: Version) -> Self {
        Self { bound }
    }
}

impl Ranged for GreaterThanOrEqualToRange {
    fn greater_or_equal_to(&self) -> Option<Version> {
        Some(self.bound.clone())
    }

    fn less_than(&self) -> Option<Version> {
        None
    }

    fn is_applicable(&self, version: &Version) -> Compatibility {
        if version < &self.bound {
            return incompatible(format!("not {self} [too low]"));
        }
        Compatibility::Compatible
    }

    fn to_version_range(&self) -> VersionRange {
        VersionRange::GreaterThanOrEqualTo(self.clone())
    }
}

impl Display for GreaterThanOrEqualToRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(">=")?;
        f.write_str(&self.bound.to_string())
    }
}

/// `<=1.2.3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct LessThanOrEqualToRange {
    bound: Version,
}

impl LessThanOrEqualToRange {
    pub fn new(bound: Version) -> Self {
        Self { bound }
    }
}

impl Ranged for LessThanOrEqualToRange {
    fn greater_or_equal_to(&self) -> Option<Version> {
        None
    }

    fn less_than(&self) -> Option<Version> {
        None
    }

    fn is_applicable(&self, version: &Version) -> Compatibility {
        if version > &self.bound {
            return incompatible(format!("not {self} [too high]"));
        }
        Compatibility::Compatible
    }

    fn to_version_range(&self) -> VersionRange {
        VersionRange::LessThanOrEqualTo(self.clone())
    }
}

impl Display for LessThanOrEqualToRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("<=")?;
        f.write_str(&self.bound.to_string())
    }
}

/// `~1.2` — minor-compatible: matches `>=1.2,<1.3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct LowestSpecifiedRange {
    specified: usize,
    base: Version,
}

impl LowestSpecifiedRange {
    pub const REQUIRED_NUMBER_OF_DIGITS: usize = 2;

    pub fn new(base: Version) -> Result<Self, InvalidRangeError> {
        let specified = base.parts().len();
        if specified < Self::REQUIRED_NUMBER_OF_DIGITS {
            return Err(InvalidRangeError::new(format!(
                "expected at least {} digits in a '~' range, got: {base}",
                Self::REQUIRED_NUMBER_OF_DIGITS
            )));
        }
        Ok(Self { specified, base })
    }
}

impl Ranged for LowestSpecifiedRange {
    fn greater_or_equal_to(&self) -> Option<Version> {
        Some(self.base.clone())
    }

    fn less_than(&self) -> Option<Version> {
        let mut parts = self.base.parts()[..self.specified - 1].to_vec();
        if let Some(last) = parts.last_mut() {
            *last += 1;
        }
        Some(Version::from_parts(parts))
    }

    fn to_version_range(&self) -> VersionRange {
        VersionRange::LowestSpecified(self.clone())
    }
}

impl Display for LowestSpecifiedRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let base = self.base.parts()[..self.specified]
            .iter()
            .map(ToString::to_string)
            .join(".");
        write!(f, "~{base}")
    }
}

/// `^1.2` — major-compatible: matches `>=1.2,<2.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct SemverRange {
    minimum: Version,
}

impl SemverRange {
    pub fn new(minimum: Version) -> Self {
        Self { minimum }
    }
}

impl Ranged for SemverRange {
    fn greater_or_equal_to(&self) -> Option<Version> {
        Some(self.minimum.clone())
    }

    fn less_than(&self) -> Option<Version> {
        let mut parts = self.minimum.parts().to_vec();
        for (i, p) in parts.clone().iter().enumerate() {
            if *p == 0 {
                continue;
            }
            parts[i] = p + 1;
            parts.truncate(i + 1);
            return Some(Version::from_parts(parts));
        }
        if let Some(last) = parts.last_mut() {
            *last += 1;
        }
        Some(Version::from_parts(parts))
    }

    fn to_version_range(&self) -> VersionRange {
        VersionRange::Semver(self.clone())
    }
}

impl Display for SemverRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_char('^')?;
        f.write_str(&self.minimum.to_string())
    }
}

/// A plain version, or one prefixed with `API:`/`Binary:` — defers to the
/// package's own [`Compat`] contract to decide whether a candidate version
/// satisfies the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct CompatRange {
    base: Version,
    /// If unset, the compat rule to apply is chosen by the caller (e.g. a
    /// source package build requires API compat, a binary build requires
    /// binary compat).
    required: Option<CompatRule>,
}

impl CompatRange {
    pub fn new(base: Version, required: Option<CompatRule>) -> Self {
        Self { base, required }
    }
}

impl Ranged for CompatRange {
    fn get_compat_rule(&self) -> Option<CompatRule> {
        self.required
    }

    fn greater_or_equal_to(&self) -> Option<Version> {
        Some(self.base.clone())
    }

    fn less_than(&self) -> Option<Version> {
        None
    }

    fn is_satisfied_by(&self, provider: &dyn CompatProvider, mut required: CompatRule) -> Compatibility {
        if let Some(r) = self.required {
            required = r;
        }
        match required {
            CompatRule::None => Compatibility::Compatible,
            CompatRule::API => provider.compat().is_api_compatible(&self.base, provider.version()),
            CompatRule::Binary => provider
                .compat()
                .is_binary_compatible(&self.base, provider.version()),
        }
    }

    fn to_version_range(&self) -> VersionRange {
        VersionRange::Compat(self.clone())
    }
}

impl Display for CompatRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.required {
            Some(CompatRule::API) => f.write_str("API:")?,
            Some(CompatRule::Binary) => f.write_str("Binary:")?,
            Some(CompatRule::None) | None => {}
        }
        f.write_str(&self.base.to_string())
    }
}

/// Controls how [`VersionFilter::restrict`] handles two ranges that don't
/// intersect.
#[derive(Debug)]
pub enum RestrictMode {
    RequireIntersectingRanges,
    AllowNonIntersectingRanges,
}

/// A conjunction of [`VersionRange`] atoms: a version must satisfy every
/// rule in the set. Displayed and parsed as a comma-separated list, e.g.
/// `>1.0,<2.0`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct VersionFilter {
    rules: BTreeSet<VersionRange>,
}

impl VersionFilter {
    pub fn new(rules: impl IntoIterator<Item = VersionRange>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn single(rule: VersionRange) -> Self {
        let mut filter = Self::default();
        filter.rules.insert(rule);
        filter
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Restrict this filter to the intersection of itself and `other`.
    pub fn restrict(&mut self, other: &VersionRange, mode: RestrictMode) -> Result<(), InvalidRangeError> {
        if let Compatibility::Incompatible(_) = Ranged::intersects(&*self, other) {
            match mode {
                RestrictMode::AllowNonIntersectingRanges => {
                    self.rules.extend(other.rules());
                    return Ok(());
                }
                RestrictMode::RequireIntersectingRanges => {
                    return Err(InvalidRangeError::new(format!(
                        "{self} does not intersect with {other}"
                    )));
                }
            }
        }
        self.rules.extend(other.rules());
        Ok(())
    }
}

impl Ranged for VersionFilter {
    fn greater_or_equal_to(&self) -> Option<Version> {
        self.rules.iter().filter_map(|r| r.greater_or_equal_to()).max()
    }

    fn less_than(&self) -> Option<Version> {
        self.rules.iter().filter_map(|r| r.less_than()).min()
    }

    fn is_applicable(&self, version: &Version) -> Compatibility {
        for rule in &self.rules {
            let compat = rule.is_applicable(version);
            if !compat.is_ok() {
                return compat;
            }
        }
        Compatibility::Compatible
    }

    fn is_satisfied_by(&self, provider: &dyn CompatProvider, required: CompatRule) -> Compatibility {
        for rule in &self.rules {
            let compat = rule.is_satisfied_by(provider, required);
            if !compat.is_ok() {
                return compat;
            }
        }
        Compatibility::Compatible
    }

    fn rules(&self) -> BTreeSet<VersionRange> {
        self.rules.clone()
    }

    fn to_version_range(&self) -> VersionRange {
        VersionRange::Filter(self.clone())
    }

    fn contains(&self, other: &VersionRange) -> Compatibility {
        let new_rules = &other.rules() - &self.rules;
        for new_rule in &new_rules {
            for old_rule in &self.rules {
                let compat = old_rule.contains(new_rule);
                if !compat.is_ok() {
                    return compat;
                }
            }
        }
        Compatibility::Compatible
    }

    fn intersects(&self, other: &VersionRange) -> Compatibility {
        let new_rules = &other.rules() - &self.rules;
        for new_rule in &new_rules {
            for old_rule in &self.rules {
                let compat = old_rule.intersects(new_rule);
                if !compat.is_ok() {
                    return compat;
                }
            }
        }
        Compatibility::Compatible
    }
}

impl Display for VersionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let rules = self.rules.iter().map(ToString::to_string).sorted().join(VERSION_RANGE_SEP);
        f.write_str(&rules)
    }
}

impl From<Version> for VersionFilter {
    fn from(version: Version) -> Self {
        Self::single(VersionRange::Equals(EqualsVersion::new(version)))
    }
}

impl FromStr for VersionFilter {
    type Err = InvalidRangeError;

    fn from_str(range: &str) -> Result<Self, Self::Err> {
        let mut out = VersionFilter::default();
        if range.is_empty() {
            return Ok(out);
        }
        for rule_str in range.split(VERSION_RANGE_SEP) {
            if rule_str.is_empty() {
                return Err(InvalidRangeError::new(format!(
                    "empty segment not allowed in version range, got: {range}"
                )));
            }
            out.rules.insert(VersionRange::from_str(rule_str)?);
        }
        Ok(out)
    }
}
