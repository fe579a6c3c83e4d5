// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

mod compat;

use std::cmp::Ordering;
use std::fmt::Write as _;
use std::ops::Deref;
use std::str::FromStr;

use itertools::Itertools;
use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub use compat::{Compat, CompatRule, Compatibility, IncompatibleReason};


pub const VERSION_SEP: &str = ".";
const TAG_SET_SEP: &str = ",";
const TAG_SEP: &str = ".";

const POSITION_LABELS: &[&str] = &["Major", "Minor", "Patch"];

/// Returns the name of the version component at the given position.
pub(crate) fn position_label(pos: usize) -> &'static str {
    POSITION_LABELS.get(pos).copied().unwrap_or("Tail")
}

/// Denotes that an invalid version string was given.
#[derive(Diagnostic, Debug, Error)]
#[error("invalid version: {message}")]
pub struct InvalidVersionError {
    pub message: String,
}

impl InvalidVersionError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A set of pre- or post-release version tags, e.g. `dev.4,alpha.1`.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct TagSet {
    tags: std::collections::BTreeMap<String, u32>,
}

impl Deref for TagSet {
    type Target = std::collections::BTreeMap<String, u32>;
    fn deref(&self) -> &Self::Target {
        &self.tags
    }
}

impl TagSet {
    pub fn single(name: impl Into<String>, value: u32) -> Self {
        let mut set = Self::default();
        set.tags.insert(name.into(), value);
        set
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl std::fmt::Display for TagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let parts: Vec<_> = self
            .tags
            .iter()
            .map(|(name, num)| format!("{name}.{num}"))
            .collect();
        write!(f, "{}", parts.join(TAG_SET_SEP))
    }
}

impl PartialOrd for TagSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TagSet {
    fn cmp(&self, other: &Self) -> Ordering {
        let self_entries: Vec<_> = self.tags.iter().collect();
        let other_entries: Vec<_> = other.tags.iter().collect();
        for ((sn, sv), (on, ov)) in self_entries.iter().zip(other_entries.iter()) {
            match sn.cmp(on) {
                Ordering::Equal => (),
                res => return res,
            }
            match sv.cmp(ov) {
                Ordering::Equal => (),
                res => return res,
            }
        }
        self.tags.len().cmp(&other.tags.len())
    }
}

impl FromStr for TagSet {
    type Err = InvalidVersionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag_set(s)
    }
}

fn parse_tag_set(tags: &str) -> Result<TagSet, InvalidVersionError> {
    let mut set = TagSet::default();
    if tags.is_empty() {
        return Ok(set);
    }
    for tag in tags.split(TAG_SET_SEP) {
        let (name, num) = break_string(tag, TAG_SEP);
        if name.is_empty() || num.is_empty() {
            return Err(InvalidVersionError::new(format!(
                "version tag segment must be of the form <name>.<int>, got '{tag}'"
            )));
        }
        if set.tags.contains_key(name) {
            return Err(InvalidVersionError::new(format!("duplicate tag: {name}")));
        }
        let num: u32 = num.parse().map_err(|_| {
            InvalidVersionError::new(format!(
                "version tag segment must be of the form <name>.<int>, got '{tag}'"
            ))
        })?;
        set.tags.insert(name.to_string(), num);
    }
    Ok(set)
}

/// The numeric portion of a version, with equality and hashing normalized
/// to ignore unspecified trailing zero parts (`1.2` == `1.2.0.0`), matching
/// the tuple comparison `Version`'s `Ord` impl already performs.
#[derive(Clone, Debug, Default)]
struct VersionParts(Vec<u32>);

impl Deref for VersionParts {
    type Target = [u32];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<u32> for VersionParts {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl VersionParts {
    fn trimmed(&self) -> &[u32] {
        match self.0.iter().rposition(|p| *p != 0) {
            Some(last_nonzero) => &self.0[..=last_nonzero],
            None => &[],
        }
    }
}

impl PartialEq for VersionParts {
    fn eq(&self, other: &Self) -> bool {
        self.trimmed() == other.trimmed()
    }
}

impl Eq for VersionParts {}

impl std::hash::Hash for VersionParts {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.trimmed().hash(state);
    }
}

/// A package version number: a dotted sequence of integers plus optional
/// pre-release and post-release tag sets.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Version {
    parts: VersionParts,
    pub pre: TagSet,
    pub post: TagSet,
}

impl Version {
    /// How many parts are always shown when displaying a version; shorter
    /// versions are padded with zeros.
    pub const MINIMUM_PARTS_FOR_DISPLAY: usize = 3;

    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            parts: VersionParts(vec![major, minor, patch]),
            ..Default::default()
        }
    }

    pub fn from_parts(parts: impl IntoIterator<Item = u32>) -> Self {
        Self {
            parts: parts.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn parts(&self) -> &[u32] {
        &self.parts
    }

    /// Whether this version's numeric parts equal `other`'s, ignoring any
    /// unspecified trailing zero parts (`1.2` == `1.2.0.0`).
    pub fn parts_eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }

    pub fn major(&self) -> u32 {
        self.parts.first().copied().unwrap_or_default()
    }

    pub fn minor(&self) -> u32 {
        self.parts.get(1).copied().unwrap_or_default()
    }

    pub fn patch(&self) -> u32 {
        self.parts.get(2).copied().unwrap_or_default()
    }

    pub fn is_zero(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty() && !self.parts.iter().any(|p| *p > 0)
    }

    fn format_tags(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if !self.pre.is_empty() {
            f.write_char('-')?;
            f.write_str(&self.pre.to_string())?;
        }
        if !self.post.is_empty() {
            f.write_char('+')?;
            f.write_str(&self.post.to_string())?;
        }
        Ok(())
    }

    fn base_normalized(&self) -> String {
        let mut s = self
            .parts
            .iter()
            .copied()
            .chain(std::iter::repeat(0))
            .take(self.parts.len().max(Self::MINIMUM_PARTS_FOR_DISPLAY))
            .join(VERSION_SEP);
        if s.is_empty() {
            s.push('0');
        }
        s
    }

    fn base_verbatim(&self) -> String {
        let mut s = self.parts.iter().join(VERSION_SEP);
        if s.is_empty() {
            s.push('0');
        }
        s
    }
}

impl TryFrom<&str> for Version {
    type Error = InvalidVersionError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse_version(value)
    }
}

impl FromStr for Version {
    type Err = InvalidVersionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_version(s)
    }
}

/// Display a version. The alternate form (`{:#}`) preserves the precision
/// the version was originally parsed with; the normal form pads to
/// [`Version::MINIMUM_PARTS_FOR_DISPLAY`].
impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if f.alternate() {
            f.write_str(&self.base_verbatim())?;
        } else {
            f.write_str(&self.base_normalized())?;
        }
        self.format_tags(f)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut other_parts = other.parts.iter();
        for self_part in self.parts.iter() {
            match other_parts.next() {
                Some(other_part) => match self_part.cmp(other_part) {
                    Ordering::Equal => continue,
                    res => return res,
                },
                None if *self_part == 0 => continue,
                None => return Ordering::Greater,
            }
        }
        match other_parts.max() {
            None | Some(0) => {}
            Some(_) => return Ordering::Less,
        }

        match (self.pre.is_empty(), other.pre.is_empty()) {
            (true, true) => (),
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => match self.pre.cmp(&other.pre) {
                Ordering::Equal => (),
                cmp => return cmp,
            },
        }

        self.post.cmp(&other.post)
    }
}

/// Parse a string as a version specifier, e.g. `1.2.3-alpha.1+rev.4`.
pub fn parse_version(version: impl AsRef<str>) -> Result<Version, InvalidVersionError> {
    let version = version.as_ref();
    if version.is_empty() {
        return Ok(Version::default());
    }

    let (version, post) = break_string(version, "+");
    let (version, pre) = break_string(version, "-");

    let mut parts = Vec::new();
    for (i, p) in version.split(VERSION_SEP).enumerate() {
        let parsed = p.parse().map_err(|_| {
            InvalidVersionError::new(format!(
                "version must be a sequence of integers, got '{p}' in position {i} [{version}]"
            ))
        })?;
        parts.push(parsed);
    }

    let mut v = Version::from_parts(parts);
    v.pre = parse_tag_set(pre)?;
    v.post = parse_tag_set(post)?;
    Ok(v)
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:#}", self))
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VersionVisitor;

        impl serde::de::Visitor<'_> for VersionVisitor {
            type Value = Version;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a version number (eg: 1.0.0, 1.0.0-pre.1, 1.2.3+post.0)")
            }

            fn visit_str<E>(self, value: &str) -> Result<Version, E>
            where
                E: serde::de::Error,
            {
                Version::from_str(value).map_err(serde::de::Error::custom)
            }
        }
        deserializer.deserialize_str(VersionVisitor)
    }
}

fn break_string<'a>(string: &'a str, sep: &str) -> (&'a str, &'a str) {
    let mut parts = string.splitn(2, sep);
    (parts.next().unwrap_or(string), parts.next().unwrap_or(""))
}
