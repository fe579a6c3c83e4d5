// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{position_label, Version, VERSION_SEP};

#[cfg(test)]
#[path = "./compat_test.rs"]
mod compat_test;

const NONE_COMPAT_STR: &str = "x";
const API_COMPAT_STR: &str = "a";
const BINARY_COMPAT_STR: &str = "b";
const PRE_DELIMITER_STR: &str = "-";
const POST_DELIMITER_STR: &str = "+";

/// One letter of a compat contract: `x` (no compatibility), `a` (API) or
/// `b` (binary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompatRule {
    None,
    API,
    Binary,
}

impl std::fmt::Display for CompatRule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl AsRef<str> for CompatRule {
    fn as_ref(&self) -> &str {
        match self {
            CompatRule::None => NONE_COMPAT_STR,
            CompatRule::API => API_COMPAT_STR,
            CompatRule::Binary => BINARY_COMPAT_STR,
        }
    }
}

impl PartialOrd for CompatRule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompatRule {
    // API is considered a subset of Binary: a package that is binary
    // compatible is also, by definition, API compatible.
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_ref().cmp(other.as_ref())
    }
}

/// Reasons a [`Compatibility`] check came back incompatible.
///
/// Trimmed to the reasons this solver's own components can produce; the
/// teacher's full catalog also covers components, embedded packages and
/// repository provenance, none of which this reduced data model has.
#[derive(Clone, Debug, Eq, PartialEq, strum::Display)]
pub enum IncompatibleReason {
    #[strum(to_string = "not compatible: {base} {span}")]
    VersionNotCompatible { base: Version, span: String },
    #[strum(to_string = "{self_range} does not intersect with {other_range}")]
    RangesDoNotIntersect {
        self_range: String,
        other_range: String,
    },
    #[strum(to_string = "invalid value '{value}' for option '{option}': {reason}")]
    VarOptionMismatch {
        option: String,
        value: String,
        reason: String,
    },
    #[strum(to_string = "package wants {var}={requested}; resolve has {var}={value}")]
    VarRequirementMismatch {
        var: String,
        requested: String,
        value: String,
    },
    #[strum(to_string = "prereleases not allowed")]
    PrereleasesNotAllowed,
    #[strum(to_string = "build is deprecated and not requested specifically")]
    BuildDeprecated,
    #[strum(to_string = "{0}")]
    Other(String),
}

/// The outcome of checking whether something satisfies a request or
/// compatibility contract.
#[must_use = "this `Compatibility` may be an `Incompatible` variant, which should be handled"]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Compatibility {
    Compatible,
    Incompatible(IncompatibleReason),
}

impl std::fmt::Display for Compatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Compatibility::Compatible => f.write_str(""),
            Compatibility::Incompatible(reason) => reason.fmt(f),
        }
    }
}

impl Compatibility {
    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(self, Compatibility::Compatible)
    }

    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }
}

#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CompatRuleSet(BTreeSet<CompatRule>);

impl std::fmt::Display for CompatRuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for rule in &self.0 {
            rule.fmt(f)?;
        }
        Ok(())
    }
}

impl CompatRuleSet {
    pub fn single(rule: CompatRule) -> Self {
        Self(std::iter::once(rule).collect())
    }
}

/// The compatibility contract of a version, e.g. `x.a.b`: each
/// dot-separated position names the [`CompatRule`]s under which a change
/// at that position is still considered compatible.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Compat {
    parts: Vec<CompatRuleSet>,
    pre: Option<CompatRuleSet>,
    post: Option<CompatRuleSet>,
}

impl Default for Compat {
    fn default() -> Self {
        // equivalent to "x.a.b"
        Compat {
            parts: vec![
                CompatRuleSet::single(CompatRule::None),
                CompatRuleSet::single(CompatRule::API),
                CompatRuleSet::single(CompatRule::Binary),
            ],
            pre: None,
            post: None,
        }
    }
}

impl std::fmt::Display for Compat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let parts: Vec<_> = self.parts.iter().map(|r| r.to_string()).collect();
        f.write_str(&parts.join(VERSION_SEP))?;
        if let Some(pre) = &self.pre {
            write!(f, "{PRE_DELIMITER_STR}{pre}")?;
        }
        if let Some(post) = &self.post {
            write!(f, "{POST_DELIMITER_STR}{post}")?;
        }
        Ok(())
    }
}

impl FromStr for Compat {
    type Err = super::InvalidVersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        use nom::branch::alt;
        use nom::bytes::complete::tag;
        use nom::combinator::{complete, map};
        use nom::multi::{fold_many0, many1, separated_list1};
        use nom::sequence::preceded;
        use nom::IResult;

        fn compat_rule(s: &str) -> IResult<&str, CompatRule> {
            alt((
                map(tag(NONE_COMPAT_STR), |_| CompatRule::None),
                map(tag(API_COMPAT_STR), |_| CompatRule::API),
                map(tag(BINARY_COMPAT_STR), |_| CompatRule::Binary),
            ))(s)
        }

        fn compat_rule_set(s: &str) -> IResult<&str, CompatRuleSet> {
            map(many1(compat_rule), |rules| {
                CompatRuleSet(rules.into_iter().collect())
            })(s)
        }

        let (s, parts) = separated_list1(tag(VERSION_SEP), compat_rule_set)(value).map_err(
            |err| super::InvalidVersionError {
                message: format!("failed to parse compat value '{value}': {err}"),
            },
        )?;

        enum PreOrPost {
            Pre,
            Post,
        }

        let (_, compat) = complete(fold_many0(
            alt((
                preceded(
                    tag(PRE_DELIMITER_STR),
                    map(compat_rule_set, |s| (PreOrPost::Pre, s)),
                ),
                preceded(
                    tag(POST_DELIMITER_STR),
                    map(compat_rule_set, |s| (PreOrPost::Post, s)),
                ),
            )),
            || Compat {
                parts: parts.clone(),
                pre: None,
                post: None,
            },
            |mut acc, (which, rules)| {
                match which {
                    PreOrPost::Pre => acc.pre = Some(rules),
                    PreOrPost::Post => acc.post = Some(rules),
                }
                acc
            },
        ))(s)
        .map_err(|err| super::InvalidVersionError {
            message: format!("failed to parse pre/post compat value '{value}': {err}"),
        })?;

        Ok(compat)
    }
}

impl Compat {
    /// Whether `other` is API-compatible with `base` under this contract.
    pub fn is_api_compatible(&self, base: &Version, other: &Version) -> Compatibility {
        self.check_compat(base, other, CompatRule::API)
    }

    /// Whether `other` is binary-compatible with `base` under this contract.
    pub fn is_binary_compatible(&self, base: &Version, other: &Version) -> Compatibility {
        self.check_compat(base, other, CompatRule::Binary)
    }

    fn tags_compatible(
        &self,
        base: &Version,
        other: &Version,
        required: CompatRule,
    ) -> Option<Compatibility> {
        let pre_matches = base.pre == other.pre;
        let post_matches = base.post == other.post;

        if (pre_matches || self.pre.is_none()) && (post_matches || self.post.is_none()) {
            return Some(Compatibility::Compatible);
        }

        for (matches, ruleset, desc) in
            [(pre_matches, &self.pre, "pre"), (post_matches, &self.post, "post")]
        {
            if matches {
                continue;
            }
            let Some(ruleset) = ruleset else { continue };
            if ruleset.0.contains(&CompatRule::None) || !ruleset.0.contains(&required) {
                return Some(Compatibility::Incompatible(
                    IncompatibleReason::VersionNotCompatible {
                        base: base.clone(),
                        span: format!(
                            "{desc} release differs: has {}, requires {}",
                            other.pre, base.pre
                        ),
                    },
                ));
            }
        }

        Some(Compatibility::Compatible)
    }

    fn check_compat(&self, base: &Version, other: &Version, required: CompatRule) -> Compatibility {
        if base.parts() == other.parts() {
            if let Some(result) = self.tags_compatible(base, other, required) {
                return result;
            }
        }

        for (i, rule) in self.parts.iter().enumerate() {
            let a = base.parts().get(i);
            let b = other.parts().get(i);

            let Some(a) = a else {
                // base has fewer parts than this rule covers; nothing left
                // to disagree on.
                return Compatibility::Compatible;
            };
            let Some(b) = b else {
                return Compatibility::Compatible;
            };

            if rule.0.contains(&CompatRule::None) {
                if a != b {
                    return Compatibility::Incompatible(IncompatibleReason::VersionNotCompatible {
                        base: base.clone(),
                        span: format!(
                            "pos {} ({}): has {b}, requires {a}",
                            i + 1,
                            position_label(i)
                        ),
                    });
                }
                continue;
            }

            if !rule.0.contains(&required) {
                if a == b {
                    continue;
                }
                return Compatibility::Incompatible(IncompatibleReason::VersionNotCompatible {
                    base: base.clone(),
                    span: format!(
                        "pos {} ({}): has {b}, requires {a}",
                        i + 1,
                        position_label(i)
                    ),
                });
            }

            return if b < a {
                Compatibility::Incompatible(IncompatibleReason::VersionNotCompatible {
                    base: base.clone(),
                    span: format!(
                        "pos {} ({}): {b} is lower than {a}",
                        i + 1,
                        position_label(i)
                    ),
                })
            } else {
                Compatibility::Compatible
            };
        }

        Compatibility::Incompatible(IncompatibleReason::VersionNotCompatible {
            base: base.clone(),
            span: "no compat rule covers the differing position".to_string(),
        })
    }
}

impl Serialize for Compat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Compat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct CompatVisitor;
        impl serde::de::Visitor<'_> for CompatVisitor {
            type Value = Compat;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a compatibility specifier (eg: 'x.a.b', 'x.ab')")
            }

            fn visit_str<E>(self, value: &str) -> Result<Compat, E>
            where
                E: serde::de::Error,
            {
                Compat::from_str(value).map_err(serde::de::Error::custom)
            }
        }
        deserializer.deserialize_str(CompatVisitor)
    }
}
