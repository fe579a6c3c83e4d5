// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::char;
use nom::combinator::{cut, map, map_res};
use nom::multi::separated_list1;
use nom::sequence::{pair, preceded};
use nom::IResult;
use spk_foundation::version::{CompatRule, Version};

use crate::{
    CompatRange, EqualsVersion, GreaterThanOrEqualToRange, GreaterThanRange,
    InvalidRangeError, LessThanOrEqualToRange, LessThanRange, LowestSpecifiedRange,
    NotEqualsVersion, SemverRange, VersionFilter, VersionRange, VERSION_RANGE_SEP,
};

fn version(input: &str) -> IResult<&str, Version> {
    map_res(version_str, Version::try_from)(input)
}

/// The slice of `input` that makes up a version number: digits and dots,
/// with optional `-pre` and `+post` tag segments.
fn version_str(input: &str) -> IResult<&str, &str> {
    let mut end = 0;
    let bytes = input.as_bytes();
    while end < bytes.len() {
        let c = bytes[end] as char;
        if c.is_ascii_digit() || c == '.' {
            end += 1;
            continue;
        }
        if (c == '-' || c == '+') && end > 0 {
            end += 1;
            while end < bytes.len() {
                let c = bytes[end] as char;
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                    end += 1;
                } else {
                    break;
                }
            }
            break;
        }
        break;
    }
    if end == 0 {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        )));
    }
    Ok((&input[end..], &input[..end]))
}

fn compat_rule(input: &str) -> IResult<&str, CompatRule> {
    alt((
        map(tag("Binary"), |_| CompatRule::Binary),
        map(tag("API"), |_| CompatRule::API),
    ))(input)
}

fn compat_range(input: &str) -> IResult<&str, VersionRange> {
    map(
        pair(
            nom::sequence::terminated(compat_rule, cut(char(':'))),
            cut(version),
        ),
        |(required, base)| VersionRange::Compat(CompatRange::new(base, Some(required))),
    )(input)
}

fn one_range(input: &str) -> IResult<&str, VersionRange> {
    alt((
        map(preceded(char('^'), cut(version)), |v| {
            VersionRange::Semver(SemverRange::new(v))
        }),
        map_res(preceded(char('~'), cut(version)), |v| {
            LowestSpecifiedRange::new(v).map(VersionRange::LowestSpecified)
        }),
        map(preceded(tag(">="), cut(version)), |v| {
            VersionRange::GreaterThanOrEqualTo(GreaterThanOrEqualToRange::new(v))
        }),
        map(preceded(tag("<="), cut(version)), |v| {
            VersionRange::LessThanOrEqualTo(LessThanOrEqualToRange::new(v))
        }),
        map(preceded(char('>'), cut(version)), |v| {
            VersionRange::GreaterThan(GreaterThanRange::new(v))
        }),
        map(preceded(char('<'), cut(version)), |v| {
            VersionRange::LessThan(LessThanRange::new(v))
        }),
        map(preceded(char('='), cut(version)), |v| {
            VersionRange::Equals(EqualsVersion::new(v))
        }),
        map(preceded(tag("!="), cut(version)), |v| {
            VersionRange::NotEquals(NotEqualsVersion::new(v))
        }),
        compat_range,
        // A plain version defers to the package's own compat contract.
        map(version, |base| VersionRange::Compat(CompatRange::new(base, None))),
    ))(input)
}

fn version_filter(input: &str) -> IResult<&str, VersionRange> {
    map(
        separated_list1(tag(VERSION_RANGE_SEP), one_range),
        |mut ranges| {
            if ranges.len() == 1 {
                ranges.remove(0)
            } else {
                VersionRange::Filter(VersionFilter::new(ranges))
            }
        },
    )(input)
}

pub(crate) fn parse_version_range(input: &str) -> Result<VersionRange, InvalidRangeError> {
    let (rest, range) = version_filter(input).map_err(|err| {
        InvalidRangeError::new(format!("failed to parse version range '{input}': {err}"))
    })?;
    if !rest.is_empty() {
        return Err(InvalidRangeError::new(format!(
            "unexpected trailing input in version range '{input}': '{rest}'"
        )));
    }
    Ok(range)
}
