// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::char;
use nom::combinator::{cut, map, map_res, opt};
use nom::sequence::{pair, preceded};
use nom::IResult;
use spk_foundation::name::{OptNameBuf, PkgNameBuf};
use spk_foundation::version::Version;
use spk_version_range::VersionFilter;

use crate::{Build, Error, Identifier, InclusionPolicy, PkgRequest, PreReleasePolicy, RangeIdent, Result, VarRequest};

fn pkg_name(input: &str) -> IResult<&str, PkgNameBuf> {
    map_res(
        take_while1(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
        |s: &str| s.parse::<PkgNameBuf>(),
    )(input)
}

fn opt_name(input: &str) -> IResult<&str, OptNameBuf> {
    map_res(
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'),
        |s: &str| s.parse::<OptNameBuf>(),
    )(input)
}

fn rest_of_input(input: &str) -> IResult<&str, &str> {
    Ok(("", input))
}

/// Parses `<name>[/<version>[/<build>]]`.
pub(crate) fn parse_identifier(input: &str) -> Result<Identifier> {
    let (rest, name) = pkg_name(input).map_err(|_| {
        Error::String(format!("invalid identifier '{input}': expected a package name"))
    })?;

    if rest.is_empty() {
        return Ok(Identifier::new_zero(name));
    }

    let (rest, _) = char::<_, nom::error::Error<&str>>('/')(rest)
        .map_err(|_| Error::String(format!("invalid identifier '{input}': expected '/'")))?;

    let (version_str, build_str) = match rest.split_once('/') {
        Some((v, b)) => (v, Some(b)),
        None => (rest, None),
    };

    let version = Version::from_str(version_str)?;
    let build = build_str.map(Build::from_str).transpose()?;

    Ok(Identifier::new(name, version, build))
}

/// Parses a range identifier: `<name>[/<version-range>[/<build>]]`.
pub(crate) fn parse_range_ident(input: &str) -> Result<RangeIdent> {
    let (rest, name) = pkg_name(input).map_err(|_| {
        Error::String(format!("invalid range identifier '{input}': expected a package name"))
    })?;

    if rest.is_empty() {
        return Ok(RangeIdent::new(name, VersionFilter::default(), None));
    }

    let (rest, _) = char::<_, nom::error::Error<&str>>('/')(rest)
        .map_err(|_| Error::String(format!("invalid range identifier '{input}': expected '/'")))?;

    let (version_str, build_str) = match rest.split_once('/') {
        Some((v, b)) => (v, Some(b)),
        None => (rest, None),
    };

    let version = VersionFilter::from_str(version_str)?;
    let build = build_str.map(Build::from_str).transpose()?;

    Ok(RangeIdent::new(name, version, build))
}

fn prerelease_policy(input: &str) -> IResult<&str, PreReleasePolicy> {
    alt((
        map(tag("IncludeAll"), |_| PreReleasePolicy::IncludeAll),
        map(tag("ExcludeAll"), |_| PreReleasePolicy::ExcludeAll),
    ))(input)
}

/// Parses the package request shorthand: `name[/range][@prerelease-policy]`.
pub(crate) fn parse_pkg_request(input: &str) -> Result<PkgRequest> {
    fn grammar(input: &str) -> IResult<&str, (&str, Option<&str>)> {
        map(
            pair(
                nom::bytes::complete::take_till(|c| c == '@'),
                opt(preceded(char('@'), cut(rest_of_input))),
            ),
            |(range_part, policy_part)| (range_part, policy_part),
        )(input)
    }

    let (_, (range_part, policy_part)) = grammar(input)
        .map_err(|_: nom::Err<nom::error::Error<&str>>| {
            Error::String(format!("invalid package request '{input}'"))
        })?;

    let pkg = parse_range_ident(range_part)?;
    let prerelease_policy = match policy_part {
        Some(p) => prerelease_policy(p)
            .map(|(_, policy)| policy)
            .map_err(|_| Error::String(format!("invalid prerelease policy '{p}' in '{input}'")))?,
        None => PreReleasePolicy::default(),
    };

    Ok(PkgRequest {
        pkg,
        prerelease_policy,
        inclusion_policy: InclusionPolicy::default(),
        pin: None,
    })
}

/// Parses the variable request shorthand: `name=value`.
pub(crate) fn parse_var_request(input: &str) -> Result<VarRequest> {
    let (name_str, value_str) = input.split_once('=').ok_or_else(|| {
        Error::String(format!("invalid variable request '{input}': expected 'name=value'"))
    })?;
    let (_, name) = opt_name(name_str)
        .map_err(|_| Error::String(format!("invalid variable name '{name_str}' in '{input}'")))?;
    Ok(VarRequest {
        name,
        value: Some(value_str.to_string()),
        from_build_env: false,
    })
}
