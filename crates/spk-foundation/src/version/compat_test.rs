// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use rstest::rstest;

use super::*;
use crate::version::Version;

#[test]
fn test_default_is_x_a_b() {
    assert_eq!(Compat::default().to_string(), "x.a.b");
}

#[rstest]
#[case("x.a.b")]
#[case("x.ab")]
#[case("x.a.b-a+b")]
fn test_parse_round_trips(#[case] input: &str) {
    let compat = Compat::from_str(input).unwrap();
    assert_eq!(compat.to_string(), input);
}

#[test]
fn test_binary_compat_allows_patch_bump() {
    let compat = Compat::default();
    let base = Version::from_str("1.0.0").unwrap();
    let other = Version::from_str("1.0.5").unwrap();
    assert!(compat.is_binary_compatible(&base, &other).is_ok());
}

#[test]
fn test_none_rule_rejects_any_change() {
    // "x.x.x": every position requires an exact match
    let compat = Compat::from_str("x.x.x").unwrap();
    let base = Version::from_str("1.0.0").unwrap();
    let other = Version::from_str("1.0.1").unwrap();
    assert!(compat.is_binary_compatible(&base, &other).is_err());
}

#[test]
fn test_major_mismatch_is_incompatible() {
    let compat = Compat::default();
    let base = Version::from_str("2.0.0").unwrap();
    let other = Version::from_str("1.9.9").unwrap();
    assert!(compat.is_binary_compatible(&base, &other).is_err());
}

#[test]
fn test_lower_patch_is_incompatible() {
    let compat = Compat::default();
    let base = Version::from_str("1.0.5").unwrap();
    let other = Version::from_str("1.0.1").unwrap();
    assert!(compat.is_binary_compatible(&base, &other).is_err());
}
