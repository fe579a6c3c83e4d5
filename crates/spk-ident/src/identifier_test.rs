// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use super::*;

#[test]
fn test_display_omits_zero_version_with_no_build() {
    let ident = Identifier::new_zero("mypkg".parse().unwrap());
    assert_eq!(ident.to_string(), "mypkg");
}

#[test]
fn test_display_includes_nonzero_version() {
    let ident = Identifier::new("mypkg".parse().unwrap(), Version::from_str("1.2.3").unwrap(), None);
    assert_eq!(ident.to_string(), "mypkg/1.2.3");
}

#[test]
fn test_display_includes_build() {
    let ident = Identifier::new(
        "mypkg".parse().unwrap(),
        Version::from_str("1.2.3").unwrap(),
        Some(Build::Source),
    );
    assert_eq!(ident.to_string(), "mypkg/1.2.3/src");
}

#[test]
fn test_round_trip_parse() {
    for s in ["mypkg", "mypkg/1.2.3", "mypkg/1.2.3/src", "mypkg/1.2.3/embedded"] {
        let ident = Identifier::from_str(s).unwrap();
        assert_eq!(ident.to_string(), s);
    }
}

#[test]
fn test_zero_version_requires_build_to_display() {
    let ident = Identifier::new(
        "mypkg".parse().unwrap(),
        Version::default(),
        Some(Build::Source),
    );
    assert_eq!(ident.to_string(), "mypkg/0.0.0/src");
}
