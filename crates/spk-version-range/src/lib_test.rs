// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use rstest::rstest;
use spk_foundation::version::Version;

use super::*;

fn v(s: &str) -> Version {
    Version::from_str(s).unwrap()
}

#[rstest]
#[case("1.0.0", "1.0.0", true)]
#[case("1.0.0", "1.0.1", false)]
fn test_equals(#[case] range: &str, #[case] candidate: &str, #[case] expected: bool) {
    let range = VersionRange::from_str(range).unwrap();
    assert_eq!(range.is_applicable(&v(candidate)).is_ok(), expected);
}

#[rstest]
#[case("1.0.1", true)]
#[case("1.0.0", false)]
fn test_not_equals(#[case] candidate: &str, #[case] expected: bool) {
    let range = VersionRange::from_str("!=1.0.0").unwrap();
    assert_eq!(range.is_applicable(&v(candidate)).is_ok(), expected);
}

#[rstest]
#[case(">1.0", "1.0.1", true)]
#[case(">1.0", "1.0.0", false)]
#[case(">=1.0", "1.0.0", true)]
#[case("<2.0", "1.9.9", true)]
#[case("<2.0", "2.0.0", false)]
#[case("<=2.0", "2.0.0", true)]
fn test_comparison_ranges(#[case] range: &str, #[case] candidate: &str, #[case] expected: bool) {
    let range = VersionRange::from_str(range).unwrap();
    assert_eq!(range.is_applicable(&v(candidate)).is_ok(), expected);
}

#[rstest]
#[case("^1.2.3", "1.9.9", true)]
#[case("^1.2.3", "2.0.0", false)]
#[case("^0.2.3", "0.2.9", true)]
#[case("^0.2.3", "0.3.0", false)]
fn test_semver_range(#[case] range: &str, #[case] candidate: &str, #[case] expected: bool) {
    let range = VersionRange::from_str(range).unwrap();
    assert_eq!(range.is_applicable(&v(candidate)).is_ok(), expected);
}

#[rstest]
#[case("~1.2", "1.2.9", true)]
#[case("~1.2", "2.0.0", false)]
#[case("~1.2.3", "1.2.9", true)]
#[case("~1.2.3", "1.3.0", false)]
fn test_lowest_specified_range(
    #[case] range: &str,
    #[case] candidate: &str,
    #[case] expected: bool,
) {
    let range = VersionRange::from_str(range).unwrap();
    assert_eq!(range.is_applicable(&v(candidate)).is_ok(), expected);
}

#[test]
fn test_lowest_specified_requires_two_digits() {
    assert!(VersionRange::from_str("~1").is_err());
}

#[test]
fn test_version_filter_conjunction() {
    let range = VersionRange::from_str(">1.0,<2.0").unwrap();
    assert!(range.is_applicable(&v("1.5.0")).is_ok());
    assert!(range.is_applicable(&v("2.0.0")).is_err());
    assert!(range.is_applicable(&v("1.0.0")).is_err());
}

#[test]
fn test_compat_range_parses_prefix() {
    let range = VersionRange::from_str("Binary:1.0.0").unwrap();
    match range {
        VersionRange::Compat(c) => assert_eq!(c.to_string(), "Binary:1.0.0"),
        _ => panic!("expected a compat range"),
    }
}

#[test]
fn test_bare_version_is_compat_range_with_no_required_rule() {
    let range = VersionRange::from_str("1.0.0").unwrap();
    match &range {
        VersionRange::Compat(c) => assert!(c.get_compat_rule().is_none()),
        _ => panic!("expected a compat range"),
    }
    assert_eq!(range.to_string(), "1.0.0");
}

#[test]
fn test_contains_narrower_range() {
    let wide = VersionRange::from_str(">=1.0").unwrap();
    let narrow = VersionRange::from_str(">=1.5,<2.0").unwrap();
    assert!(wide.contains(&narrow).is_ok());
    assert!(narrow.contains(&wide).is_err());
}

#[test]
fn test_intersects() {
    let a = VersionRange::from_str("<2.0").unwrap();
    let b = VersionRange::from_str(">1.5").unwrap();
    assert!(a.intersects(&b).is_ok());

    let c = VersionRange::from_str("<1.0").unwrap();
    assert!(a.intersects(&c).is_ok());
    assert!(b.intersects(&c).is_err());
}

#[test]
fn test_restrict_builds_intersection() {
    let mut filter = VersionFilter::from_str(">=1.0").unwrap();
    filter
        .restrict(
            &VersionRange::from_str("<2.0").unwrap(),
            RestrictMode::RequireIntersectingRanges,
        )
        .unwrap();
    assert!(filter.is_applicable(&v("1.5.0")).is_ok());
    assert!(filter.is_applicable(&v("2.0.0")).is_err());
}

#[test]
fn test_restrict_rejects_disjoint_ranges_by_default() {
    let mut filter = VersionFilter::from_str(">=2.0").unwrap();
    let result = filter.restrict(
        &VersionRange::from_str("<1.0").unwrap(),
        RestrictMode::RequireIntersectingRanges,
    );
    assert!(result.is_err());
}

#[test]
fn test_empty_range_matches_anything() {
    let range = VersionRange::from_str("").unwrap();
    assert!(range.is_applicable(&v("0.0.0")).is_ok());
    assert!(range.is_applicable(&v("999.0.0")).is_ok());
}

#[test]
fn test_invalid_range_segment() {
    assert!(VersionRange::from_str(">1.0,").is_err());
}

#[test]
fn test_round_trip_serde() {
    let range = VersionRange::from_str(">=1.0,<2.0").unwrap();
    let yaml = serde_yaml::to_string(&range).unwrap();
    let back: VersionRange = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(range, back);
}
