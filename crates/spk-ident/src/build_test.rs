// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use super::*;

#[test]
fn test_source_and_embedded_round_trip() {
    assert_eq!(Build::from_str("src").unwrap(), Build::Source);
    assert_eq!(Build::from_str("embedded").unwrap(), Build::Embedded);
    assert_eq!(Build::Source.to_string(), "src");
    assert_eq!(Build::Embedded.to_string(), "embedded");
}

#[test]
fn test_digest_round_trip() {
    let build = Build::digest_from_bytes(b"some option map contents");
    let rendered = build.to_string();
    assert_eq!(rendered.len(), DIGEST_SIZE);
    let parsed = Build::from_str(&rendered).unwrap();
    assert_eq!(parsed, build);
}

#[test]
fn test_invalid_build_string() {
    assert!(Build::from_str("not-a-valid-build!!").is_err());
    assert!(Build::from_str("short").is_err());
}
