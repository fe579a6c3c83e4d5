// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn test_digest_is_stable() {
    let a = Digest::from_bytes(b"hello world");
    let b = Digest::from_bytes(b"hello world");
    assert_eq!(a, b);
}

#[test]
fn test_digest_differs_by_content() {
    let a = Digest::from_bytes(b"hello world");
    let b = Digest::from_bytes(b"goodbye world");
    assert_ne!(a, b);
}

#[test]
fn test_digest_display_length() {
    let digest = Digest::from_bytes(b"anything");
    assert_eq!(digest.to_string().len(), DIGEST_SIZE);
}
