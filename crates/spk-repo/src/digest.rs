// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "./digest_test.rs"]
mod digest_test;

/// The number of base32 characters a payload digest is truncated to.
pub const DIGEST_SIZE: usize = 8;

/// An opaque, content-addressed reference to a package payload component.
///
/// This stands in for a spfs layer digest: the solver only ever compares
/// and carries these values, it never dereferences or renders them.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Compute a digest from the given payload bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let hasher = {
            let mut ctx = ring::digest::Context::new(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY);
            ctx.update(bytes);
            ctx.finish()
        };
        let encoded = data_encoding::BASE32.encode(hasher.as_ref());
        Self(encoded.chars().take(DIGEST_SIZE).collect())
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
