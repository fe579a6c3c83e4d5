// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

#[cfg(test)]
#[path = "./build_test.rs"]
mod build_test;

const SRC: &str = "src";
const EMBEDDED: &str = "embedded";

/// The number of base32 characters a build digest is truncated to.
///
/// Digests are namespaced by the package they apply to, so collisions are
/// exceedingly unlikely at this length; it must also be a multiple of 8 to
/// be decodable.
pub const DIGEST_SIZE: usize = 8;

/// What a package identifier's build component refers to.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Build {
    /// The unbuilt source form of a package.
    Source,
    /// A stand-in for a package embedded within another's install requirements.
    Embedded,
    /// A built binary package, named by the digest of its resolved option map.
    Digest(String),
}

impl Build {
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source)
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded)
    }

    /// Compute the digest-form build for the given option map digest.
    pub fn digest_from_bytes(bytes: &[u8]) -> Self {
        let encoded = data_encoding::BASE32.encode(bytes);
        let digest: String = encoded.chars().take(DIGEST_SIZE).collect();
        Self::Digest(digest)
    }
}

impl std::fmt::Display for Build {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Source => f.write_str(SRC),
            Self::Embedded => f.write_str(EMBEDDED),
            Self::Digest(d) => f.write_str(d),
        }
    }
}

impl FromStr for Build {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            SRC => Ok(Self::Source),
            EMBEDDED => Ok(Self::Embedded),
            _ => {
                if value.len() != DIGEST_SIZE
                    || !value
                        .chars()
                        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                {
                    return Err(Error::InvalidBuild(value.to_string()));
                }
                Ok(Self::Digest(value.to_string()))
            }
        }
    }
}

impl From<Build> for String {
    fn from(build: Build) -> Self {
        build.to_string()
    }
}

impl TryFrom<String> for Build {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}
