// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use spk_foundation::version::Compatibility;
use spk_ident::Identifier;

/// An annotation attached to a [`crate::Decision`], explaining a candidate
/// that was considered but not applied.
#[derive(Clone, Debug)]
pub enum Note {
    SkipPackage(SkipPackageNote),
    Other(String),
}

/// Records why a specific build was skipped during candidate enumeration.
#[derive(Clone, Debug)]
pub struct SkipPackageNote {
    pub ident: Identifier,
    pub reason: Compatibility,
}

impl SkipPackageNote {
    pub fn new(ident: Identifier, reason: Compatibility) -> Self {
        Self { ident, reason }
    }
}

impl std::fmt::Display for SkipPackageNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skipped {}: {:?}", self.ident, self.reason)
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SkipPackage(note) => note.fmt(f),
            Self::Other(msg) => f.write_str(msg),
        }
    }
}
