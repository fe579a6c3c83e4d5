// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "./source_spec_test.rs"]
mod source_spec_test;

/// Describes where to collect a package's sources from.
///
/// The variant is selected by the presence of its discriminator key
/// (`path`, `git`, or `tar`). Collecting the files themselves (rsync,
/// git clone, tar extraction) is outside the solver's concerns; these
/// types only need to parse, validate, and round-trip.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceSpec {
    Local(LocalSource),
    Git(GitSource),
    Tar(TarSource),
}

impl Default for SourceSpec {
    fn default() -> Self {
        Self::Local(LocalSource::default())
    }
}

fn default_exclude() -> Vec<String> {
    vec![".git".to_string(), ".gitignore".to_string()]
}

/// Sources collected from the local filesystem, relative to the spec file.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalSource {
    #[serde(default = "default_path")]
    pub path: PathBuf,
    #[serde(default = "default_exclude", skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<String>,
}

impl Default for LocalSource {
    fn default() -> Self {
        Self {
            path: default_path(),
            exclude: default_exclude(),
            filter: Vec::new(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from(".")
}

/// Sources fetched from a git repository.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitSource {
    pub git: String,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

/// Sources extracted from a tar archive.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TarSource {
    pub tar: String,
}
