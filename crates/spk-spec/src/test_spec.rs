// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use spk_foundation::OptionMap;
use spk_ident::Request;

use crate::Error;

#[cfg(test)]
#[path = "./test_spec_test.rs"]
mod test_spec_test;

const SOURCES_NAME: &str = "sources";
const BUILD_NAME: &str = "build";
const INSTALL_NAME: &str = "install";

/// The stage of a package's lifecycle a test is run against.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TestStage {
    Sources,
    Build,
    Install,
}

impl std::fmt::Display for TestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            TestStage::Sources => SOURCES_NAME,
            TestStage::Build => BUILD_NAME,
            TestStage::Install => INSTALL_NAME,
        })
    }
}

impl FromStr for TestStage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SOURCES_NAME => Ok(Self::Sources),
            BUILD_NAME => Ok(Self::Build),
            INSTALL_NAME => Ok(Self::Install),
            other => Err(Error::Validation(format!(
                "invalid test stage '{other}', must be one of: {SOURCES_NAME}, {BUILD_NAME}, {INSTALL_NAME}"
            ))),
        }
    }
}

impl Serialize for TestStage {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TestStage {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_str(&value).map_err(serde::de::Error::custom)
    }
}

/// A script run against a built package (or its sources) to confirm it
/// behaves as expected.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TestSpec {
    pub stage: TestStage,
    #[serde(deserialize_with = "crate::build_spec::deserialize_script")]
    pub script: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selectors: Vec<OptionMap>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Request>,
}
