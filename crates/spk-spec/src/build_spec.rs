// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use spk_foundation::OptionMap;

use crate::{Error, Opt, Result};

#[cfg(test)]
#[path = "./build_spec_test.rs"]
mod build_spec_test;

/// A set of structured inputs used to build a package.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct BuildSpec {
    pub script: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Opt>,
    #[serde(default, skip_serializing_if = "BuildSpec::is_default_variants")]
    pub variants: Vec<OptionMap>,
}

impl Default for BuildSpec {
    fn default() -> Self {
        Self {
            script: vec!["sh ./build.sh".into()],
            options: Vec::new(),
            variants: vec![OptionMap::default()],
        }
    }
}

impl BuildSpec {
    pub fn is_default(&self) -> bool {
        self == &Self::default()
    }

    fn is_default_variants(variants: &[OptionMap]) -> bool {
        variants.len() == 1 && variants.first() == Some(&OptionMap::default())
    }

    /// Add or update an option in this build spec.
    ///
    /// An option is replaced if it shares a name with the given option,
    /// otherwise the option is appended to the build options.
    pub fn upsert_opt(&mut self, opt: Opt) {
        for other in self.options.iter_mut() {
            if other.full_name() == opt.full_name() {
                *other = opt;
                return;
            }
        }
        self.options.push(opt);
    }

    /// Validate that no two options share a name and that no two variants
    /// would produce the same resolved build.
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for opt in &self.options {
            let full_name = opt.full_name();
            if !seen.insert(full_name) {
                return Err(Error::Validation(format!(
                    "build option specified more than once: {full_name}"
                )));
            }
        }

        let mut seen_digests = HashSet::new();
        for variant in &self.variants {
            if !seen_digests.insert(variant.digest()) {
                return Err(Error::Validation(format!(
                    "multiple variants would produce the same build: {variant}"
                )));
            }
        }

        Ok(())
    }
}

impl<'de> Deserialize<'de> for BuildSpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Unchecked {
            #[serde(default)]
            script: Option<serde_yaml::Value>,
            #[serde(default)]
            options: Vec<Opt>,
            #[serde(default)]
            variants: Vec<OptionMap>,
        }

        let raw = Unchecked::deserialize(deserializer)?;
        let mut spec = BuildSpec {
            options: raw.options,
            ..BuildSpec::default()
        };
        if let Some(script) = raw.script {
            spec.script = deserialize_script(script)
                .map_err(|err| serde::de::Error::custom(format!("build.script: {err}")))?;
        }
        if !raw.variants.is_empty() {
            spec.variants = raw.variants;
        }

        spec.validate().map_err(serde::de::Error::custom)?;
        Ok(spec)
    }
}

/// Deserializes a YAML scalar or sequence of scalars as a build/test script.
pub(crate) fn deserialize_script<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde_yaml::Value;
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Sequence(seq) => Vec::<String>::deserialize(Value::Sequence(seq))
            .map_err(|err| serde::de::Error::custom(err.to_string())),
        Value::String(string) => Ok(string.lines().map(String::from).collect()),
        _ => Err(serde::de::Error::custom(
            "expected string or list of strings",
        )),
    }
}
