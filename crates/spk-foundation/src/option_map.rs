// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::{BTreeMap, HashMap};
use std::iter::FromIterator;

use serde::{Deserialize, Serialize};

use crate::name::{OptNameBuf, PkgName};

#[cfg(test)]
#[path = "./option_map_test.rs"]
mod option_map_test;

/// The number of base32 characters an option digest is truncated to.
///
/// Digests are namespaced by the package they apply to, so collisions are
/// an acceptable risk in exchange for a short, readable build identifier.
pub const DIGEST_SIZE: usize = 8;

/// A set of values for package build options, keyed by (possibly
/// namespaced) option name.
#[derive(Default, Clone, Hash, PartialEq, Eq, Ord, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct OptionMap {
    options: BTreeMap<OptNameBuf, String>,
}

impl std::ops::Deref for OptionMap {
    type Target = BTreeMap<OptNameBuf, String>;
    fn deref(&self) -> &Self::Target {
        &self.options
    }
}

impl std::ops::DerefMut for OptionMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.options
    }
}

impl FromIterator<(OptNameBuf, String)> for OptionMap {
    fn from_iter<T: IntoIterator<Item = (OptNameBuf, String)>>(iter: T) -> Self {
        Self {
            options: BTreeMap::from_iter(iter),
        }
    }
}

impl IntoIterator for OptionMap {
    type IntoIter = std::collections::btree_map::IntoIter<OptNameBuf, String>;
    type Item = (OptNameBuf, String);
    fn into_iter(self) -> Self::IntoIter {
        self.options.into_iter()
    }
}

impl std::fmt::Debug for OptionMap {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::fmt::Display for OptionMap {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let items: Vec<_> = self.iter().map(|(n, v)| format!("{n}: {v}")).collect();
        write!(f, "{{{}}}", items.join(", "))
    }
}

impl OptionMap {
    /// Return these options rendered as environment variables, e.g.
    /// `SPK_OPT_debug=on`.
    pub fn to_environment(&self) -> HashMap<String, String> {
        let mut out = HashMap::default();
        for (name, value) in self.iter() {
            let var_name = format!("SPK_OPT_{}", name.as_str().replace('.', "_"));
            out.insert(var_name, value.clone());
        }
        out
    }

    /// Only the options in this map that are not namespaced to a specific
    /// package.
    pub fn global_options(&self) -> Self {
        self.iter()
            .filter(|(k, _)| k.namespace().is_none())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The options namespaced to the given package, with the namespace
    /// stripped.
    pub fn package_options_without_global(&self, name: &PkgName) -> Self {
        let mut options = OptionMap::default();
        for (opt_name, value) in self.iter() {
            if opt_name.namespace() == Some(name) {
                let base = OptNameBuf::new(opt_name.base_name().to_string())
                    .expect("namespaced option base name is already validated");
                options.insert(base, value.clone());
            }
        }
        options
    }

    /// The options relevant to the given package: its global options plus
    /// any namespaced specifically to it.
    pub fn package_options(&self, name: &PkgName) -> Self {
        let mut options = self.global_options();
        for (k, v) in self.package_options_without_global(name) {
            options.insert(k, v);
        }
        options
    }

    /// A short, stable identifier for the exact contents of this map.
    ///
    /// Used as (part of) a package build's identifier: two builds made with
    /// identical option maps are expected to produce identical digests.
    pub fn digest(&self) -> String {
        let mut hasher = ring::digest::Context::new(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY);
        for (name, value) in self.iter() {
            hasher.update(name.as_str().as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
            hasher.update(&[0]);
        }
        let digest = hasher.finish();
        let encoded = data_encoding::BASE32.encode(digest.as_ref());
        encoded.chars().take(DIGEST_SIZE).collect()
    }
}

impl<'de> Deserialize<'de> for OptionMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct OptionMapVisitor;

        impl<'de> serde::de::Visitor<'de> for OptionMapVisitor {
            type Value = OptionMap;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a mapping of option values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut options = OptionMap::default();
                while let Some((name, value)) = map.next_entry::<OptNameBuf, Stringified>()? {
                    options.insert(name, value.0);
                }
                Ok(options)
            }
        }

        deserializer.deserialize_map(OptionMapVisitor)
    }
}

/// Deserializes a string from any scalar YAML/JSON value (bool, int, float,
/// string), so option values like `debug: on` don't need quoting.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
struct Stringified(String);

impl<'de> Deserialize<'de> for Stringified {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct StringifyVisitor;

        impl serde::de::Visitor<'_> for StringifyVisitor {
            type Value = Stringified;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a scalar value")
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Stringified(v.to_string()))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Stringified(v.to_string()))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Stringified(v.to_string()))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Stringified(v.to_string()))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Stringified(v.to_string()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(Stringified(v))
            }
        }

        deserializer.deserialize_any(StringifyVisitor)
    }
}
