// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Borrow;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
#[path = "./name_test.rs"]
mod name_test;

/// Denotes an invalid package or option name.
#[derive(Debug, Error)]
#[error("invalid name: {message}")]
pub struct InvalidNameError {
    pub message: String,
}

impl InvalidNameError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn validate_pkg_name(name: &str) -> Result<(), InvalidNameError> {
    if name.is_empty() {
        return Err(InvalidNameError::new("package name may not be empty"));
    }
    let mut chars = name.chars();
    let first = chars.next().expect("checked non-empty");
    if !first.is_ascii_lowercase() {
        return Err(InvalidNameError::new(format!(
            "package name must start with a lowercase letter, got '{name}'"
        )));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(InvalidNameError::new(format!(
            "package name may only contain lowercase letters, digits and '-', found '{bad}' in '{name}'"
        )));
    }
    Ok(())
}

fn validate_opt_name(name: &str) -> Result<(), InvalidNameError> {
    if name.is_empty() {
        return Err(InvalidNameError::new("option name may not be empty"));
    }
    // namespaced options are `<pkgname>.<base>`
    if let Some((namespace, base)) = name.split_once('.') {
        validate_pkg_name(namespace)
            .map_err(|e| InvalidNameError::new(format!("invalid option namespace: {e}")))?;
        if base.is_empty() {
            return Err(InvalidNameError::new(format!(
                "option name may not be empty after namespace in '{name}'"
            )));
        }
        return validate_opt_base(base);
    }
    validate_opt_base(name)
}

fn validate_opt_base(base: &str) -> Result<(), InvalidNameError> {
    let mut chars = base.chars();
    let first = chars.next().expect("checked non-empty by caller");
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(InvalidNameError::new(format!(
            "option name must start with a letter or '_', got '{base}'"
        )));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-')) {
        return Err(InvalidNameError::new(format!(
            "option name may only contain alphanumerics, '_' and '-', found '{bad}' in '{base}'"
        )));
    }
    Ok(())
}

macro_rules! name_type {
    ($owned:ident, $borrowed:ident, $validate:ident, $doc:literal) => {
        #[doc = concat!("An owned, validated ", $doc, " name.")]
        #[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $owned(String);

        #[doc = concat!("A validated ", $doc, " name.")]
        #[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct $borrowed(str);

        impl $owned {
            pub fn new(name: impl Into<String>) -> Result<Self, InvalidNameError> {
                let name = name.into();
                $validate(&name)?;
                Ok(Self(name))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl $borrowed {
            pub fn new(name: &str) -> Result<&Self, InvalidNameError> {
                $validate(name)?;
                // SAFETY: `$borrowed` is a `#[repr(transparent)]`-equivalent
                // newtype over `str`; validation above confirms the bytes
                // are a valid instance.
                Ok(unsafe { &*(name as *const str as *const Self) })
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $owned {
            type Target = $borrowed;
            fn deref(&self) -> &$borrowed {
                // SAFETY: `$owned` is only constructed via a validated string.
                unsafe { &*(self.0.as_str() as *const str as *const $borrowed) }
            }
        }

        impl AsRef<$borrowed> for $owned {
            fn as_ref(&self) -> &$borrowed {
                self
            }
        }

        impl Borrow<$borrowed> for $owned {
            fn borrow(&self) -> &$borrowed {
                self
            }
        }

        impl ToOwned for $borrowed {
            type Owned = $owned;
            fn to_owned(&self) -> $owned {
                $owned(self.0.to_owned())
            }
        }

        impl Display for $owned {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Display for $borrowed {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $owned {
            type Err = InvalidNameError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $owned {
            type Error = InvalidNameError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl TryFrom<&str> for $owned {
            type Error = InvalidNameError;
            fn try_from(s: &str) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl Serialize for $owned {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $owned {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::new(s).map_err(serde::de::Error::custom)
            }
        }
    };
}

name_type!(PkgNameBuf, PkgName, validate_pkg_name, "package");
name_type!(OptNameBuf, OptName, validate_opt_name, "option");

impl OptName {
    /// The namespace portion of this option name (the package name before
    /// the first `.`), if any.
    pub fn namespace(&self) -> Option<&PkgName> {
        let (ns, _) = self.0.split_once('.')?;
        // SAFETY: the namespace of an already-validated option name is
        // itself a validated package name.
        Some(unsafe { &*(ns as *const str as *const PkgName) })
    }

    /// This option's name with any namespace stripped.
    pub fn base_name(&self) -> &str {
        match self.0.split_once('.') {
            Some((_, base)) => base,
            None => &self.0,
        }
    }

    /// Build a namespaced option name from a package name and a base name.
    pub fn namespaced(namespace: &PkgName, base: &str) -> Result<OptNameBuf, InvalidNameError> {
        OptNameBuf::new(format!("{namespace}.{base}"))
    }
}

impl PkgName {
    pub fn as_opt_name(&self) -> &OptName {
        // A validated package name is always a validated (un-namespaced)
        // option name too, since option base-name rules are a superset
        // restriction compatible with package-name characters... except
        // for leading digits/'-', which package names also disallow, and
        // the regex used for option base names additionally allows
        // leading underscore and uppercase, both supersets of pkg names.
        OptName::new(self.as_str()).expect("a valid package name is a valid option name")
    }
}
