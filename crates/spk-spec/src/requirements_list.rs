// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use spk_ident::Request;

use crate::{Error, Result};

#[cfg(test)]
#[path = "./requirements_list_test.rs"]
mod requirements_list_test;

/// A set of requests, such as a package's install requirements or a test's
/// requirements.
///
/// A requirements list cannot contain multiple requests with the same
/// name; they must be combined into a single request as needed.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementsList(Vec<Request>);

impl std::ops::Deref for RequirementsList {
    type Target = Vec<Request>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl RequirementsList {
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a reference to the first request with the given name.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&Request> {
        self.0.iter().find(|r| r.name() == name.as_ref())
    }

    /// Add or replace a requirement in this list.
    ///
    /// If a request exists for the same name, it is replaced with the given
    /// one. Otherwise the new request is appended to the list. Returns the
    /// replaced request, if any.
    pub fn upsert(&mut self, request: Request) -> Option<Request> {
        let name = request.name().to_string();
        for existing in self.0.iter_mut() {
            if existing.name() == name {
                return Some(std::mem::replace(existing, request));
            }
        }
        self.0.push(request);
        None
    }

    /// Add a requirement to this list, or merge it into an existing one for
    /// the same name.
    ///
    /// Only two `Request::Pkg` entries can be merged; any other collision of
    /// names is an error.
    pub fn insert_or_merge(&mut self, request: Request) -> Result<()> {
        let name = request.name().to_string();
        for existing in self.0.iter_mut() {
            if existing.name() != name {
                continue;
            }
            return match (existing, &request) {
                (Request::Pkg(existing), Request::Pkg(incoming)) => existing
                    .restrict(incoming)
                    .map_err(|err| Error::String(format!("cannot insert requirement: {err}"))),
                (existing, _) => Err(Error::String(format!(
                    "cannot insert requirement: one already exists and only pkg requests can be merged: {existing} + {request}"
                ))),
            };
        }
        self.0.push(request);
        Ok(())
    }

    pub fn from_vec(requests: Vec<Request>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for request in &requests {
            if !seen.insert(request.name().to_string()) {
                return Err(Error::Validation(format!(
                    "duplicate requirement name '{}'",
                    request.name()
                )));
            }
        }
        Ok(Self(requests))
    }

    pub fn into_inner(self) -> Vec<Request> {
        self.0
    }
}

impl IntoIterator for RequirementsList {
    type Item = Request;
    type IntoIter = std::vec::IntoIter<Request>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RequirementsList {
    type Item = &'a Request;
    type IntoIter = std::slice::Iter<'a, Request>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
