// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use spk_foundation::name::PkgNameBuf;
use spk_foundation::option_map::OptionMap;
use spk_foundation::version::VERSION_SEP;
use spk_ident::PkgRequest;
use spk_spec::Spec;

use crate::PackageSource;

#[cfg(test)]
#[path = "./solution_test.rs"]
mod solution_test;

/// A package request that has been resolved to a concrete spec and source.
#[derive(Clone, Debug)]
pub struct SolvedRequest {
    pub request: PkgRequest,
    pub spec: Spec,
    pub source: PackageSource,
}

impl SolvedRequest {
    pub fn is_source_build(&self) -> bool {
        matches!(self.source, PackageSource::BuildFromSource { .. })
    }
}

/// The set of resolved packages and effective options produced by a solve.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    options: OptionMap,
    resolved: BTreeMap<PkgNameBuf, (PkgRequest, Spec, PackageSource)>,
    insertion_order: Vec<PkgNameBuf>,
}

impl Solution {
    pub fn new(options: OptionMap) -> Self {
        Self {
            options,
            resolved: BTreeMap::new(),
            insertion_order: Vec::new(),
        }
    }

    /// Add a resolved request to this solution, in resolve order.
    pub fn add(&mut self, request: PkgRequest, spec: Spec, source: PackageSource) {
        let name = spec.pkg.name().clone();
        if !self.resolved.contains_key(&name) {
            self.insertion_order.push(name.clone());
        }
        self.resolved.insert(name, (request, spec, source));
    }

    /// All resolved requests, in the order they were added.
    pub fn items(&self) -> Vec<SolvedRequest> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.resolved.get(name))
            .map(|(request, spec, source)| SolvedRequest {
                request: request.clone(),
                spec: spec.clone(),
                source: source.clone(),
            })
            .collect()
    }

    pub fn get(&self, name: impl AsRef<str>) -> Option<SolvedRequest> {
        self.resolved
            .iter()
            .find(|(pkg_name, _)| pkg_name.as_str() == name.as_ref())
            .map(|(_, (request, spec, source))| SolvedRequest {
                request: request.clone(),
                spec: spec.clone(),
                source: source.clone(),
            })
    }

    pub fn options(&self) -> &OptionMap {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Render this solution as environment variables, e.g. `SPK_PKG_python`,
    /// alongside the effective option map's own `SPK_OPT_*` variables.
    ///
    /// If `base` is given, any existing `SPK_PKG_*`/`SPK_ACTIVE_PREFIX`
    /// entries are cleared first so stale values from a previous
    /// environment don't leak through.
    pub fn to_environment<V>(&self, base: Option<V>) -> BTreeMap<String, String>
    where
        V: IntoIterator<Item = (String, String)>,
    {
        let mut out: BTreeMap<String, String> = base
            .map(IntoIterator::into_iter)
            .map(|iter| iter.collect())
            .unwrap_or_default();

        out.retain(|name, _| !name.starts_with("SPK_PKG_") && name != "SPK_ACTIVE_PREFIX");

        out.insert("SPK_ACTIVE_PREFIX".to_string(), "/spfs".to_string());
        for (name, spec, _source) in self.resolved.values() {
            out.insert(format!("SPK_PKG_{name}"), spec.pkg.to_string());
            out.insert(
                format!("SPK_PKG_{name}_VERSION"),
                spec.pkg.version().to_string(),
            );
            out.insert(
                format!("SPK_PKG_{name}_BUILD"),
                spec.pkg
                    .build()
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "None".to_string()),
            );
            out.insert(
                format!("SPK_PKG_{name}_VERSION_MAJOR"),
                spec.pkg.version().major().to_string(),
            );
            out.insert(
                format!("SPK_PKG_{name}_VERSION_MINOR"),
                spec.pkg.version().minor().to_string(),
            );
            out.insert(
                format!("SPK_PKG_{name}_VERSION_PATCH"),
                spec.pkg.version().patch().to_string(),
            );
            out.insert(
                format!("SPK_PKG_{name}_VERSION_BASE"),
                spec.pkg
                    .version()
                    .parts()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(VERSION_SEP),
            );
        }

        out.extend(self.options.to_environment());
        out
    }
}
