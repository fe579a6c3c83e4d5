// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use spk_foundation::name::PkgNameBuf;
use spk_foundation::version::Version;
use spk_ident::Identifier;
use spk_spec::Spec;

use crate::{Digest, Error, Repository, Result};

#[cfg(test)]
#[path = "./mem_repository_test.rs"]
mod mem_repository_test;

#[derive(Default)]
struct Inner {
    builds: BTreeMap<PkgNameBuf, BTreeMap<Version, BTreeMap<Identifier, Spec>>>,
    payloads: BTreeMap<Identifier, BTreeMap<String, Digest>>,
}

/// An in-memory [`Repository`] for tests and embedding small, self-contained
/// solver scenarios without any real storage backend.
#[derive(Default)]
pub struct MemRepository {
    inner: RwLock<Inner>,
}

impl MemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a spec, with an optional map of component payload digests,
    /// into this repository.
    pub fn publish(&self, spec: Spec, payload: BTreeMap<String, Digest>) {
        let ident = spec.pkg.clone();
        let mut inner = self.inner.write().expect("lock poisoned");
        inner
            .builds
            .entry(ident.name().clone())
            .or_default()
            .entry(ident.version().clone())
            .or_default()
            .insert(ident.clone(), spec);
        if !payload.is_empty() {
            inner.payloads.insert(ident, payload);
        }
    }
}

#[async_trait]
impl Repository for MemRepository {
    async fn list_packages(&self, name: &PkgNameBuf) -> Result<Vec<Version>> {
        let inner = self.inner.read().expect("lock poisoned");
        let versions: Vec<Version> = inner
            .builds
            .get(name)
            .map(|versions| versions.keys().cloned().collect())
            .unwrap_or_default();
        tracing::debug!(%name, found = versions.len(), "listed package versions");
        Ok(versions)
    }

    async fn list_builds(&self, name: &PkgNameBuf, version: &Version) -> Result<Vec<Identifier>> {
        let inner = self.inner.read().expect("lock poisoned");
        let builds: Vec<Identifier> = inner
            .builds
            .get(name)
            .and_then(|versions| versions.get(version))
            .map(|builds| builds.keys().cloned().collect())
            .unwrap_or_default();
        tracing::debug!(%name, %version, found = builds.len(), "listed package builds");
        Ok(builds)
    }

    async fn read_spec(&self, ident: &Identifier) -> Result<Spec> {
        tracing::debug!(%ident, "reading spec");
        let inner = self.inner.read().expect("lock poisoned");
        inner
            .builds
            .get(ident.name())
            .and_then(|versions| versions.get(ident.version()))
            .and_then(|builds| builds.get(ident))
            .cloned()
            .ok_or_else(|| Error::PackageNotFound(ident.to_string()))
    }

    async fn get_package_payload(&self, ident: &Identifier) -> Result<BTreeMap<String, Digest>> {
        let inner = self.inner.read().expect("lock poisoned");
        Ok(inner.payloads.get(ident).cloned().unwrap_or_default())
    }

    async fn is_deprecated(&self, ident: &Identifier) -> Result<bool> {
        self.read_spec(ident).await.map(|spec| spec.is_deprecated())
    }
}
