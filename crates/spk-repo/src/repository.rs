// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use async_trait::async_trait;
use spk_foundation::name::PkgNameBuf;
use spk_foundation::version::Version;
use spk_ident::Identifier;
use spk_spec::Spec;

use crate::{Digest, Result};

/// Abstract lookup of package specs, available builds, and build payloads.
///
/// Collecting, publishing, and rendering the payloads themselves are out of
/// scope here; the solver only ever reads through this interface.
#[async_trait]
pub trait Repository: Send + Sync {
    /// List every version of the named package known to this repository.
    async fn list_packages(&self, name: &PkgNameBuf) -> Result<Vec<Version>>;

    /// List every concrete build known for one version of a package.
    async fn list_builds(&self, name: &PkgNameBuf, version: &Version) -> Result<Vec<Identifier>>;

    /// Read the full spec for a concrete package identifier.
    async fn read_spec(&self, ident: &Identifier) -> Result<Spec>;

    /// Look up the opaque payload digest of each named component of a build.
    async fn get_package_payload(&self, ident: &Identifier) -> Result<BTreeMap<String, Digest>>;

    /// Whether the identified build has been marked deprecated.
    async fn is_deprecated(&self, ident: &Identifier) -> Result<bool>;
}
