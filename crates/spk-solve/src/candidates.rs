// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::sync::Arc;

use spk_foundation::name::PkgNameBuf;
use spk_foundation::version::Version;
use spk_ident::Build;
use spk_repo::Repository;
use spk_solve_graph::State;
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use crate::Result;

#[cfg(test)]
#[path = "./candidates_test.rs"]
mod candidates_test;

/// A build considered for a pending request: its spec, and where its
/// payload would come from if resolved as-is.
///
/// Whether a `Repository` source is actually a binary build or a source
/// build yet to be built is determined by `spec.pkg.build()` being
/// `Some(Build::Source)`; the solver decides what to do about that, this
/// module only reports what a repository has on offer.
pub struct Candidate {
    pub spec: Spec,
    pub source: PackageSource,
}

/// Every build of `name` offered by `repos`, newest version first and, in
/// repository registration order within a version. Within a single
/// version's builds, a build whose digest matches the state's currently
/// resolved options for this package is tried first, so an
/// already-constrained build is preferred over an equally valid
/// alternative.
///
/// Collects everything eagerly rather than paging lazily through
/// repositories one version and build at a time: `spk-repo::Repository`
/// has no pagination machinery to preserve, so there is nothing gained by
/// streaming these results incrementally.
pub async fn enumerate_candidates(
    repos: &[(String, Arc<dyn Repository>)],
    name: &PkgNameBuf,
    state: &State,
) -> Result<Vec<Candidate>> {
    tracing::debug!(%name, repos = repos.len(), "listing candidates");

    let mut by_version: BTreeMap<Version, Vec<usize>> = BTreeMap::new();
    for (idx, (repo_name, repo)) in repos.iter().enumerate() {
        let versions = repo.list_packages(name).await?;
        tracing::debug!(%name, repo = %repo_name, found = versions.len(), "repository query finished");
        for version in versions {
            by_version.entry(version).or_default().push(idx);
        }
    }

    let preferred_digest = state.get_options().package_options(name).digest();

    let mut candidates = Vec::new();
    for (version, repo_indices) in by_version.into_iter().rev() {
        for repo_idx in repo_indices {
            let (repo_name, repo) = &repos[repo_idx];
            let mut builds = repo.list_builds(name, &version).await?;
            builds.sort_by_key(|ident| {
                let matches_digest =
                    matches!(ident.build(), Some(Build::Digest(d)) if d == &preferred_digest);
                std::cmp::Reverse(matches_digest)
            });

            for ident in builds {
                let spec = repo.read_spec(&ident).await?;
                let components = repo.get_package_payload(&ident).await?;
                candidates.push(Candidate {
                    spec,
                    source: PackageSource::Repository {
                        repo_name: repo_name.clone(),
                        components,
                    },
                });
            }
        }
    }

    Ok(candidates)
}
