// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;
use std::sync::Arc;

use spk_foundation::name::PkgNameBuf;
use spk_ident::Identifier;
use spk_repo::{MemRepository, Repository};
use spk_solve_graph::State;
use spk_spec::Spec;

use super::*;

fn spec(ident: &str) -> Spec {
    Spec::new(Identifier::from_str(ident).unwrap())
}

#[tokio::test]
async fn test_candidates_are_ordered_newest_version_first() {
    let repo = Arc::new(MemRepository::new());
    repo.publish(spec("numpy/1.0.0/3I42H3S6"), Default::default());
    repo.publish(spec("numpy/2.0.0/CUSTOM01"), Default::default());
    repo.publish(spec("numpy/1.5.0/CUSTOM02"), Default::default());

    let repos: Vec<(String, Arc<dyn Repository>)> = vec![("origin".into(), repo)];
    let name = PkgNameBuf::from_str("numpy").unwrap();
    let state = State::default_state();

    let candidates = enumerate_candidates(&repos, &name, &state).await.unwrap();
    let versions: Vec<_> = candidates
        .iter()
        .map(|c| c.spec.pkg.version().to_string())
        .collect();
    assert_eq!(versions, vec!["2.0.0", "1.5.0", "1.0.0"]);
}

#[tokio::test]
async fn test_candidates_span_every_registered_repository() {
    let repo_a = Arc::new(MemRepository::new());
    repo_a.publish(spec("numpy/1.0.0/3I42H3S6"), Default::default());
    let repo_b = Arc::new(MemRepository::new());
    repo_b.publish(spec("numpy/2.0.0/CUSTOM01"), Default::default());

    let repos: Vec<(String, Arc<dyn Repository>)> =
        vec![("a".into(), repo_a), ("b".into(), repo_b)];
    let name = PkgNameBuf::from_str("numpy").unwrap();
    let state = State::default_state();

    let candidates = enumerate_candidates(&repos, &name, &state).await.unwrap();
    assert_eq!(candidates.len(), 2);
}

#[tokio::test]
async fn test_no_candidates_for_unpublished_package() {
    let repo = Arc::new(MemRepository::new());
    let repos: Vec<(String, Arc<dyn Repository>)> = vec![("origin".into(), repo)];
    let name = PkgNameBuf::from_str("missing").unwrap();
    let state = State::default_state();

    let candidates = enumerate_candidates(&repos, &name, &state).await.unwrap();
    assert!(candidates.is_empty());
}
