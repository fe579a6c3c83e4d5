// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;
use std::sync::Arc;

use spk_foundation::name::{OptNameBuf, PkgNameBuf};
use spk_ident::{Identifier, PkgRequest, Request};
use spk_repo::MemRepository;
use spk_spec::{Inheritance, Opt, PkgOpt, Spec, VarOpt};

use super::*;

fn spec(ident: &str) -> Spec {
    Spec::new(Identifier::from_str(ident).unwrap())
}

#[tokio::test]
async fn test_empty_request_list_resolves_to_empty_solution() {
    let solver = Solver::new();
    let solution = solver.solve().await.unwrap();
    assert!(solution.is_empty());
}

#[tokio::test]
async fn test_single_package_one_repo_resolves() {
    let repo = Arc::new(MemRepository::new());
    repo.publish(spec("numpy/1.0.0/3I42H3S6"), Default::default());

    let mut solver = Solver::new();
    solver.add_repository("origin", repo);
    solver.add_request(PkgRequest::from_str("numpy/1.0.0").unwrap());

    let solution = solver.solve().await.unwrap();
    assert!(solution.get("numpy").is_some());
    assert_eq!(solution.len(), 1);
}

#[tokio::test]
async fn test_transitive_install_requirement_resolves() {
    let repo = Arc::new(MemRepository::new());
    repo.publish(spec("numpy/1.0.0/3I42H3S6"), Default::default());

    let mut mypkg = spec("mypkg/1.0.0/CUSTOM01");
    mypkg
        .install
        .upsert_requirement(Request::Pkg(PkgRequest::from_str("numpy/1.0.0").unwrap()));
    repo.publish(mypkg, Default::default());

    let mut solver = Solver::new();
    solver.add_repository("origin", repo);
    solver.add_request(PkgRequest::from_str("mypkg/1.0.0").unwrap());

    let solution = solver.solve().await.unwrap();
    assert!(solution.get("mypkg").is_some());
    assert!(solution.get("numpy").is_some());
}

#[tokio::test]
async fn test_zero_candidate_request_fails_immediately() {
    let repo = Arc::new(MemRepository::new());

    let mut solver = Solver::new();
    solver.add_repository("origin", repo);
    solver.add_request(PkgRequest::from_str("missing/1.0.0").unwrap());

    let err = solver.solve().await.unwrap_err();
    assert!(matches!(err, Error::PackageNotFound(_)));
}

#[test]
fn test_conflicting_exact_requests_fail_immediately() {
    let mut solver = Solver::new();
    solver.add_request(PkgRequest::from_str("numpy/1.0.0").unwrap());
    solver.add_request(PkgRequest::from_str("numpy/2.0.0").unwrap());

    assert!(solver.run().is_err());
}

#[tokio::test]
async fn test_deprecated_build_is_excluded_unless_requested_exactly() {
    let repo = Arc::new(MemRepository::new());
    let mut deprecated = spec("numpy/1.0.0/3I42H3S6");
    deprecated.deprecate();
    repo.publish(deprecated, Default::default());

    let mut solver = Solver::new();
    solver.add_repository("origin", Arc::clone(&repo));
    solver.add_request(PkgRequest::from_str("numpy/1.0.0").unwrap());
    assert!(solver.solve().await.is_err());

    let mut solver = Solver::new();
    solver.add_repository("origin", repo);
    solver.add_request(PkgRequest::from_str("numpy/1.0.0/3I42H3S6").unwrap());
    let solution = solver.solve().await.unwrap();
    assert!(solution.get("numpy").is_some());
}

#[tokio::test]
async fn test_backtrack_when_newest_build_requires_unavailable_dependency() {
    let repo = Arc::new(MemRepository::new());
    repo.publish(spec("b/1.0.0/3I42H3S6"), Default::default());

    let mut a_new = spec("a/2.0.0/NEWBUILD");
    a_new
        .install
        .upsert_requirement(Request::Pkg(PkgRequest::from_str("b/9.0.0").unwrap()));
    repo.publish(a_new, Default::default());

    let mut a_old = spec("a/1.0.0/OLDBUILD");
    a_old
        .install
        .upsert_requirement(Request::Pkg(PkgRequest::from_str("b/1.0.0").unwrap()));
    repo.publish(a_old, Default::default());

    let mut solver = Solver::new();
    solver.add_repository("origin", repo);
    solver.add_request(PkgRequest::from_str("a").unwrap());

    let solution = solver.solve().await.unwrap();
    let resolved_a = solution.get("a").unwrap();
    assert_eq!(resolved_a.spec.pkg.version().to_string(), "1.0.0");
    let resolved_b = solution.get("b").unwrap();
    assert_eq!(resolved_b.spec.pkg.version().to_string(), "1.0.0");
}

#[tokio::test]
async fn test_strong_for_build_only_option_propagates_as_namespaced_var() {
    let repo = Arc::new(MemRepository::new());

    let mut toolchain = spec("toolchain/1.0.0/3I42H3S6");
    let mut debug_opt = VarOpt::new(OptNameBuf::from_str("debug").unwrap());
    debug_opt.inheritance = Inheritance::StrongForBuildOnly;
    debug_opt.set_value("on".to_string()).unwrap();
    toolchain.build.options.push(Opt::Var(debug_opt));
    repo.publish(toolchain, Default::default());

    let mut solver = Solver::new();
    solver.add_repository("origin", repo);
    solver.add_request(PkgRequest::from_str("toolchain/1.0.0").unwrap());

    let mut runtime = solver.run().unwrap();
    let mut last_state = None;
    while let Some((node, _decision)) = runtime.step().await.unwrap() {
        last_state = Some(node.state);
    }
    let state = last_state.expect("at least one decision was made");

    let namespaced = OptNameBuf::from_str("toolchain.debug").unwrap();
    let bound = state
        .get_var_request(&namespaced)
        .expect("strong-for-build-only option should be bound as a namespaced var request");
    assert_eq!(bound.value.as_deref(), Some("on"));
}

#[tokio::test]
async fn test_source_build_resolves_build_environment_and_keeps_src_identifier() {
    let repo = Arc::new(MemRepository::new());
    repo.publish(spec("cc/1.0.0/3I42H3S6"), Default::default());

    let mut mylib = spec("mylib/1.0.0/src");
    mylib
        .build
        .options
        .push(Opt::Pkg(PkgOpt::new(PkgNameBuf::from_str("cc").unwrap())));
    repo.publish(mylib, Default::default());

    let mut solver = Solver::new();
    solver.add_repository("origin", repo);
    solver.add_request(PkgRequest::from_str("mylib/1.0.0").unwrap());

    let solution = solver.solve().await.unwrap();
    let resolved = solution.get("mylib").unwrap();
    assert!(resolved.is_source_build());
    assert!(resolved.spec.pkg.is_source());

    let environment = resolved
        .source
        .environment()
        .expect("a source build records the environment it would build in");
    assert!(environment.get("cc").is_some());
}

#[tokio::test]
async fn test_source_build_depending_on_itself_is_rejected() {
    let repo = Arc::new(MemRepository::new());

    let mut selfdep = spec("selfdep/1.0.0/src");
    selfdep
        .build
        .options
        .push(Opt::Pkg(PkgOpt::new(PkgNameBuf::from_str("selfdep").unwrap())));
    repo.publish(selfdep, Default::default());

    let mut solver = Solver::new();
    solver.add_repository("origin", repo);
    solver.add_request(PkgRequest::from_str("selfdep/1.0.0").unwrap());

    let err = solver.solve().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Graph(spk_solve_graph::Error::FailedToResolve(_))
    ));
}
