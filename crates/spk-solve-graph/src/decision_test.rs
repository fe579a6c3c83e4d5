// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use spk_ident::{Identifier, PkgRequest, Request};
use spk_solve_solution::PackageSource;
use spk_spec::{Inheritance, Opt, Spec, VarOpt};

use super::*;

#[test]
fn test_resolve_package_carries_install_requirements() {
    let state = State::default_state();
    let state = Change::RequestPackage(PkgRequest::from_str("numpy").unwrap())
        .apply(&state)
        .unwrap();

    let mut spec = Spec::new(Identifier::from_str("numpy/1.0.0").unwrap());
    spec.install
        .upsert_requirement(Request::Pkg(PkgRequest::from_str("python").unwrap()));

    let decision = Decision::builder(&state)
        .resolve_package(&spec, PackageSource::Embedded)
        .unwrap();
    let next = decision.apply(&state).unwrap();

    assert_eq!(next.as_solution().len(), 1);
    assert!(
        next.get_unresolved_requests()
            .iter()
            .any(|r| r.pkg.name().as_str() == "python")
    );
}

#[test]
fn test_strong_option_inheritance_adds_namespaced_var_and_pinned_request() {
    let state = State::default_state();
    let state = Change::RequestPackage(PkgRequest::from_str("python").unwrap())
        .apply(&state)
        .unwrap();

    let mut spec = Spec::new(Identifier::from_str("python/3.7.3").unwrap());
    let mut opt = VarOpt::new("abi".parse().unwrap());
    opt.inheritance = Inheritance::Strong;
    opt.set_value("cp37".to_string()).unwrap();
    spec.build.options.push(Opt::Var(opt));

    let decision = Decision::builder(&state)
        .resolve_package(&spec, PackageSource::Embedded)
        .unwrap();
    let next = decision.apply(&state).unwrap();

    let namespaced: spk_foundation::name::OptNameBuf = "python.abi".parse().unwrap();
    let bound = next.get_var_request(&namespaced).unwrap();
    assert_eq!(bound.value.as_deref(), Some("cp37"));
    assert!(next.as_solution().get("python").is_some());
}

#[test]
fn test_embedded_packages_resolve_atomically() {
    let state = State::default_state();

    let mut spec = Spec::new(Identifier::from_str("bundle/1.0.0").unwrap());
    let embedded = Spec::new(Identifier::from_str("bundle-lib/1.0.0").unwrap());
    spec.install.embedded.push(embedded);

    let decision = Decision::builder(&state)
        .resolve_package(&spec, PackageSource::Embedded)
        .unwrap();
    let next = decision.apply(&state).unwrap();

    assert_eq!(next.as_solution().len(), 2);
    assert!(next.as_solution().get("bundle-lib").is_some());
}
