// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use spk_ident::{Identifier, PkgRequest, Request};
use spk_solve_graph::{Change, State};
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use super::*;

#[test]
fn test_requirement_matching_resolved_package_is_compatible() {
    let state = State::default_state();
    let numpy = Spec::new(Identifier::from_str("numpy/1.0.0").unwrap());
    let state = Change::ResolvePackage(Box::new(numpy), PackageSource::Embedded)
        .apply(&state)
        .unwrap();

    let mut spec = Spec::new(Identifier::from_str("my-package/1.0.0").unwrap());
    spec.install
        .upsert_requirement(Request::Pkg(PkgRequest::from_str("numpy/1.0.0").unwrap()));

    let compat = PkgRequirementsValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(compat.is_ok());
}

#[test]
fn test_requirement_conflicting_with_resolved_package_is_incompatible() {
    let state = State::default_state();
    let numpy = Spec::new(Identifier::from_str("numpy/1.0.0").unwrap());
    let state = Change::ResolvePackage(Box::new(numpy), PackageSource::Embedded)
        .apply(&state)
        .unwrap();

    let mut spec = Spec::new(Identifier::from_str("my-package/1.0.0").unwrap());
    spec.install
        .upsert_requirement(Request::Pkg(PkgRequest::from_str("numpy/2.0.0").unwrap()));

    let compat = PkgRequirementsValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(!compat.is_ok());
}

#[test]
fn test_requirement_mergeable_with_pending_is_compatible() {
    let state = State::default_state();
    let state = Change::RequestPackage(PkgRequest::from_str("numpy/1.0.0").unwrap())
        .apply(&state)
        .unwrap();

    let mut spec = Spec::new(Identifier::from_str("my-package/1.0.0").unwrap());
    spec.install
        .upsert_requirement(Request::Pkg(PkgRequest::from_str("numpy/1").unwrap()));

    let compat = PkgRequirementsValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(compat.is_ok());
}
