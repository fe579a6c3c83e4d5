// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use spk_ident::{Identifier, PkgRequest};
use spk_solve_graph::{Change, State};
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use super::*;

#[test]
fn test_candidate_outside_requested_range_is_rejected() {
    let state = State::default_state();
    let state = Change::RequestPackage(PkgRequest::from_str("numpy/2.0.0").unwrap())
        .apply(&state)
        .unwrap();

    let spec = Spec::new(Identifier::from_str("numpy/1.0.0").unwrap());
    let compat = PkgRequestValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(!compat.is_ok());
}

#[test]
fn test_candidate_within_requested_range_is_compatible() {
    let state = State::default_state();
    let state = Change::RequestPackage(PkgRequest::from_str("numpy/2.0.0").unwrap())
        .apply(&state)
        .unwrap();

    let spec = Spec::new(Identifier::from_str("numpy/2.0.0").unwrap());
    let compat = PkgRequestValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(compat.is_ok());
}

#[test]
fn test_unrequested_package_is_rejected() {
    let state = State::default_state();
    let spec = Spec::new(Identifier::from_str("numpy/2.0.0").unwrap());
    let compat = PkgRequestValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(!compat.is_ok());
}
