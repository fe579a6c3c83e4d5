// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use spk_ident::{Identifier, PkgRequest};
use spk_solve_graph::{Change, State};
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use super::*;

#[test]
fn test_non_deprecated_build_is_always_compatible() {
    let state = State::default_state();
    let spec = Spec::new(Identifier::from_str("numpy/1.0.0/3I42H3S6").unwrap());
    let compat = DeprecationValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(compat.is_ok());
}

#[test]
fn test_deprecated_build_is_rejected_when_not_named_exactly() {
    let state = State::default_state();
    let state = Change::RequestPackage(PkgRequest::from_str("numpy/1.0.0").unwrap())
        .apply(&state)
        .unwrap();

    let mut spec = Spec::new(Identifier::from_str("numpy/1.0.0/3I42H3S6").unwrap());
    spec.deprecate();

    let compat = DeprecationValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(!compat.is_ok());
}

#[test]
fn test_deprecated_build_is_allowed_when_requested_exactly() {
    let state = State::default_state();
    let state = Change::RequestPackage(PkgRequest::from_str("numpy/1.0.0/3I42H3S6").unwrap())
        .apply(&state)
        .unwrap();

    let mut spec = Spec::new(Identifier::from_str("numpy/1.0.0/3I42H3S6").unwrap());
    spec.deprecate();

    let compat = DeprecationValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(compat.is_ok());
}
