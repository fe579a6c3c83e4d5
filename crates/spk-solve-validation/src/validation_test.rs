// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use spk_ident::{Identifier, PkgRequest};
use spk_solve_graph::{Change, State};
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use super::*;

#[test]
fn test_validate_all_passes_a_well_formed_candidate() {
    let state = State::default_state();
    let state = Change::RequestPackage(PkgRequest::from_str("numpy/1.0.0").unwrap())
        .apply(&state)
        .unwrap();

    let spec = Spec::new(Identifier::from_str("numpy/1.0.0").unwrap());
    let compat = validate_all(default_validators(), &state, &spec, &PackageSource::Embedded);
    assert!(compat.is_ok());
}

#[test]
fn test_validate_all_stops_at_first_incompatibility() {
    let state = State::default_state();
    let state = Change::RequestPackage(PkgRequest::from_str("numpy/1.0.0").unwrap())
        .apply(&state)
        .unwrap();

    // Out of the requested range: PkgRequestValidator should reject this
    // before any later validator runs.
    let spec = Spec::new(Identifier::from_str("numpy/2.0.0").unwrap());
    let compat = validate_all(default_validators(), &state, &spec, &PackageSource::Embedded);
    assert!(!compat.is_ok());
}
