// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use spk_ident::{Identifier, VarRequest};
use spk_solve_graph::{Change, State};
use spk_solve_solution::PackageSource;
use spk_spec::{Opt, Spec, VarOpt};

use super::*;

fn spec_with_debug_option(value: &str) -> Spec {
    let mut spec = Spec::new(Identifier::from_str("my-package/1.0.0").unwrap());
    let mut opt = VarOpt::new("debug".parse().unwrap());
    opt.set_value(value.to_string()).unwrap();
    spec.build.options.push(Opt::Var(opt));
    spec
}

#[test]
fn test_qualified_var_supersedes_unqualified() {
    let state = State::default_state();
    let state = Change::RequestVar(VarRequest::new("debug".parse().unwrap(), "off"))
        .apply(&state)
        .unwrap();
    let state = Change::RequestVar(VarRequest::new(
        "my-package.debug".parse().unwrap(),
        "on",
    ))
    .apply(&state)
    .unwrap();

    let spec = spec_with_debug_option("on");
    let compat = OptionsValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(
        compat.is_ok(),
        "qualified var requests should supersede unqualified ones, got: {compat}"
    );

    let spec = spec_with_debug_option("off");
    let compat = OptionsValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(
        !compat.is_ok(),
        "qualified var requests should supersede unqualified ones, got: {compat}"
    );
}

#[test]
fn test_empty_value_does_not_constrain() {
    let state = State::default_state();
    let state = Change::RequestVar(VarRequest::new("debug".parse().unwrap(), ""))
        .apply(&state)
        .unwrap();

    let spec = spec_with_debug_option("on");
    let compat = OptionsValidator.validate(&state, &spec, &PackageSource::Embedded);
    assert!(compat.is_ok());
}
