// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use spk_foundation::name::OptNameBuf;
use spk_ident::{Identifier, PkgRequest, VarRequest};
use spk_solve_solution::{PackageSource, Solution};
use spk_spec::{Opt, Spec, VarOpt};

use super::*;

fn empty_state() -> Arc<State> {
    State::default_state()
}

#[test]
fn test_request_package_appends_new_name() {
    let state = empty_state();
    let change = Change::RequestPackage(PkgRequest::from_str("python").unwrap());
    let next = change.apply(&state).unwrap();
    assert_eq!(next.get_unresolved_requests().len(), 1);
}

#[test]
fn test_request_package_merges_same_name() {
    let state = empty_state();
    let state = Change::RequestPackage(PkgRequest::from_str("python/>=3.0").unwrap())
        .apply(&state)
        .unwrap();
    let state = Change::RequestPackage(PkgRequest::from_str("python/>=3.7").unwrap())
        .apply(&state)
        .unwrap();
    assert_eq!(state.get_unresolved_requests().len(), 1);
}

#[test]
fn test_request_package_conflict_is_rejected() {
    let state = empty_state();
    let state = Change::RequestPackage(PkgRequest::from_str("python/=2.7.0").unwrap())
        .apply(&state)
        .unwrap();
    let result = Change::RequestPackage(PkgRequest::from_str("python/=3.9.0").unwrap()).apply(&state);
    assert!(result.is_err());
}

#[test]
fn test_request_var_conflict_is_rejected() {
    let state = empty_state();
    let state = Change::RequestVar(VarRequest::from_str("debug=on").unwrap())
        .apply(&state)
        .unwrap();
    let result = Change::RequestVar(VarRequest::from_str("debug=off").unwrap()).apply(&state);
    assert!(result.is_err());
}

#[test]
fn test_request_var_same_value_is_idempotent() {
    let state = empty_state();
    let state = Change::RequestVar(VarRequest::from_str("debug=on").unwrap())
        .apply(&state)
        .unwrap();
    let state = Change::RequestVar(VarRequest::from_str("debug=on").unwrap())
        .apply(&state)
        .unwrap();
    assert_eq!(state.get_var_requests().count(), 1);
}

#[test]
fn test_set_options_conflict_is_rejected() {
    let state = empty_state();
    let mut opts_a = OptionMap::default();
    opts_a.insert("debug".parse().unwrap(), "on".to_string());
    let state = Change::SetOptions(opts_a).apply(&state).unwrap();

    let mut opts_b = OptionMap::default();
    opts_b.insert("debug".parse().unwrap(), "off".to_string());
    let result = Change::SetOptions(opts_b).apply(&state);
    assert!(result.is_err());
}

#[test]
fn test_resolve_package_removes_matching_unresolved_request() {
    let state = empty_state();
    let state = Change::RequestPackage(PkgRequest::from_str("python").unwrap())
        .apply(&state)
        .unwrap();

    let spec = Spec::new(Identifier::from_str("python/3.9.1").unwrap());
    let state = Change::ResolvePackage(Box::new(spec), PackageSource::Embedded)
        .apply(&state)
        .unwrap();

    assert!(state.get_unresolved_requests().is_empty());
    assert_eq!(state.as_solution().len(), 1);
}

#[test]
fn test_resolve_package_rejects_duplicate_name() {
    let state = empty_state();
    let spec = Spec::new(Identifier::from_str("python/3.9.1").unwrap());
    let state = Change::ResolvePackage(Box::new(spec.clone()), PackageSource::Embedded)
        .apply(&state)
        .unwrap();

    let result = Change::ResolvePackage(Box::new(spec), PackageSource::Embedded).apply(&state);
    assert!(result.is_err());
}

#[test]
fn test_seed_options_change_uses_option_default() {
    let state = empty_state();
    let mut spec = Spec::new(Identifier::from_str("mypkg/1.0.0").unwrap());
    let mut debug = VarOpt::new(OptNameBuf::from_str("debug").unwrap());
    debug.default = "off".to_string();
    spec.build.options.push(Opt::Var(debug));

    let change = seed_options_change(&spec, &state)
        .unwrap()
        .expect("a var build option with a default should produce a SetOptions change");
    let Change::SetOptions(opts) = change else {
        panic!("expected a SetOptions change");
    };
    let namespaced = OptNameBuf::from_str("mypkg.debug").unwrap();
    assert_eq!(opts.get(&namespaced).map(String::as_str), Some("off"));
}

#[test]
fn test_seed_options_change_prefers_already_bound_value() {
    let state = empty_state();
    let namespaced = OptNameBuf::from_str("mypkg.debug").unwrap();
    let mut preset = OptionMap::default();
    preset.insert(namespaced.clone(), "on".to_string());
    let state = Change::SetOptions(preset).apply(&state).unwrap();

    let mut spec = Spec::new(Identifier::from_str("mypkg/1.0.0").unwrap());
    let mut debug = VarOpt::new(OptNameBuf::from_str("debug").unwrap());
    debug.default = "off".to_string();
    spec.build.options.push(Opt::Var(debug));

    let change = seed_options_change(&spec, &state).unwrap().unwrap();
    let Change::SetOptions(opts) = change else {
        panic!("expected a SetOptions change");
    };
    assert_eq!(opts.get(&namespaced).map(String::as_str), Some("on"));
}

#[test]
fn test_inherited_changes_strong_for_build_only_honors_already_bound_value() {
    let state = empty_state();
    let namespaced = OptNameBuf::from_str("mypkg.debug").unwrap();
    let mut preset = OptionMap::default();
    preset.insert(namespaced.clone(), "on".to_string());
    let state = Change::SetOptions(preset).apply(&state).unwrap();

    let mut spec = Spec::new(Identifier::from_str("mypkg/1.0.0").unwrap());
    let mut debug = VarOpt::new(OptNameBuf::from_str("debug").unwrap());
    debug.default = "off".to_string();
    debug.inheritance = spk_spec::Inheritance::StrongForBuildOnly;
    spec.build.options.push(Opt::Var(debug));

    let changes = inherited_changes(&spec, &state).unwrap();
    let request_var = changes
        .iter()
        .find_map(|c| match c {
            Change::RequestVar(r) if r.name == namespaced => Some(r),
            _ => None,
        })
        .expect("a non-weak var build option should produce a namespaced RequestVar");
    assert_eq!(request_var.value.as_deref(), Some("on"));
}

#[test]
fn test_step_back_does_not_modify_state() {
    let state = empty_state();
    let state = Change::RequestPackage(PkgRequest::from_str("python").unwrap())
        .apply(&state)
        .unwrap();
    let after = Change::StepBack("no candidates".to_string())
        .apply(&state)
        .unwrap();
    assert_eq!(state.id(), after.id());
}
