// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn test_default_build_spec() {
    let spec = BuildSpec::default();
    assert_eq!(spec.script, vec!["sh ./build.sh".to_string()]);
    assert_eq!(spec.variants, vec![OptionMap::default()]);
    assert!(spec.is_default());
}

#[test]
fn test_deserialize_script_as_string() {
    let spec: BuildSpec = serde_json::from_value(serde_json::json!({
        "script": "make\nmake install",
    }))
    .unwrap();
    assert_eq!(
        spec.script,
        vec!["make".to_string(), "make install".to_string()]
    );
}

#[test]
fn test_deserialize_script_as_list() {
    let spec: BuildSpec = serde_json::from_value(serde_json::json!({
        "script": ["make", "make install"],
    }))
    .unwrap();
    assert_eq!(
        spec.script,
        vec!["make".to_string(), "make install".to_string()]
    );
}

#[test]
fn test_duplicate_option_names_rejected() {
    let result: std::result::Result<BuildSpec, _> = serde_json::from_value(serde_json::json!({
        "options": [
            {"var": "debug"},
            {"var": "debug"},
        ],
    }));
    assert!(result.is_err());
}

#[test]
fn test_duplicate_variant_digests_rejected() {
    let result: std::result::Result<BuildSpec, _> = serde_json::from_value(serde_json::json!({
        "variants": [
            {"debug": "on"},
            {"debug": "on"},
        ],
    }));
    assert!(result.is_err());
}

#[test]
fn test_upsert_opt_replaces_existing() {
    let mut spec = BuildSpec::default();
    spec.upsert_opt(Opt::Var(VarOpt::new("debug".parse().unwrap())));
    let mut replacement = VarOpt::new("debug".parse().unwrap());
    replacement.default = "on".to_string();
    spec.upsert_opt(Opt::Var(replacement));
    assert_eq!(spec.options.len(), 1);
    let Opt::Var(opt) = &spec.options[0] else {
        panic!("expected a var option");
    };
    assert_eq!(opt.default, "on");
}
