// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use spk_ident::PkgRequest;

use super::*;

#[test]
fn test_default_is_empty() {
    let spec = InstallSpec::default();
    assert!(spec.is_default());
}

#[test]
fn test_upsert_requirement_replaces_by_name() {
    let mut spec = InstallSpec::default();
    spec.upsert_requirement(Request::Pkg(PkgRequest::from_str("python/>=3.0").unwrap()));
    spec.upsert_requirement(Request::Pkg(PkgRequest::from_str("python/>=3.7").unwrap()));
    assert_eq!(spec.requirements.len(), 1);
    assert_eq!(spec.requirements.get("python").unwrap().to_string(), "python/>=3.7");
}
