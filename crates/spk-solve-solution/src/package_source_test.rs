// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use spk_foundation::option_map::OptionMap;
use spk_ident::Identifier;

use super::*;
use crate::Solution;

#[test]
fn test_is_build_from_source() {
    let source = PackageSource::BuildFromSource {
        recipe: Box::new(Spec::new(Identifier::from_str("mypkg/1.0.0").unwrap())),
        environment: Box::new(Solution::new(OptionMap::default())),
    };
    assert!(source.is_build_from_source());
    assert!(!source.is_embedded());
    assert!(source.recipe().is_some());
}

#[test]
fn test_is_embedded() {
    let source = PackageSource::Embedded;
    assert!(source.is_embedded());
    assert!(source.recipe().is_none());
}

#[test]
fn test_repository_source_has_no_recipe() {
    let source = PackageSource::Repository {
        repo_name: "origin".to_string(),
        components: BTreeMap::new(),
    };
    assert!(source.recipe().is_none());
    assert!(!source.is_build_from_source());
}
