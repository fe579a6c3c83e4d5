// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;
use std::sync::Arc;

use spk_ident::{Identifier, PkgRequest};
use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use crate::{Change, Decision};

use super::*;

#[test]
fn test_new_graph_has_empty_root() {
    let graph = Graph::new();
    assert_eq!(graph.node_count(), 1);
    assert!(graph.root().state.is_complete());
}

#[test]
fn test_add_branch_grows_the_arena() {
    let mut graph = Graph::new();
    let root = graph.root();

    let decision = Arc::new(Decision::new(vec![Change::RequestPackage(
        PkgRequest::from_str("python").unwrap(),
    )]));
    let node = graph.add_branch(root.id, decision).unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(node.state.get_unresolved_requests().len(), 1);
}

#[test]
fn test_walk_visits_every_edge() {
    let mut graph = Graph::new();
    let root = graph.root();

    let request_decision = Arc::new(Decision::new(vec![Change::RequestPackage(
        PkgRequest::from_str("python").unwrap(),
    )]));
    let requested = graph.add_branch(root.id, request_decision).unwrap();

    let spec = Spec::new(Identifier::from_str("python/3.9.1").unwrap());
    let resolve_decision = Arc::new(Decision::new(vec![Change::ResolvePackage(
        Box::new(spec),
        PackageSource::Embedded,
    )]));
    graph.add_branch(requested.id, resolve_decision).unwrap();

    let edges: Vec<_> = graph.walk().collect();
    assert_eq!(edges.len(), 2);
}
