// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use spk_foundation::name::OptNameBuf;
use spk_foundation::option_map::OptionMap;
use spk_ident::{PkgRequest, VarRequest};
use spk_solve_solution::Solution;

#[cfg(test)]
#[path = "./state_test.rs"]
mod state_test;

/// An immutable point in the solver's search: the requests still to be
/// satisfied, the variable bindings collected so far, and everything
/// resolved up to this point.
///
/// States are never mutated in place; every [`crate::Change`] produces a
/// new `State` built from its parent, so a `Graph` can hold many states
/// that share a common history without aliasing.
#[derive(Clone, Debug)]
pub struct State {
    unresolved: Vec<PkgRequest>,
    var_requests: BTreeMap<OptNameBuf, VarRequest>,
    solution: Solution,
    id: u64,
}

impl State {
    pub fn new(
        unresolved: Vec<PkgRequest>,
        var_requests: BTreeMap<OptNameBuf, VarRequest>,
        solution: Solution,
    ) -> Arc<Self> {
        let id = fingerprint(&unresolved, &var_requests, &solution);
        Arc::new(Self {
            unresolved,
            var_requests,
            solution,
            id,
        })
    }

    /// The empty starting state: no requests, no options, nothing resolved.
    pub fn default_state() -> Arc<Self> {
        Self::new(Vec::new(), BTreeMap::new(), Solution::new(OptionMap::default()))
    }

    /// A short, stable fingerprint over this state's requests, resolved
    /// packages, options and variable bindings. Two states built from the
    /// same inputs in the same order always share an id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True once every package request has been satisfied.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// The next package request to resolve, in insertion order. Selection
    /// is deliberately not heuristic, so decisions stay explainable.
    pub fn get_next_request(&self) -> Option<&PkgRequest> {
        self.unresolved.first()
    }

    pub fn get_unresolved_requests(&self) -> &[PkgRequest] {
        &self.unresolved
    }

    pub fn get_var_requests(&self) -> impl Iterator<Item = &VarRequest> {
        self.var_requests.values()
    }

    pub fn get_var_request(&self, name: &OptNameBuf) -> Option<&VarRequest> {
        self.var_requests.get(name)
    }

    pub fn get_options(&self) -> &OptionMap {
        self.solution.options()
    }

    pub fn get_solution(&self) -> &Solution {
        &self.solution
    }

    /// The solution this state would produce if the solve ended here.
    pub fn as_solution(&self) -> Solution {
        self.solution.clone()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (Vec<PkgRequest>, BTreeMap<OptNameBuf, VarRequest>, Solution) {
        (self.unresolved, self.var_requests, self.solution)
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for State {}

fn fingerprint(
    unresolved: &[PkgRequest],
    var_requests: &BTreeMap<OptNameBuf, VarRequest>,
    solution: &Solution,
) -> u64 {
    let mut hasher = DefaultHasher::new();

    // The unresolved requests contribute as a multiset: selection order
    // matters for which request is tried next, but two states with the
    // same pending requests in a different order represent the same
    // point in the search.
    let mut multiset_hash: u64 = 0;
    for request in unresolved {
        let mut item_hasher = DefaultHasher::new();
        request.hash(&mut item_hasher);
        multiset_hash ^= item_hasher.finish();
    }
    multiset_hash.hash(&mut hasher);

    // Resolved packages contribute in resolution order: two states that
    // resolved the same packages in a different order are different
    // points in the search (and may format differently when explained).
    for item in solution.items() {
        item.spec.hash(&mut hasher);
    }

    solution.options().hash(&mut hasher);

    for (name, request) in var_requests {
        name.hash(&mut hasher);
        request.hash(&mut hasher);
    }

    hasher.finish()
}
