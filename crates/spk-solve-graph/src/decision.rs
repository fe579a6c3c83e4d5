// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use spk_solve_solution::PackageSource;
use spk_spec::Spec;

use crate::change::{inherited_changes, seed_options_change};
use crate::{Change, Note, Result, State};

#[cfg(test)]
#[path = "./decision_test.rs"]
mod decision_test;

/// A set of [`Change`]s applied together to a [`State`], plus any notes
/// explaining choices made while building it.
#[derive(Clone, Debug, Default)]
pub struct Decision {
    pub changes: Vec<Change>,
    pub notes: Vec<Note>,
}

impl Decision {
    pub fn new(changes: Vec<Change>) -> Self {
        Self {
            changes,
            notes: Vec::new(),
        }
    }

    pub fn builder(base: &Arc<State>) -> DecisionBuilder<'_> {
        DecisionBuilder::new(base)
    }

    /// Fold this decision's changes into `base`, producing the next state.
    /// Fails (without mutating `base`) if any change cannot be merged.
    pub fn apply(&self, base: &Arc<State>) -> Result<Arc<State>> {
        let mut state = Arc::clone(base);
        for change in &self.changes {
            state = change.apply(&state)?;
        }
        Ok(state)
    }

    pub fn add_notes(&mut self, notes: impl IntoIterator<Item = Note>) {
        self.notes.extend(notes);
    }
}

impl From<Change> for Decision {
    fn from(change: Change) -> Self {
        Decision::new(vec![change])
    }
}

/// Builds the full [`Decision`] implied by resolving a candidate spec: the
/// `ResolvePackage` change itself, plus everything its install
/// requirements and option inheritance add in turn.
pub struct DecisionBuilder<'state> {
    base: &'state Arc<State>,
}

impl<'state> DecisionBuilder<'state> {
    pub fn new(base: &'state Arc<State>) -> Self {
        Self { base }
    }

    pub fn resolve_package(&self, spec: &Spec, source: PackageSource) -> Result<Decision> {
        let mut changes = vec![Change::ResolvePackage(Box::new(spec.clone()), source)];
        if let Some(change) = seed_options_change(spec, self.base)? {
            changes.push(change);
        }
        changes.extend(inherited_changes(spec, self.base)?);
        Ok(Decision::new(changes))
    }

    pub fn step_back(&self, cause: impl Into<String>) -> Decision {
        Decision::new(vec![Change::StepBack(cause.into())])
    }
}
