// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::sync::Arc;

use async_stream::stream;
use futures::Stream;
use spk_foundation::name::PkgNameBuf;
use spk_foundation::option_map::OptionMap;
use spk_ident::{Build, Identifier, Request};
use spk_repo::Repository;
use spk_solve_graph::{Change, Decision, Graph, Node, Note, SkipPackageNote, State};
use spk_solve_solution::{PackageSource, Solution};
use spk_solve_validation::{default_validators, validate_all, Validators};
use spk_spec::{Opt, Spec};

use crate::candidates::{enumerate_candidates, Candidate};
use crate::error::OutOfOptions;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./solver_test.rs"]
mod solver_test;

/// Resolves a set of package and variable requests into a [`Solution`].
///
/// Selection is depth-first and deterministic: the next
/// unresolved request is always the one that has been pending longest, its
/// candidates are tried in strict repository-registration and
/// version-descending order, and the first one every [`Validators`]
/// accepts is applied. A registered [`Repository`] is only ever read
/// through, never mutated.
pub struct Solver {
    repos: Vec<(String, Arc<dyn Repository>)>,
    initial_state_builders: Vec<Change>,
    validators: Vec<Validators>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            initial_state_builders: Vec::new(),
            validators: default_validators().to_vec(),
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package or variable request that must be satisfied by the
    /// final solution.
    pub fn add_request(&mut self, request: impl Into<Request>) {
        let change = match request.into() {
            Request::Pkg(request) => Change::RequestPackage(request),
            Request::Var(request) => Change::RequestVar(request),
        };
        self.initial_state_builders.push(change);
    }

    /// Register a repository the solver may draw candidates from, under
    /// the given name (used to populate `PackageSource::Repository`).
    pub fn add_repository(&mut self, name: impl Into<String>, repo: Arc<dyn Repository>) {
        self.repos.push((name.into(), repo));
    }

    /// Seed the solve with fixed option values, as if set on the command
    /// line before any package is resolved.
    pub fn set_options(&mut self, options: OptionMap) {
        self.initial_state_builders
            .push(Change::SetOptions(options));
    }

    /// Begin a resumable solve, stepping through decisions one at a time.
    pub fn run(self) -> Result<SolverRuntime> {
        SolverRuntime::new(self, Vec::new())
    }

    /// Run the solve to completion and return the resulting [`Solution`].
    pub async fn solve(self) -> Result<Solution> {
        let mut runtime = self.run()?;
        runtime.solution().await
    }

    /// Resolve the build environment a source build of `spec` would need:
    /// a fresh, nested solve seeded with the outer state's current options
    /// plus the requirements implied by the candidate's own build options.
    ///
    /// `building` names every package whose source build is already being
    /// resolved somewhere up this recursion's call stack; a build
    /// environment that depends (by name) on the package it is building
    /// would recurse forever, so that is rejected here rather than left to
    /// overflow the call stack.
    ///
    /// Returns a boxed future: this call chains into `SolverRuntime::solution`,
    /// which chains into `step_state`, which may call back into this same
    /// function for a nested source build, and `async fn` cannot express a
    /// self-referential future type without this indirection.
    fn resolve_build_environment<'a>(
        &'a self,
        spec: &'a Spec,
        state: &'a Arc<State>,
        building: &'a [PkgNameBuf],
    ) -> Pin<Box<dyn Future<Output = Result<Solution>> + Send + 'a>> {
        Box::pin(async move {
            let mut child = Solver {
                repos: self.repos.clone(),
                initial_state_builders: Vec::new(),
                validators: self.validators.clone(),
            };
            child.set_options(state.get_options().clone());

            for opt in &spec.build.options {
                match opt {
                    Opt::Pkg(opt) => {
                        if building.contains(&opt.pkg) {
                            return Err(Error::String(format!(
                                "build environment for {} cannot depend on itself (via {})",
                                spec.pkg.name(),
                                opt.pkg
                            )));
                        }
                        let request = opt
                            .to_request(None)
                            .map_err(|err| Error::String(err.to_string()))?;
                        child.add_request(Request::Pkg(request));
                    }
                    Opt::Var(opt) => {
                        if let Some(value) = opt.get_value(None) {
                            child.add_request(Request::Var(opt.to_request(Some(&value))));
                        }
                    }
                }
            }

            let mut building = building.to_vec();
            building.push(spec.pkg.name().clone());
            let mut runtime = SolverRuntime::new(child, building)?;
            runtime.solution().await
        })
    }

    /// Try every candidate build of the next pending request, in order,
    /// skipping anything in `excluded` (already tried and backed out of
    /// from this exact state), and return the first [`Decision`] every
    /// validator accepts.
    async fn step_state(
        &self,
        state: &Arc<State>,
        building: &[PkgNameBuf],
        excluded: &[Identifier],
    ) -> Result<Option<Decision>> {
        let Some(request) = state.get_next_request() else {
            return Ok(None);
        };
        let request = request.clone();

        let candidates = enumerate_candidates(&self.repos, request.pkg.name(), state).await?;
        if candidates.is_empty() {
            return Err(Error::PackageNotFound(request));
        }

        let mut notes = Vec::new();

        for Candidate { spec, mut source } in candidates {
            if excluded.contains(&spec.pkg) {
                continue;
            }

            let build_from_source =
                spec.pkg.is_source() && request.pkg.build != Some(Build::Source);

            if build_from_source {
                if matches!(source, PackageSource::Embedded) {
                    continue;
                }
                if spec.is_deprecated() {
                    notes.push(Note::Other(format!(
                        "cannot build {} from source, version is deprecated",
                        spec.pkg
                    )));
                    continue;
                }
                if building.contains(spec.pkg.name()) {
                    notes.push(Note::Other(format!(
                        "cannot build {} from source, its build environment already depends on it",
                        spec.pkg
                    )));
                    continue;
                }

                let compat = validate_all(&self.validators, state, &spec, &source);
                if compat.is_err() {
                    tracing::debug!(ident = %spec.pkg, ?compat, "candidate rejected");
                    notes.push(Note::SkipPackage(SkipPackageNote::new(
                        spec.pkg.clone(),
                        compat,
                    )));
                    continue;
                }

                tracing::debug!(ident = %spec.pkg, "entering source-build recursion");
                let environment =
                    match self.resolve_build_environment(&spec, state, building).await {
                        Ok(environment) => environment,
                        Err(err) => {
                            tracing::debug!(ident = %spec.pkg, %err, "source-build recursion failed");
                            notes.push(Note::Other(format!(
                                "cannot resolve build environment for {}: {err}",
                                spec.pkg
                            )));
                            continue;
                        }
                    };
                tracing::debug!(ident = %spec.pkg, "source-build recursion finished");
                source = PackageSource::BuildFromSource {
                    recipe: Box::new(spec.clone()),
                    environment: Box::new(environment),
                };
            }

            let compat = validate_all(&self.validators, state, &spec, &source);
            if compat.is_err() {
                tracing::debug!(ident = %spec.pkg, ?compat, "candidate rejected");
                notes.push(Note::SkipPackage(SkipPackageNote::new(
                    spec.pkg.clone(),
                    compat,
                )));
                continue;
            }

            let mut decision = Decision::builder(state).resolve_package(&spec, source)?;
            decision.add_notes(notes);
            return Ok(Some(decision));
        }

        Err(Error::OutOfOptions(OutOfOptions { request, notes }))
    }
}

/// A resumable, single-threaded walk through a [`Solver`]'s search space.
///
/// Backtracking walks a plain LIFO stack of parent pointers rather than
/// reordering to the oldest fork first: every node remembers which builds
/// were already tried and rejected from it, so retrying never repeats a
/// dead end, and a literal depth-first walk is the simplest thing that
/// gets there.
#[must_use = "a SolverRuntime does nothing unless stepped or awaited to completion"]
pub struct SolverRuntime {
    solver: Solver,
    graph: Graph,
    parents: HashMap<u64, u64>,
    tried: HashMap<u64, Vec<Identifier>>,
    current: u64,
    building: Vec<PkgNameBuf>,
}

impl SolverRuntime {
    fn new(solver: Solver, building: Vec<PkgNameBuf>) -> Result<Self> {
        let mut graph = Graph::new();
        let root = graph.root();
        let initial = Decision::new(solver.initial_state_builders.clone());
        let node = graph.add_branch(root.id, Arc::new(initial))?;

        let mut parents = HashMap::new();
        parents.insert(node.id, root.id);

        Ok(Self {
            solver,
            graph,
            parents,
            tried: HashMap::new(),
            current: node.id,
            building,
        })
    }

    /// The full decision graph built by this runtime so far.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Advance the search by one decision, returning the node it produced
    /// and the decision that led to it. Returns `Ok(None)` once the
    /// current state satisfies every request; fails with
    /// [`spk_solve_graph::Error::FailedToResolve`] once backtracking
    /// unwinds past the root with no solution found.
    pub async fn step(&mut self) -> Result<Option<(Node, Arc<Decision>)>> {
        loop {
            let node = self
                .graph
                .get(self.current)
                .expect("current node always exists in this runtime's graph");
            if node.state.is_complete() {
                return Ok(None);
            }

            let excluded = self.tried.get(&self.current).cloned().unwrap_or_default();

            match self
                .solver
                .step_state(&node.state, &self.building, &excluded)
                .await
            {
                Ok(Some(decision)) => {
                    let tried_ident = resolved_identifier(&decision);
                    let decision = Arc::new(decision);
                    let next = self.graph.add_branch(self.current, Arc::clone(&decision))?;

                    if let Some(ident) = tried_ident {
                        self.tried.entry(self.current).or_default().push(ident);
                    }
                    self.parents.insert(next.id, self.current);
                    self.current = next.id;

                    return Ok(Some((next, decision)));
                }
                Ok(None) => return Ok(None),
                Err(Error::OutOfOptions(_)) => {
                    // The arena root (id 0) is `State::default_state()`, which
                    // has zero unresolved requests and so is trivially
                    // "complete". Backtracking onto it must not fall through
                    // to the is_complete() check above, or exhaustion would
                    // be misreported as an empty successful solve.
                    let root_id = self.graph.root().id;
                    match self.parents.get(&self.current).copied() {
                        Some(parent) if parent != root_id => {
                            tracing::debug!(node = self.current, back_to = parent, "step back");
                            self.current = parent;
                            continue;
                        }
                        _ => {
                            tracing::warn!("backtracking unwound past the root, search exhausted");
                            let graph = mem::take(&mut self.graph);
                            return Err(
                                spk_solve_graph::Error::FailedToResolve(Box::new(graph)).into()
                            );
                        }
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Step through the remainder of the search and return the resulting
    /// solution.
    pub async fn solution(&mut self) -> Result<Solution> {
        while self.step().await?.is_some() {}
        self.current_solution()
    }

    /// The solution implied by the current state, whether or not the
    /// search has finished.
    pub fn current_solution(&self) -> Result<Solution> {
        let node = self
            .graph
            .get(self.current)
            .expect("current node always exists in this runtime's graph");
        Ok(node.state.as_solution())
    }

    /// Step through the search, yielding every `(Node, Decision)` pair as
    /// it is produced.
    pub fn iter(&mut self) -> impl Stream<Item = Result<(Node, Arc<Decision>)>> + '_ {
        stream! {
            loop {
                match self.step().await {
                    Ok(Some(item)) => yield Ok(item),
                    Ok(None) => break,
                    Err(err) => {
                        yield Err(err);
                        break;
                    }
                }
            }
        }
    }
}

/// The identifier of the package a decision resolved, if it resolved one.
fn resolved_identifier(decision: &Decision) -> Option<Identifier> {
    decision.changes.iter().find_map(|change| match change {
        Change::ResolvePackage(spec, _) => Some(spec.pkg.clone()),
        _ => None,
    })
}
