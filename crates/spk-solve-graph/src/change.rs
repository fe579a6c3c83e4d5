// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use spk_foundation::option_map::OptionMap;
use spk_ident::{PkgRequest, RangeIdent, Request, VarRequest};
use spk_solve_solution::{PackageSource, Solution};
use spk_spec::Spec;

use crate::{Error, Result, State};

#[cfg(test)]
#[path = "./change_test.rs"]
mod change_test;

/// An atomic modification to a [`State`]. A [`crate::Decision`] is a
/// sequence of these, applied in order to produce the next state.
#[derive(Clone, Debug)]
pub enum Change {
    RequestPackage(PkgRequest),
    RequestVar(VarRequest),
    SetOptions(OptionMap),
    /// Adds a package to the solution. The package must already have been
    /// checked compatible with the state it is applied to.
    ResolvePackage(Box<Spec>, PackageSource),
    /// A sentinel recorded for diagnostics; it does not modify state.
    StepBack(String),
}

impl Change {
    pub fn apply(&self, parent: &Arc<State>) -> Result<Arc<State>> {
        match self {
            Change::RequestPackage(request) => apply_request_package(parent, request),
            Change::RequestVar(request) => apply_request_var(parent, request),
            Change::SetOptions(options) => apply_set_options(parent, options),
            Change::ResolvePackage(spec, source) => {
                apply_resolve_package(parent, spec, source.clone())
            }
            Change::StepBack(_) => Ok(Arc::clone(parent)),
        }
    }
}

fn apply_request_package(parent: &Arc<State>, incoming: &PkgRequest) -> Result<Arc<State>> {
    let (mut unresolved, var_requests, solution) = parent.as_ref().clone().into_parts();

    let mut merged = false;
    for existing in unresolved.iter_mut() {
        if existing.pkg.name() == incoming.pkg.name() {
            existing.restrict(incoming)?;
            merged = true;
            break;
        }
    }
    if !merged {
        unresolved.push(incoming.clone());
    }

    Ok(State::new(unresolved, var_requests, solution))
}

fn apply_request_var(parent: &Arc<State>, incoming: &VarRequest) -> Result<Arc<State>> {
    let (unresolved, mut var_requests, solution) = parent.as_ref().clone().into_parts();

    if let Some(existing) = var_requests.get(&incoming.name) {
        if let (Some(a), Some(b)) = (&existing.value, &incoming.value) {
            if a != b {
                return Err(Error::String(format!(
                    "conflicting values for {}: '{a}' != '{b}'",
                    incoming.name
                )));
            }
        }
    }
    var_requests.insert(incoming.name.clone(), incoming.clone());

    Ok(State::new(unresolved, var_requests, solution))
}

fn apply_set_options(parent: &Arc<State>, incoming: &OptionMap) -> Result<Arc<State>> {
    let (unresolved, var_requests, solution) = parent.as_ref().clone().into_parts();

    let mut options = solution.options().clone();
    for (name, value) in incoming.iter() {
        if let Some(existing) = options.get(name) {
            if existing != value {
                return Err(Error::String(format!(
                    "conflicting values for option {name}: '{existing}' != '{value}'"
                )));
            }
        }
        options.insert(name.clone(), value.clone());
    }

    let mut new_solution = Solution::new(options);
    for item in solution.items() {
        new_solution.add(item.request, item.spec, item.source);
    }

    Ok(State::new(unresolved, var_requests, new_solution))
}

fn apply_resolve_package(
    parent: &Arc<State>,
    spec: &Spec,
    source: PackageSource,
) -> Result<Arc<State>> {
    let (mut unresolved, var_requests, mut solution) = parent.as_ref().clone().into_parts();

    let name = spec.pkg.name();
    if solution.get(name.as_str()).is_some() {
        return Err(Error::DuplicatePackage {
            name: name.to_string(),
        });
    }

    let request = match unresolved.iter().position(|r| r.pkg.name() == name) {
        Some(index) => unresolved.remove(index),
        None => PkgRequest::new(RangeIdent::from(spec.pkg.clone())),
    };

    solution.add(request, spec.clone(), source);

    Ok(State::new(unresolved, var_requests, solution))
}

/// An option's value, following the documented priority order: a value
/// already bound in the state's `OptionMap` (whether from the user's
/// initial options or an earlier-resolved package) wins, then a matching
/// `VarRequest`, then the option's own default.
fn resolved_option_value(
    base: &State,
    namespaced: &spk_foundation::name::OptNameBuf,
    opt: &spk_spec::VarOpt,
) -> Option<String> {
    base.get_options()
        .get(namespaced)
        .cloned()
        .or_else(|| base.get_var_request(namespaced).and_then(|r| r.value.clone()))
        .or_else(|| opt.get_value(None))
}

/// The `Change::SetOptions` a resolved spec's own build options contribute
/// to the state. Returns `None` if the spec declares no var options or
/// every one resolves to an empty value.
pub fn seed_options_change(spec: &Spec, base: &State) -> Result<Option<Change>> {
    let mut opts = OptionMap::default();

    for opt in &spec.build.options {
        let spk_spec::Opt::Var(opt) = opt else {
            continue;
        };
        let namespaced = spk_foundation::name::OptNameBuf::namespaced(
            spec.pkg.name(),
            opt.var.base_name(),
        )
        .map_err(|err| Error::String(err.to_string()))?;

        if let Some(value) = resolved_option_value(base, &namespaced, opt) {
            if !value.is_empty() {
                opts.insert(namespaced, value);
            }
        }
    }

    if opts.is_empty() {
        return Ok(None);
    }
    Ok(Some(Change::SetOptions(opts)))
}

/// Expand the package and variable requests implied by resolving `spec`
/// with the given inheritance rules: every `install.requirement`
/// becomes a pending request, and every `Strong`/`StrongForBuildOnly`
/// build option propagates as a namespaced variable binding.
pub fn inherited_changes(spec: &Spec, base: &State) -> Result<Vec<Change>> {
    let mut changes = Vec::new();

    for request in spec.install.requirements.iter() {
        changes.push(match request {
            Request::Pkg(r) => Change::RequestPackage(r.clone()),
            Request::Var(r) => Change::RequestVar(r.clone()),
        });
    }

    for opt in &spec.build.options {
        let spk_spec::Opt::Var(opt) = opt else {
            continue;
        };
        if opt.inheritance == spk_spec::Inheritance::Weak {
            continue;
        }
        let namespaced = spk_foundation::name::OptNameBuf::namespaced(
            spec.pkg.name(),
            opt.var.base_name(),
        )
        .map_err(|err| Error::String(err.to_string()))?;
        let value = resolved_option_value(base, &namespaced, opt).unwrap_or_default();
        changes.push(Change::RequestVar(VarRequest::new(namespaced, value)));

        if matches!(opt.inheritance, spk_spec::Inheritance::Strong) {
            let exact = RangeIdent::from(spec.pkg.clone());
            let mut pinned = PkgRequest::new(exact);
            pinned.inclusion_policy = spk_ident::InclusionPolicy::IfAlreadyPresent;
            changes.push(Change::RequestPackage(pinned));
        }
    }

    for embedded in &spec.install.embedded {
        changes.push(Change::ResolvePackage(
            Box::new(embedded.clone()),
            PackageSource::Embedded,
        ));
    }

    Ok(changes)
}
