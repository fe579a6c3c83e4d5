// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

mod change;
mod decision;
mod error;
mod graph;
mod note;
mod state;

pub use change::Change;
pub use decision::{Decision, DecisionBuilder};
pub use error::{Error, Result};
pub use graph::{Graph, GraphIter, Node};
pub use note::{Note, SkipPackageNote};
pub use state::State;
