// Copyright (c) Contributors to the spk-solver-core project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use crate::{Decision, Result, State};

#[cfg(test)]
#[path = "./graph_test.rs"]
mod graph_test;

/// A state reached during the solve, addressed by its position in the
/// [`Graph`]'s arena.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: u64,
    pub state: Arc<State>,
}

/// The full history of a solve: every state reached, and the decision that
/// led from each state to the next.
///
/// States are stored in an arena indexed by handle rather than as a graph
/// of pointers: a solve only ever grows this arena, and an integer handle
/// is trivial to carry around, compare, and serialize for diagnostics
/// without borrowing the graph itself.
pub struct Graph {
    states: Vec<Arc<State>>,
    edges: Vec<Vec<(Arc<Decision>, u64)>>,
    root: u64,
}

impl Graph {
    pub fn new() -> Self {
        let root_state = State::default_state();
        Self {
            states: vec![root_state],
            edges: vec![Vec::new()],
            root: 0,
        }
    }

    pub fn root(&self) -> Node {
        self.get(self.root).expect("root is always present")
    }

    pub fn get(&self, id: u64) -> Option<Node> {
        self.states.get(id as usize).map(|state| Node {
            id,
            state: Arc::clone(state),
        })
    }

    /// Apply `decision` to the state at `from`, recording the result as a
    /// new node and the edge that produced it. Returns the new node.
    pub fn add_branch(&mut self, from: u64, decision: Arc<Decision>) -> Result<Node> {
        let parent = self
            .states
            .get(from as usize)
            .ok_or_else(|| crate::Error::String(format!("no such node: {from}")))?;
        let next_state = decision.apply(parent)?;

        let id = self.states.len() as u64;
        self.states.push(Arc::clone(&next_state));
        self.edges.push(Vec::new());
        self.edges[from as usize].push((decision, id));

        Ok(Node {
            id,
            state: next_state,
        })
    }

    /// Outgoing edges recorded for a node, in the order they were added.
    pub fn outputs(&self, id: u64) -> &[(Arc<Decision>, u64)] {
        self.edges
            .get(id as usize)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.states.len()
    }

    /// Walk every node reachable from the root, depth-first, yielding each
    /// edge exactly once. Used to render `SolverFailed` diagnostics; an
    /// in-progress solve never needs this, since it only ever follows the
    /// single active frontier.
    pub fn walk(&self) -> GraphIter<'_> {
        GraphIter {
            graph: self,
            pending: vec![(self.root, 0)],
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

/// Every `Node` in this arena has exactly one incoming edge (a fresh id is
/// minted for each branch), so the graph is a tree and this walk never
/// needs cycle detection: a node can only be reached while expanding its
/// single parent.
pub struct GraphIter<'graph> {
    graph: &'graph Graph,
    pending: Vec<(u64, usize)>,
}

impl<'graph> Iterator for GraphIter<'graph> {
    type Item = (Node, Arc<Decision>, Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, idx) = *self.pending.last()?;
            let outputs = self.graph.outputs(id);
            if idx >= outputs.len() {
                self.pending.pop();
                continue;
            }
            self.pending.last_mut().expect("checked above").1 += 1;

            let (decision, next_id) = outputs[idx].clone();
            self.pending.push((next_id, 0));
            return Some((
                self.graph.get(id).expect("node on stack exists"),
                decision,
                self.graph.get(next_id).expect("edge target exists"),
            ));
        }
    }
}
