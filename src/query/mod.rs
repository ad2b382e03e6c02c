//! Graph queries: ancestry, descendancy, and connection.
//!
//! Every query is a pure function of `(graph, arguments)`: no session state,
//! no randomness, no reliance on hash-map iteration order. Results are
//! normalized to position-sorted node and edge sequences, so re-running an
//! identical query on an unchanged graph yields byte-identical serialized
//! output.
use rayon::prelude::*;
use serde::Serialize;
use std::collections::VecDeque;

use crate::book::EntryId;
use crate::errors::GraphError;
use crate::graph::{DependencyEdge, DependencyGraph};

/// Query trait implemented by all query types.
///
/// Given an immutable reference to a `DependencyGraph`, returns a result of
/// type `R` or a recoverable `GraphError` for unknown entry arguments.
pub trait Query<R> {
    fn run(&self, graph: &DependencyGraph) -> Result<R, GraphError>;
}

/// Normalized query output consumed by rendering.
///
/// `nodes` is sorted by canonical position; `edges` contains exactly the
/// graph edges whose endpoints are both in `nodes`, sorted by (parent
/// position, child position).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryResult {
    pub nodes: Vec<EntryId>,
    pub edges: Vec<DependencyEdge>,
}

#[derive(Clone, Copy)]
enum Direction {
    Parents,
    Children,
}

// Breadth-first reachability from `start`, returning position-indexed
// membership. The membership vector doubles as the visited set, so the
// traversal terminates even on a graph that slipped past cycle validation.
fn reach(graph: &DependencyGraph, start: usize, dir: Direction) -> Vec<bool> {
    let mut member = vec![false; graph.parents.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    member[start] = true;
    queue.push_back(start);
    while let Some(u) = queue.pop_front() {
        let next = match dir {
            Direction::Parents => &graph.parents[u],
            Direction::Children => &graph.children[u],
        };
        for &v in next {
            if !member[v] {
                member[v] = true;
                queue.push_back(v);
            }
        }
    }
    member
}

// Restrict the graph to the member set: nodes in position order, edges with
// both endpoints inside, sorted by (parent, child) position.
fn restrict(graph: &DependencyGraph, member: &[bool]) -> QueryResult {
    let nodes: Vec<EntryId> = member
        .iter()
        .enumerate()
        .filter(|(_, &m)| m)
        .map(|(pos, _)| graph.id_at(pos).clone())
        .collect();

    let mut edge_positions: Vec<(usize, usize)> = Vec::new();
    for (child, parents) in graph.parents.iter().enumerate() {
        if !member[child] {
            continue;
        }
        for &p in parents {
            if member[p] {
                edge_positions.push((p, child));
            }
        }
    }
    edge_positions.sort_unstable();
    let edges = edge_positions
        .into_iter()
        .map(|(p, c)| DependencyEdge { from: graph.id_at(p).clone(), to: graph.id_at(c).clone() })
        .collect();

    QueryResult { nodes, edges }
}

/// The complete chain of proofs for a single entry: the entry plus everything
/// it transitively depends on.
pub struct AncestryQuery {
    pub node: EntryId,
}

impl AncestryQuery {
    #[must_use]
    pub fn new(node: EntryId) -> Self {
        Self { node }
    }
}

impl Query<QueryResult> for AncestryQuery {
    fn run(&self, graph: &DependencyGraph) -> Result<QueryResult, GraphError> {
        let start = graph.index().position_of(&self.node)?;
        let member = reach(graph, start, Direction::Parents);
        Ok(restrict(graph, &member))
    }
}

/// The complete chain of consequences for a single entry: the entry plus
/// everything that transitively depends on it.
pub struct DescendancyQuery {
    pub node: EntryId,
}

impl DescendancyQuery {
    #[must_use]
    pub fn new(node: EntryId) -> Self {
        Self { node }
    }
}

impl Query<QueryResult> for DescendancyQuery {
    fn run(&self, graph: &DependencyGraph) -> Result<QueryResult, GraphError> {
        let start = graph.index().position_of(&self.node)?;
        let member = reach(graph, start, Direction::Children);
        Ok(restrict(graph, &member))
    }
}

/// The chain of arguments that connects two entries, direction-agnostic: a
/// node is included iff it lies on at least one directed path between the
/// endpoints, in either direction.
///
/// When no path exists in either direction the result is the two endpoints
/// with no edges: a "no connection" answer, not an error.
pub struct ConnectionQuery {
    pub from: EntryId,
    pub to: EntryId,
}

impl ConnectionQuery {
    #[must_use]
    pub fn new(from: EntryId, to: EntryId) -> Self {
        Self { from, to }
    }
}

impl Query<QueryResult> for ConnectionQuery {
    fn run(&self, graph: &DependencyGraph) -> Result<QueryResult, GraphError> {
        let from = graph.index().position_of(&self.from)?;
        let to = graph.index().position_of(&self.to)?;

        let anc_from = reach(graph, from, Direction::Parents);
        let desc_from = reach(graph, from, Direction::Children);
        let anc_to = reach(graph, to, Direction::Parents);
        let desc_to = reach(graph, to, Direction::Children);

        // Reachability is reflexive, so whenever a directed path exists the
        // intersection already contains both endpoints.
        let n = graph.parents.len();
        let mut member = vec![false; n];
        let mut connected = false;
        for i in 0..n {
            let on_forward = desc_from[i] && anc_to[i];
            let on_backward = desc_to[i] && anc_from[i];
            if on_forward || on_backward {
                member[i] = true;
                connected = true;
            }
        }

        if !connected {
            // Unrelated endpoints: report both so the caller can render
            // "no path found".
            member[from] = true;
            member[to] = true;
            let nodes = restrict(graph, &member).nodes;
            return Ok(QueryResult { nodes, edges: Vec::new() });
        }
        Ok(restrict(graph, &member))
    }
}

/// One query to evaluate in a batch.
#[derive(Debug, Clone)]
pub enum QueryRequest {
    Ancestry(EntryId),
    Descendancy(EntryId),
    Connection(EntryId, EntryId),
}

impl QueryRequest {
    /// Evaluate this request against the graph.
    ///
    /// # Errors
    /// Returns `GraphError::NotFound` for unknown entry arguments.
    pub fn run(&self, graph: &DependencyGraph) -> Result<QueryResult, GraphError> {
        match self {
            QueryRequest::Ancestry(node) => AncestryQuery::new(node.clone()).run(graph),
            QueryRequest::Descendancy(node) => DescendancyQuery::new(node.clone()).run(graph),
            QueryRequest::Connection(from, to) => {
                ConnectionQuery::new(from.clone(), to.clone()).run(graph)
            }
        }
    }
}

/// Evaluate several independent queries concurrently (e.g. a UI prefetching
/// the views for one entry). Safe without locking: the graph is read-only
/// and every traversal allocates its own visited set.
#[must_use]
pub fn run_batch(
    graph: &DependencyGraph,
    requests: &[QueryRequest],
) -> Vec<Result<QueryResult, GraphError>> {
    requests.par_iter().map(|req| req.run(graph)).collect()
}
