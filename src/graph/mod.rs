//! Dependency graph construction.
//!
//! The graph is derived once from the book sources: an edge `(p, c)` means
//! entry `p` is cited in the proof of entry `c`. Construction validates the
//! two content invariants that queries rely on (every cited parent exists,
//! and the edge set is acyclic) and fails loudly on violation rather than
//! producing a partially correct graph. After construction the graph is
//! read-only, so concurrent query evaluation needs no locking.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::book::{Book, EntryId, EntryIndex, EntrySource};
use crate::errors::{BookError, GraphError};

/// Directed edge: `from` is a logical prerequisite of `to`.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DependencyEdge {
    pub from: EntryId,
    pub to: EntryId,
}

#[derive(Clone, Copy, PartialEq)]
enum Color {
    White,
    Gray,
    Black,
}

/// The dependency relation over all entries of one book.
///
/// Adjacency is kept in both directions and position-indexed: `parents`
/// preserves the authored citation order (for "depends on:" display),
/// `children` is sorted by canonical position so iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    index: EntryIndex,
    pub(crate) parents: Vec<Vec<usize>>,
    pub(crate) children: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Build the graph from authored entry sources.
    ///
    /// Duplicate citations of the same parent are collapsed; the first
    /// occurrence keeps its place in the declared order.
    ///
    /// # Errors
    /// Returns `BookError::UnknownReference` if an entry cites an id that is
    /// not in the book and `BookError::CycleDetected` if the citation
    /// relation is not acyclic (plus the `EntryIndex` construction errors).
    pub fn from_sources(sources: &[EntrySource]) -> Result<Self, BookError> {
        let index = EntryIndex::from_sources(sources)?;
        let n = index.count();
        let mut parents: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (child_pos, src) in sources.iter().enumerate() {
            let mut seen: HashSet<usize> = HashSet::with_capacity(src.parents.len());
            for raw in &src.parents {
                let parent_id = EntryId::new(raw);
                let parent_pos = index.position_of(&parent_id).map_err(|_| {
                    BookError::UnknownReference {
                        entry: EntryId::new(&src.id),
                        parent: parent_id.clone(),
                    }
                })?;
                if seen.insert(parent_pos) {
                    parents[child_pos].push(parent_pos);
                    children[parent_pos].push(child_pos);
                }
            }
        }
        for kids in &mut children {
            kids.sort_unstable();
        }

        let graph = Self { index, parents, children };
        graph.check_acyclic()?;
        Ok(graph)
    }

    /// Build the graph from a loaded book document.
    ///
    /// # Errors
    /// Same conditions as [`DependencyGraph::from_sources`].
    pub fn from_book(book: &Book) -> Result<Self, BookError> {
        Self::from_sources(&book.entries)
    }

    #[must_use]
    pub fn index(&self) -> &EntryIndex {
        &self.index
    }

    /// Parents of an entry in authored citation order.
    ///
    /// # Errors
    /// Returns `GraphError::NotFound` for an unknown id.
    pub fn parents_of(&self, id: &EntryId) -> Result<Vec<EntryId>, GraphError> {
        let pos = self.index.position_of(id)?;
        Ok(self.ids_at(&self.parents[pos]))
    }

    /// Children of an entry, sorted by canonical position.
    ///
    /// # Errors
    /// Returns `GraphError::NotFound` for an unknown id.
    pub fn children_of(&self, id: &EntryId) -> Result<Vec<EntryId>, GraphError> {
        let pos = self.index.position_of(id)?;
        Ok(self.ids_at(&self.children[pos]))
    }

    /// All edges `(parent, child)`, ordered by child position then declared
    /// parent order.
    #[must_use]
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut out = Vec::new();
        for (child_pos, ps) in self.parents.iter().enumerate() {
            for &p in ps {
                out.push(DependencyEdge {
                    from: self.id_at(p).clone(),
                    to: self.id_at(child_pos).clone(),
                });
            }
        }
        out
    }

    // Positions held by the graph are always in range.
    pub(crate) fn id_at(&self, pos: usize) -> &EntryId {
        self.index.id_of_position(pos)
    }

    fn ids_at(&self, positions: &[usize]) -> Vec<EntryId> {
        positions.iter().map(|&p| self.id_at(p).clone()).collect()
    }

    // DFS coloring: a back-edge to a gray node is a cycle.
    fn check_acyclic(&self) -> Result<(), BookError> {
        let n = self.parents.len();
        let mut color = vec![Color::White; n];
        let mut path: Vec<usize> = Vec::new();
        for start in 0..n {
            if color[start] == Color::White {
                self.visit(start, &mut color, &mut path)?;
            }
        }
        Ok(())
    }

    fn visit(&self, u: usize, color: &mut [Color], path: &mut Vec<usize>) -> Result<(), BookError> {
        color[u] = Color::Gray;
        path.push(u);
        for &p in &self.parents[u] {
            match color[p] {
                Color::Gray => {
                    let from = path.iter().position(|&x| x == p).unwrap_or(0);
                    let mut cycle: Vec<EntryId> =
                        path[from..].iter().map(|&x| self.id_at(x).clone()).collect();
                    cycle.push(self.id_at(p).clone());
                    return Err(BookError::CycleDetected { path: cycle });
                }
                Color::White => self.visit(p, color, path)?,
                Color::Black => {}
            }
        }
        path.pop();
        color[u] = Color::Black;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Lang;
    use std::collections::BTreeMap;

    fn src(id: &str, parents: &[&str]) -> EntrySource {
        let mut text = BTreeMap::new();
        text.insert(Lang::En, format!("text of {id}"));
        EntrySource {
            id: id.to_string(),
            parents: parents.iter().map(|p| (*p).to_string()).collect(),
            text,
        }
    }

    #[test]
    fn parents_keep_declared_order_and_dedup() {
        let graph = DependencyGraph::from_sources(&[
            src("e1d1", &[]),
            src("e1a1", &[]),
            // Cites the axiom before the definition, and the axiom twice.
            src("e1p1", &["e1a1", "e1d1", "e1a1"]),
        ])
        .unwrap();

        let parents = graph.parents_of(&"e1p1".into()).unwrap();
        assert_eq!(parents, vec![EntryId::new("e1a1"), EntryId::new("e1d1")]);
    }

    #[test]
    fn children_mirror_parents() {
        let graph = DependencyGraph::from_sources(&[
            src("e1d1", &[]),
            src("e1p1", &["e1d1"]),
            src("e1p2", &["e1d1", "e1p1"]),
        ])
        .unwrap();

        let children = graph.children_of(&"e1d1".into()).unwrap();
        assert_eq!(children, vec![EntryId::new("e1p1"), EntryId::new("e1p2")]);
        for edge in graph.edges() {
            assert!(graph.parents_of(&edge.to).unwrap().contains(&edge.from));
            assert!(graph.children_of(&edge.from).unwrap().contains(&edge.to));
        }
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let err = DependencyGraph::from_sources(&[src("e1p1", &["e1d1"])]).unwrap_err();
        assert!(matches!(
            err,
            BookError::UnknownReference { entry, parent }
                if entry.as_str() == "e1p1" && parent.as_str() == "e1d1"
        ));
    }

    #[test]
    fn self_citation_is_a_cycle() {
        let err = DependencyGraph::from_sources(&[src("e1p1", &["e1p1"])]).unwrap_err();
        assert!(matches!(err, BookError::CycleDetected { .. }));
    }

    #[test]
    fn longer_cycle_is_detected_with_path() {
        let err = DependencyGraph::from_sources(&[
            src("a", &["c"]),
            src("b", &["a"]),
            src("c", &["b"]),
        ])
        .unwrap_err();
        match err {
            BookError::CycleDetected { path } => {
                assert!(path.len() >= 3);
                assert_eq!(path.first(), path.last());
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn unknown_id_queries_fail_with_not_found() {
        let graph = DependencyGraph::from_sources(&[src("e1d1", &[])]).unwrap();
        assert!(matches!(graph.parents_of(&"zz".into()), Err(GraphError::NotFound { .. })));
        assert!(matches!(graph.children_of(&"zz".into()), Err(GraphError::NotFound { .. })));
    }
}
