//! ethica-explorer: dependency-graph explorer for a geometrically ordered text
//!
//! Load a book of numbered entries (each one cites the earlier entries it is
//! proved from), build the resulting directed acyclic graph once, and query
//! its structure.
//!
//! # Queries
//! - ancestry: the complete chain of proofs for an entry
//! - descendancy: the complete chain of consequences for an entry
//! - connection: the union of all directed paths between two entries, in
//!   either direction
//!
//! # Quickstart (Library)
//! ```no_run
//! use ethica_explorer::book::{Book, EntryId};
//! use ethica_explorer::graph::DependencyGraph;
//! use ethica_explorer::query::{AncestryQuery, Query};
//!
//! let book = Book::load_json(std::path::Path::new("ethica.json")).expect("load book");
//! let graph = DependencyGraph::from_book(&book).expect("build graph");
//! let result = AncestryQuery::new(EntryId::new("e1p8")).run(&graph).expect("query");
//! println!("nodes: {} edges: {}", result.nodes.len(), result.edges.len());
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! ethica-explorer toc --book ethica.json
//! ethica-explorer query connection e1d3 e1p15 --book ethica.json --format json
//! ```
//!
//! Construction fails loudly on broken content (unknown citations, cycles);
//! queries fail only on unknown entry ids. Results are deterministic and
//! position-sorted, so identical queries serialize identically.
pub mod app;
pub mod book;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod query;
pub mod utils;
