use proptest::prelude::*;
use std::collections::BTreeMap;

use ethica_explorer::book::{EntryId, EntrySource, Lang};
use ethica_explorer::graph::DependencyGraph;
use ethica_explorer::query::{AncestryQuery, ConnectionQuery, DescendancyQuery, Query};

// Generate an arbitrary DAG by only ever citing entries with a smaller
// canonical position. Construction must accept every graph produced here.
fn arb_graph() -> impl Strategy<Value = DependencyGraph> {
    prop::collection::vec(prop::collection::vec(any::<prop::sample::Index>(), 0..4), 1..32)
        .prop_map(|raw| {
            let sources: Vec<EntrySource> = raw
                .iter()
                .enumerate()
                .map(|(i, picks)| {
                    let parents: Vec<String> = if i == 0 {
                        Vec::new()
                    } else {
                        picks.iter().map(|idx| format!("n{}", idx.index(i))).collect()
                    };
                    let mut text = BTreeMap::new();
                    text.insert(Lang::En, format!("entry {i}"));
                    EntrySource { id: format!("n{i}"), parents, text }
                })
                .collect();
            DependencyGraph::from_sources(&sources).expect("generated graphs are acyclic")
        })
}

fn arb_node(n: usize) -> impl Strategy<Value = EntryId> {
    (0..n).prop_map(|i| EntryId::new(&format!("n{i}")))
}

proptest! {
    #[test]
    fn ancestry_is_reflexive_and_closed(g in arb_graph()) {
        let count = g.index().count();
        for pos in 0..count {
            let id = g.index().id_at(pos).unwrap().clone();
            let res = AncestryQuery::new(id.clone()).run(&g).unwrap();
            prop_assert!(res.nodes.contains(&id));
            for e in &res.edges {
                prop_assert!(res.nodes.contains(&e.from));
                prop_assert!(res.nodes.contains(&e.to));
            }
        }
    }

    #[test]
    fn descendancy_mirrors_ancestry(g in arb_graph()) {
        for e in g.edges() {
            let anc = AncestryQuery::new(e.to.clone()).run(&g).unwrap();
            prop_assert!(anc.nodes.contains(&e.from));
            let desc = DescendancyQuery::new(e.from.clone()).run(&g).unwrap();
            prop_assert!(desc.nodes.contains(&e.to));
        }
    }

    #[test]
    fn connection_node_sets_are_symmetric(
        (g, a, b) in arb_graph().prop_flat_map(|g| {
            let n = g.index().count();
            (Just(g), arb_node(n), arb_node(n))
        })
    ) {
        let ab = ConnectionQuery::new(a.clone(), b.clone()).run(&g).unwrap();
        let ba = ConnectionQuery::new(b.clone(), a.clone()).run(&g).unwrap();
        prop_assert_eq!(&ab.nodes, &ba.nodes);
        prop_assert_eq!(&ab.edges, &ba.edges);
    }

    #[test]
    fn connection_is_deterministic_and_well_formed(
        (g, a, b) in arb_graph().prop_flat_map(|g| {
            let n = g.index().count();
            (Just(g), arb_node(n), arb_node(n))
        })
    ) {
        let first = ConnectionQuery::new(a.clone(), b.clone()).run(&g).unwrap();
        let second = ConnectionQuery::new(a.clone(), b.clone()).run(&g).unwrap();
        prop_assert_eq!(&first, &second);

        // Endpoints are always reported, even with no connecting path.
        prop_assert!(first.nodes.contains(&a));
        prop_assert!(first.nodes.contains(&b));
        for e in &first.edges {
            prop_assert!(first.nodes.contains(&e.from));
            prop_assert!(first.nodes.contains(&e.to));
        }
    }
}
