use grove_core::{CatalogEntry, Category, Importance, RelationKind};
use grove_graph::build_graph;
use proptest::prelude::*;

const KINDS: [RelationKind; 8] = [
    RelationKind::Imports,
    RelationKind::Depends,
    RelationKind::Extends,
    RelationKind::Implements,
    RelationKind::Uses,
    RelationKind::Configures,
    RelationKind::Documents,
    RelationKind::Tests,
];

/// Catalogs of up to a dozen entries. Targets past the last entry are
/// dangling, and repeated or self-pointing targets come up naturally.
fn arb_catalog() -> impl Strategy<Value = Vec<CatalogEntry>> {
    (1usize..12).prop_flat_map(|n| {
        prop::collection::vec(
            (
                prop::bool::weighted(0.15),
                prop::collection::vec((0..n + 3, 0..KINDS.len()), 0..6),
            ),
            n,
        )
        .prop_map(move |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (excluded, relationships))| {
                    let importance = if excluded {
                        Importance::Excluded
                    } else {
                        Importance::Important
                    };
                    let mut entry = CatalogEntry::new(
                        format!("n{i}"),
                        format!("packages/n{i}"),
                        Category::Package,
                        importance,
                    );
                    for (target, kind) in relationships {
                        let target = if target < n {
                            format!("n{target}")
                        } else {
                            format!("ghost{target}")
                        };
                        entry = entry.with_relationship(target, KINDS[kind]);
                    }
                    entry
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn dependencies_and_dependents_are_symmetric(entries in arb_catalog()) {
        let graph = build_graph(&entries).unwrap().graph;

        for node in graph.nodes() {
            let id = node.id.as_str();
            for dep in graph.dependency_ids(id) {
                prop_assert!(graph.dependent_ids(dep).contains(&id), "{} -> {}", id, dep);
            }
            for dependent in graph.dependent_ids(id) {
                prop_assert!(graph.dependency_ids(dependent).contains(&id), "{} <- {}", id, dependent);
            }
        }
    }

    #[test]
    fn every_referenced_id_exists(entries in arb_catalog()) {
        let graph = build_graph(&entries).unwrap().graph;

        prop_assert!(graph.integrity_violations().is_empty());
        for node in graph.nodes() {
            for id in graph
                .dependency_ids(&node.id)
                .into_iter()
                .chain(graph.dependent_ids(&node.id))
            {
                prop_assert!(graph.contains(id), "dangling reference {}", id);
                prop_assert!(!id.starts_with("ghost"));
            }
        }
    }

    #[test]
    fn retained_entries_all_become_nodes(entries in arb_catalog()) {
        let outcome = build_graph(&entries).unwrap();
        let retained: Vec<&str> = entries
            .iter()
            .filter(|e| e.importance.is_retained())
            .map(|e| e.id.as_str())
            .collect();

        let ids: Vec<&str> = outcome.graph.nodes().map(|n| n.id.as_str()).collect();
        prop_assert_eq!(ids, retained);
    }

    #[test]
    fn edges_are_declared_and_keep_the_first_kind(entries in arb_catalog()) {
        let graph = build_graph(&entries).unwrap().graph;

        for entry in entries.iter().filter(|e| graph.contains(&e.id)) {
            for dep in graph.dependency_ids(&entry.id) {
                let first = entry.relationships.iter().find(|r| r.target == dep);
                prop_assert!(first.is_some(), "{} -> {} was never declared", entry.id, dep);
                prop_assert_eq!(
                    graph.relationship(&entry.id, dep),
                    first.map(|r| r.kind)
                );
            }
        }
    }
}
