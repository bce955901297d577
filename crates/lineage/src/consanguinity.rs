//! Blood-relation queries over the undirected relationship graph.
//!
//! Only sibling ordering consults this, to keep consanguineous lines next to each other. Every
//! query runs a fresh reachability search; pedigree graphs are small enough that caching is not
//! worth its invalidation rules.

use crate::family_graph::{FamilyGraph, RelationshipGraph};
use crate::graphlib::alg;
use crate::model::NodeRef;
use crate::pedigree::{Pedigree, Role};
use std::collections::BTreeMap;

pub struct ConsanguinityOracle {
    undirected: RelationshipGraph,
    /// Graph keys of the families each individual is a parent in.
    memberships: BTreeMap<u32, Vec<String>>,
}

impl ConsanguinityOracle {
    pub fn new(graph: &FamilyGraph, pedigree: &Pedigree) -> Self {
        let undirected = graph.undirected();
        let memberships = pedigree
            .individuals()
            .map(|i| {
                let families = pedigree
                    .individual_families(i.id, Role::Parent)
                    .into_iter()
                    .map(|f| NodeRef::Family(f.id).key())
                    .filter(|key| undirected.has_node(key))
                    .collect();
                (i.id, families)
            })
            .collect();
        Self {
            undirected,
            memberships,
        }
    }

    fn families_of(&self, id: u32) -> &[String] {
        self.memberships.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether two individuals are connected through the relationship graph.
    ///
    /// Individuals that are graph nodes themselves are tested directly; parents, which only
    /// appear through their families, are tested via those families.
    pub fn are_related(&self, a: u32, b: u32) -> bool {
        let key_a = NodeRef::Individual(a).key();
        let key_b = NodeRef::Individual(b).key();
        let a_in = self.undirected.has_node(&key_a);
        let b_in = self.undirected.has_node(&key_b);

        let related = match (a_in, b_in) {
            (true, true) => alg::has_path(&self.undirected, &key_a, &key_b),
            (false, true) => self
                .families_of(a)
                .iter()
                .any(|f| alg::has_path(&self.undirected, f, &key_b)),
            (true, false) => self
                .families_of(b)
                .iter()
                .any(|f| alg::has_path(&self.undirected, f, &key_a)),
            (false, false) => {
                let fa = self.families_of(a);
                let fb = self.families_of(b);
                fa.iter()
                    .any(|f1| fb.iter().any(|f2| alg::has_path(&self.undirected, f1, f2)))
            }
        };
        tracing::trace!(a, b, related, "consanguinity query");
        related
    }
}
