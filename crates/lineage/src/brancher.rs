//! Splits the relationship graph into trees.
//!
//! A maximum branching keeps as many relationship edges as possible while giving every node at
//! most one parent. Each dropped edge becomes a cross-branch link; when the dropped edge came out
//! of a family that actually lists the person as a child, that person is duplicated so the family
//! still shows them in its own tree.

use crate::branch::Branch;
use crate::config::LayoutConfig;
use crate::consanguinity::ConsanguinityOracle;
use crate::error::Result;
use crate::family_graph::{FamilyGraph, Link, NodeLabel, RelationshipGraph};
use crate::graphlib::{GraphOptions, alg};
use crate::model::NodeRef;
use crate::ordering::SiblingOrder;
use crate::pedigree::{IdAllocator, Pedigree};
use std::collections::BTreeSet;

/// Everything one branching run produces.
#[derive(Debug)]
pub struct BranchSet {
    /// Branches in id order.
    pub branches: Vec<Branch>,
    /// `(original, duplicate)` individual pairs to connect across branches.
    pub branch_links: BTreeSet<(u32, u32)>,
    /// Ids of every individual created by this run.
    pub duplicates: BTreeSet<u32>,
    /// Relationship edges dropped by the branching.
    pub removed: Vec<(NodeRef, NodeRef)>,
}

impl BranchSet {
    pub fn branch_of(&self, node: NodeRef) -> Option<usize> {
        self.branches.iter().find(|b| b.contains(node)).map(Branch::id)
    }
}

pub struct Brancher<'a> {
    config: &'a LayoutConfig,
}

impl<'a> Brancher<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    pub fn run(
        &self,
        graph: &mut FamilyGraph,
        pedigree: &mut Pedigree,
        oracle: &ConsanguinityOracle,
    ) -> Result<BranchSet> {
        let branching = alg::maximum_branching(graph.graph());

        let mut tree: RelationshipGraph = RelationshipGraph::new(GraphOptions { directed: true });
        graph.graph().for_each_node(|id, label| {
            tree.set_node(id, *label);
        });
        for e in &branching.kept {
            tree.set_edge(e.v.clone(), e.w.clone());
        }

        let mut ids = IdAllocator::after(pedigree.max_individual_id());
        let mut branch_links = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        let mut removed = Vec::with_capacity(branching.removed.len());

        for e in &branching.removed {
            graph.mark_branch_link(&e.v, &e.w);
            let source: NodeRef = e.v.parse()?;
            let target: NodeRef = e.w.parse()?;
            removed.push((source, target));

            let NodeRef::Family(sfid) = source else {
                continue;
            };
            for child in self.linked_people(pedigree, target) {
                let listed = pedigree.family(sfid).is_some_and(|f| f.contains_child(child));
                if !listed {
                    continue;
                }
                let Some(dup) = pedigree.duplicate_individual(child, &mut ids)? else {
                    continue;
                };
                let dup_node = NodeRef::Individual(dup);
                tree.set_node(
                    dup_node.key(),
                    NodeLabel {
                        entity: Some(dup_node),
                        branch: None,
                    },
                );
                tree.set_edge_with_label(e.v.clone(), dup_node.key(), Link::default());
                branch_links.insert((child, dup));
                duplicates.insert(dup);
            }
        }

        let order = SiblingOrder::new(pedigree, oracle);
        let mut branches = Vec::new();
        for (id, component) in alg::components(&tree).into_iter().enumerate() {
            let members = component
                .iter()
                .map(|key| {
                    let node: NodeRef = key.parse()?;
                    Ok((node, pedigree.node_size(node, self.config.hmargin)))
                })
                .collect::<Result<Vec<_>>>()?;
            let mut edges = Vec::new();
            for key in &component {
                graph.set_branch(key, id);
                if let Some(label) = tree.node_mut(key) {
                    label.branch = Some(id);
                }
                for out in tree.out_edges(key) {
                    edges.push((out.v.parse()?, out.w.parse()?));
                }
            }
            let mut branch = Branch::new(id, members, &edges)?;
            branch.order_children(&order)?;
            branches.push(branch);
        }

        tracing::info!(
            branches = branches.len(),
            removed = removed.len(),
            duplicates = duplicates.len(),
            "relationship graph branched"
        );
        Ok(BranchSet {
            branches,
            branch_links,
            duplicates,
            removed,
        })
    }

    /// The people a relationship edge into `target` stands for: the parents of a family, or the
    /// individual itself.
    fn linked_people(&self, pedigree: &Pedigree, target: NodeRef) -> Vec<u32> {
        match target {
            NodeRef::Individual(id) => vec![id],
            NodeRef::Family(fid) => pedigree
                .family(fid)
                .map(|f| [f.father, f.mother].into_iter().flatten().collect())
                .unwrap_or_default(),
        }
    }
}
