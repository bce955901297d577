//! The relationship graph between families and individuals.
//!
//! Families are the inner nodes: a family points at each child, or at the child's own families
//! when the child is a parent somewhere. Individuals only appear as nodes when they are not a
//! parent anywhere, so every person is represented exactly once.

use crate::error::{Error, Result};
use crate::graphlib::{Graph, GraphOptions};
use crate::model::NodeRef;
use crate::pedigree::Pedigree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkKind {
    /// Kept inside a branch.
    #[default]
    Standard,
    /// Dropped by the branching and drawn as a cross-branch connector.
    Branch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Link {
    pub kind: LinkKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeLabel {
    pub entity: Option<NodeRef>,
    pub branch: Option<usize>,
}

pub type RelationshipGraph = Graph<NodeLabel, Link>;

pub struct FamilyGraph {
    graph: RelationshipGraph,
}

impl FamilyGraph {
    /// Builds the directed relationship graph. Fails when a family has no parent that resolves to
    /// a known individual.
    pub fn build(pedigree: &Pedigree) -> Result<Self> {
        let mut graph: RelationshipGraph = Graph::new(GraphOptions { directed: true });
        let vertices = pedigree.vertices();
        for &v in &vertices {
            graph.set_node(
                v.key(),
                NodeLabel {
                    entity: Some(v),
                    branch: None,
                },
            );
        }

        for &v in &vertices {
            match v {
                NodeRef::Family(fid) => {
                    let Some(family) = pedigree.family(fid) else {
                        continue;
                    };
                    if pedigree.father(family).is_none() && pedigree.mother(family).is_none() {
                        tracing::error!(
                            family = fid,
                            parents = ?family.parents,
                            "family has no identifiable parent"
                        );
                        return Err(Error::FamilyWithoutParents { family: fid });
                    }
                    for &cid in &family.children {
                        if pedigree.individual(cid).is_none() {
                            continue;
                        }
                        if pedigree.is_parent(cid) {
                            for child_family in pedigree.families_with_parent(&[cid]) {
                                graph.set_edge(v.key(), NodeRef::Family(child_family.id).key());
                            }
                        } else {
                            graph.set_edge(v.key(), NodeRef::Individual(cid).key());
                        }
                    }
                }
                NodeRef::Individual(pid) => {
                    let Some(individual) = pedigree.individual(pid) else {
                        continue;
                    };
                    let known: Vec<u32> = [individual.mother, individual.father]
                        .into_iter()
                        .flatten()
                        .collect();
                    for family in pedigree.families_with_parent(&known) {
                        graph.set_edge(NodeRef::Family(family.id).key(), v.key());
                    }
                }
            }
        }

        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "relationship graph built"
        );
        Ok(Self { graph })
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes in graph order: families by id, then leaf individuals by id.
    pub fn nodes(&self) -> Vec<NodeRef> {
        let mut out = Vec::with_capacity(self.graph.node_count());
        self.graph.for_each_node(|_, label| out.extend(label.entity));
        out
    }

    pub fn edges(&self) -> Vec<(NodeRef, NodeRef)> {
        self.graph
            .edges()
            .filter_map(|e| Some((e.v.parse().ok()?, e.w.parse().ok()?)))
            .collect()
    }

    pub fn has_node(&self, node: NodeRef) -> bool {
        self.graph.has_node(&node.key())
    }

    pub fn has_edge(&self, from: NodeRef, to: NodeRef) -> bool {
        self.graph.has_edge(&from.key(), &to.key())
    }

    pub fn link(&self, from: NodeRef, to: NodeRef) -> Option<LinkKind> {
        self.graph.edge(&from.key(), &to.key()).map(|l| l.kind)
    }

    pub(crate) fn mark_branch_link(&mut self, from: &str, to: &str) {
        if let Some(link) = self.graph.edge_mut(from, to) {
            link.kind = LinkKind::Branch;
        }
    }

    pub(crate) fn set_branch(&mut self, node: &str, branch: usize) {
        if let Some(label) = self.graph.node_mut(node) {
            label.branch = Some(branch);
        }
    }

    pub fn branch_of(&self, node: NodeRef) -> Option<usize> {
        self.graph.node(&node.key()).and_then(|l| l.branch)
    }

    /// Undirected copy used for blood-relation queries.
    pub fn undirected(&self) -> RelationshipGraph {
        self.graph.to_undirected()
    }
}
