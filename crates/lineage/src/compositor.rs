//! Places laid-out branches side by side and collects the final result.

use crate::branch::Branch;
use crate::brancher::BranchSet;
use crate::config::LayoutConfig;
use crate::error::Result;
use crate::model::{Bounds, NodeRef, Point};
use crate::pedigree::Pedigree;
use crate::tree_layout::BranchLayoutEngine;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub struct LayoutCompositor<'a> {
    config: &'a LayoutConfig,
}

impl<'a> LayoutCompositor<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Lays out every branch, then shifts them onto one row starting at the page margin and
    /// writes the positions back onto the pedigree. Returns the bounds of the whole chart.
    pub fn compose(&self, branches: &mut [Branch], pedigree: &mut Pedigree) -> Result<Bounds> {
        let engine = BranchLayoutEngine::new(self.config);
        layout_branches(&engine, branches)?;

        let mut x = self.config.page_margin;
        let y = self.config.page_margin;
        let mut total = Bounds::empty();
        for branch in branches.iter_mut() {
            branch.set_coordinates(x, y);
            branch.persist(pedigree, self.config.hmargin);
            total = total.union(&branch.bounds());
            x += branch.width() + self.config.branch_gap();
        }

        tracing::info!(
            branches = branches.len(),
            width = total.width(),
            height = total.height(),
            "pedigree composed"
        );
        Ok(total)
    }
}

#[cfg(not(feature = "parallel"))]
fn layout_branches(engine: &BranchLayoutEngine, branches: &mut [Branch]) -> Result<()> {
    branches.iter_mut().try_for_each(|b| engine.layout(b))
}

#[cfg(feature = "parallel")]
fn layout_branches(engine: &BranchLayoutEngine, branches: &mut [Branch]) -> Result<()> {
    use rayon::prelude::*;
    branches.par_iter_mut().try_for_each(|b| engine.layout(b))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualPlacement {
    pub position: Point,
    /// Every distinct position the individual was drawn at, in assignment order.
    pub history: Vec<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSummary {
    pub id: usize,
    pub root: NodeRef,
    pub bounds: Bounds,
    pub node_count: usize,
}

/// Final coordinates plus the bookkeeping a renderer needs to draw connectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub individuals: BTreeMap<u32, IndividualPlacement>,
    pub families: BTreeMap<u32, Point>,
    pub branch_of: BTreeMap<NodeRef, usize>,
    pub branches: Vec<BranchSummary>,
    pub branch_links: BTreeSet<(u32, u32)>,
    pub duplicates: BTreeSet<u32>,
    pub bounds: Bounds,
}

impl LayoutResult {
    pub fn collect(pedigree: &Pedigree, set: &BranchSet, bounds: Bounds) -> Self {
        let individuals = pedigree
            .individuals()
            .map(|p| {
                (
                    p.id,
                    IndividualPlacement {
                        position: p.position,
                        history: p.coordinate_history().to_vec(),
                        duplicate_of: p.duplicate_of,
                    },
                )
            })
            .collect();
        let families = pedigree.families().map(|f| (f.id, f.position)).collect();
        let branch_of = set
            .branches
            .iter()
            .flat_map(|b| b.nodes().iter().map(move |n| (*n, b.id())))
            .collect();
        let branches = set
            .branches
            .iter()
            .map(|b| BranchSummary {
                id: b.id(),
                root: b.root_node(),
                bounds: b.bounds(),
                node_count: b.len(),
            })
            .collect();

        Self {
            individuals,
            families,
            branch_of,
            branches,
            branch_links: set.branch_links.clone(),
            duplicates: set.duplicates.clone(),
            bounds,
        }
    }

    pub fn position(&self, node: NodeRef) -> Option<Point> {
        match node {
            NodeRef::Individual(id) => self.individuals.get(&id).map(|p| p.position),
            NodeRef::Family(id) => self.families.get(&id).copied(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
