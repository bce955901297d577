//! Pedigree chart layout.
//!
//! The relationship graph of a pedigree may contain cycles and people with several incoming
//! relationships. [`layout`] reduces it to a forest of branches, lays each branch out as a tidy
//! tree and places the branches left to right.

pub use lineage_graphlib as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod branch;
pub mod brancher;
pub mod compositor;
pub mod config;
pub mod consanguinity;
pub mod date;
pub mod error;
pub mod family_graph;
pub mod model;
pub mod ordering;
pub mod pedigree;
pub mod tree_layout;

pub use branch::Branch;
pub use brancher::{BranchSet, Brancher};
pub use compositor::{BranchSummary, IndividualPlacement, LayoutCompositor, LayoutResult};
pub use config::LayoutConfig;
pub use consanguinity::ConsanguinityOracle;
pub use error::{Error, Result};
pub use family_graph::{FamilyGraph, Link, LinkKind, RelationshipGraph};
pub use model::{
    Bounds, Family, FamilyRecord, Individual, IndividualRecord, NodeRef, Point, Sex, Size,
};
pub use pedigree::{IdAllocator, Pedigree, Role};
pub use tree_layout::BranchLayoutEngine;

/// Runs the whole pipeline on `pedigree`.
///
/// Duplicates created for cross-branch links are added to the pedigree, and every individual and
/// family ends up with its final position.
pub fn layout(pedigree: &mut Pedigree, config: &LayoutConfig) -> Result<LayoutResult> {
    config.validate()?;
    let mut graph = FamilyGraph::build(pedigree)?;
    let oracle = ConsanguinityOracle::new(&graph, pedigree);
    let mut set = Brancher::new(config).run(&mut graph, pedigree, &oracle)?;
    let bounds = LayoutCompositor::new(config).compose(&mut set.branches, pedigree)?;
    Ok(LayoutResult::collect(pedigree, &set, bounds))
}
