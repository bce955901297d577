//! A branch: one connected tree of the branching, stored as an index arena.

use crate::error::{Error, Result};
use crate::model::{Bounds, NodeRef, Point, Size};
use crate::ordering::SiblingOrder;
use crate::pedigree::Pedigree;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct Branch {
    id: usize,
    nodes: Vec<NodeRef>,
    sizes: Vec<Size>,
    index: FxHashMap<NodeRef, usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    root: usize,
    positions: Vec<Point>,
    bounds: Bounds,
    origin: Point,
}

impl Branch {
    /// Builds the arena from member nodes (with their label sizes) and the branching edges
    /// between them. Edges whose endpoints are not both members are ignored.
    pub fn new(
        id: usize,
        members: Vec<(NodeRef, Size)>,
        edges: &[(NodeRef, NodeRef)],
    ) -> Result<Self> {
        let (nodes, sizes): (Vec<NodeRef>, Vec<Size>) = members.into_iter().unzip();
        let index: FxHashMap<NodeRef, usize> =
            nodes.iter().enumerate().map(|(i, n)| (*n, i)).collect();

        let mut parent = vec![None; nodes.len()];
        let mut children = vec![Vec::new(); nodes.len()];
        for (from, to) in edges {
            let (Some(&p), Some(&c)) = (index.get(from), index.get(to)) else {
                continue;
            };
            parent[c] = Some(p);
            children[p].push(c);
        }

        let Some(root) = parent.iter().position(Option::is_none) else {
            tracing::error!(branch = id, nodes = nodes.len(), "branch has no root");
            return Err(Error::BranchWithoutRoot { branch: id });
        };

        let len = nodes.len();
        Ok(Self {
            id,
            nodes,
            sizes,
            index,
            parent,
            children,
            root,
            positions: vec![Point::default(); len],
            bounds: Bounds::empty(),
            origin: Point::default(),
        })
    }

    /// Sorts every child list once; the order is cached for all later walks.
    pub fn order_children(&mut self, order: &SiblingOrder<'_>) -> Result<()> {
        for v in 0..self.nodes.len() {
            if self.children[v].len() < 2 {
                continue;
            }
            let mut refs: Vec<NodeRef> = self.children[v].iter().map(|&c| self.nodes[c]).collect();
            order.sort(self.nodes[v], &mut refs)?;
            self.children[v] = refs.iter().map(|r| self.index[r]).collect();
        }
        Ok(())
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub fn contains(&self, node: NodeRef) -> bool {
        self.index.contains_key(&node)
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn root_node(&self) -> NodeRef {
        self.nodes[self.root]
    }

    pub fn node(&self, v: usize) -> NodeRef {
        self.nodes[v]
    }

    pub fn size(&self, v: usize) -> Size {
        self.sizes[v]
    }

    pub fn parent(&self, v: usize) -> Option<usize> {
        self.parent[v]
    }

    pub fn children(&self, v: usize) -> &[usize] {
        &self.children[v]
    }

    /// Children of `node` in layout order.
    pub fn children_of(&self, node: NodeRef) -> Vec<NodeRef> {
        self.index
            .get(&node)
            .map(|&v| self.children[v].iter().map(|&c| self.nodes[c]).collect())
            .unwrap_or_default()
    }

    pub fn position(&self, v: usize) -> Point {
        self.positions[v]
    }

    pub fn position_of(&self, node: NodeRef) -> Option<Point> {
        self.index.get(&node).map(|&v| self.positions[v])
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Installs walk results, normalized so the top-left corner of the bounds is the origin.
    pub(crate) fn set_layout(&mut self, positions: Vec<Point>, bounds: Bounds) {
        self.positions = positions;
        self.bounds = bounds;
        self.origin = Point::new(bounds.min_x, bounds.min_y);
        self.set_coordinates(0.0, 0.0);
    }

    /// Translates the whole branch so its top-left corner lands on `(x, y)`.
    pub fn set_coordinates(&mut self, x: f64, y: f64) {
        let dx = x - self.origin.x;
        let dy = y - self.origin.y;
        for p in &mut self.positions {
            p.x += dx;
            p.y += dy;
        }
        self.bounds.translate(dx, dy);
        self.origin = Point::new(x, y);
    }

    /// Writes the current positions back onto the pedigree, recording them in each individual's
    /// coordinate history.
    pub fn persist(&self, pedigree: &mut Pedigree, hmargin: f64) {
        for (node, at) in self.nodes.iter().zip(&self.positions) {
            match *node {
                NodeRef::Family(id) => pedigree.set_family_coordinates(id, *at, hmargin, true),
                NodeRef::Individual(id) => pedigree.set_individual_coordinates(id, *at, true),
            }
        }
        tracing::debug!(branch = self.id, nodes = self.nodes.len(), "branch persisted");
    }
}
