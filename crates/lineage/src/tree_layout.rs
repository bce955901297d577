//! Tidy tree placement of a single branch.
//!
//! Walker's algorithm in Buchheim's linear-time formulation, working on top-left label
//! coordinates: a sibling is separated from its left neighbor by that neighbor's width plus
//! `hmargin`, and a parent is centered over the span from its first child's left edge to its last
//! child's right edge. Per-walk state lives in a scratch arena next to the branch so the branch
//! itself only ever holds finished coordinates.

use crate::branch::Branch;
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::model::{Bounds, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum WalkState {
    #[default]
    Unvisited,
    Preprocessed,
    FirstWalked,
    SecondWalked,
}

#[derive(Debug, Clone, Default)]
struct Scratch {
    state: WalkState,
    /// 1-based position among siblings.
    number: usize,
    left_sibling: Option<usize>,
    leftmost_sibling: Option<usize>,
    /// Only ever set on nodes without children.
    thread: Option<usize>,
    ancestor: usize,
    prelim: f64,
    modifier: f64,
    shift: f64,
    change: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct BranchLayoutEngine {
    hmargin: f64,
    node_height: f64,
}

impl BranchLayoutEngine {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            hmargin: config.hmargin,
            node_height: config.node_height,
        }
    }

    /// Computes relative positions for every node of `branch`. Afterwards the branch's bounds
    /// start at `(0, 0)`.
    pub fn layout(&self, branch: &mut Branch) -> Result<()> {
        if branch.is_empty() {
            return Ok(());
        }
        let mut walk = Walk::new(self, branch);
        let root = branch.root();
        walk.preprocess(root);
        walk.first_walk(root)?;
        let m = -walk.scratch[root].prelim;
        walk.second_walk(root, m);
        let (positions, bounds) = walk.finish();

        tracing::debug!(
            branch = branch.id(),
            nodes = branch.len(),
            width = bounds.width(),
            height = bounds.height(),
            "branch laid out"
        );
        branch.set_layout(positions, bounds);
        Ok(())
    }
}

struct Walk<'b> {
    hmargin: f64,
    level_height: f64,
    branch: &'b Branch,
    scratch: Vec<Scratch>,
    positions: Vec<Point>,
    bounds: Bounds,
}

impl<'b> Walk<'b> {
    fn new(engine: &BranchLayoutEngine, branch: &'b Branch) -> Self {
        let tallest = (0..branch.len())
            .map(|v| branch.size(v).height)
            .fold(0.0_f64, f64::max);
        Self {
            hmargin: engine.hmargin,
            level_height: engine.node_height + tallest,
            branch,
            scratch: vec![Scratch::default(); branch.len()],
            positions: vec![Point::default(); branch.len()],
            bounds: Bounds::empty(),
        }
    }

    fn finish(self) -> (Vec<Point>, Bounds) {
        (self.positions, self.bounds)
    }

    fn width(&self, v: usize) -> f64 {
        self.branch.size(v).width
    }

    fn preprocess(&mut self, root: usize) {
        self.scratch[root].number = 1;
        self.scratch[root].ancestor = root;
        self.scratch[root].state = WalkState::Preprocessed;

        let branch = self.branch;
        let mut stack = vec![root];
        while let Some(v) = stack.pop() {
            let children = branch.children(v);
            for (i, &w) in children.iter().enumerate() {
                let s = &mut self.scratch[w];
                s.number = i + 1;
                s.ancestor = w;
                s.left_sibling = i.checked_sub(1).map(|j| children[j]);
                s.leftmost_sibling = (i > 0).then(|| children[0]);
                s.state = WalkState::Preprocessed;
                stack.push(w);
            }
        }
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.branch
            .children(v)
            .first()
            .copied()
            .or(self.scratch[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.branch
            .children(v)
            .last()
            .copied()
            .or(self.scratch[v].thread)
    }

    /// Post-order pass computing preliminary x and modifiers. Each finished child is apportioned
    /// against its left siblings before the next child is entered.
    fn first_walk(&mut self, root: usize) -> Result<()> {
        let branch = self.branch;
        // (node, next child slot, default ancestor among its children)
        let mut work: Vec<(usize, usize, usize)> =
            vec![(root, 0, Self::first_child_or(branch, root))];
        while let Some((v, slot, default_ancestor)) = work.pop() {
            if let Some(&w) = branch.children(v).get(slot) {
                debug_assert_eq!(self.scratch[w].state, WalkState::Preprocessed);
                work.push((v, slot + 1, default_ancestor));
                work.push((w, 0, Self::first_child_or(branch, w)));
                continue;
            }

            self.place_preliminary(v);
            if let Some(frame) = work.last_mut() {
                frame.2 = self.apportion(v, frame.2)?;
            }
        }
        Ok(())
    }

    fn first_child_or(branch: &Branch, v: usize) -> usize {
        branch.children(v).first().copied().unwrap_or(v)
    }

    /// Runs once every child of `v` has been walked and apportioned.
    fn place_preliminary(&mut self, v: usize) {
        let branch = self.branch;
        let children = branch.children(v);
        let left = self.scratch[v].left_sibling;

        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            self.execute_shifts(v);
            let midpoint = (self.scratch[first].prelim + self.scratch[last].prelim + self.width(last))
                / 2.0
                - self.width(v) / 2.0;
            match left {
                Some(w) => {
                    let prelim = self.scratch[w].prelim + self.width(w) + self.hmargin;
                    self.scratch[v].prelim = prelim;
                    self.scratch[v].modifier = prelim - midpoint;
                }
                None => self.scratch[v].prelim = midpoint,
            }
        } else {
            self.scratch[v].prelim = match left {
                Some(w) => self.scratch[w].prelim + self.width(w) + self.hmargin,
                None => 0.0,
            };
        }

        self.scratch[v].state = WalkState::FirstWalked;
    }

    /// Pushes the subtree of `v` right until its left contour clears the right contour of every
    /// sibling subtree to its left. Returns the new default ancestor.
    fn apportion(&mut self, v: usize, default_ancestor: usize) -> Result<usize> {
        let Some(w) = self.scratch[v].left_sibling else {
            return Ok(default_ancestor);
        };
        let mut default_ancestor = default_ancestor;

        let mut vir = v;
        let mut vor = v;
        let mut vil = w;
        let mut vol = self.scratch[v].leftmost_sibling.unwrap_or(w);
        let mut sir = self.scratch[v].modifier;
        let mut sor = sir;
        let mut sil = self.scratch[vil].modifier;
        let mut sol = self.scratch[vol].modifier;

        while let (Some(il), Some(ir)) = (self.next_right(vil), self.next_left(vir)) {
            vil = il;
            vir = ir;
            vol = self.next_left(vol).unwrap_or(vol);
            vor = self.next_right(vor).unwrap_or(vor);
            self.scratch[vor].ancestor = v;

            let shift = (self.scratch[vil].prelim + sil + self.width(vil) + self.hmargin)
                - (self.scratch[vir].prelim + sir);
            if shift > 0.0 {
                let a = self.ancestor(vil, v, default_ancestor);
                self.move_subtree(a, v, shift)?;
                sir += shift;
                sor += shift;
            }

            sil += self.scratch[vil].modifier;
            sir += self.scratch[vir].modifier;
            sol += self.scratch[vol].modifier;
            sor += self.scratch[vor].modifier;
        }

        if self.next_right(vil).is_some() && self.next_right(vor).is_none() {
            self.scratch[vor].thread = self.next_right(vil);
            self.scratch[vor].modifier += sil - sor;
        } else {
            if self.next_left(vir).is_some() && self.next_left(vol).is_none() {
                self.scratch[vol].thread = self.next_left(vir);
                self.scratch[vol].modifier += sir - sol;
            }
            default_ancestor = v;
        }
        Ok(default_ancestor)
    }

    fn ancestor(&self, vil: usize, v: usize, default_ancestor: usize) -> usize {
        let a = self.scratch[vil].ancestor;
        if self.branch.parent(a) == self.branch.parent(v) {
            a
        } else {
            default_ancestor
        }
    }

    fn move_subtree(&mut self, wl: usize, wr: usize, shift: f64) -> Result<()> {
        let subtrees = self.scratch[wr].number as i64 - self.scratch[wl].number as i64;
        if subtrees <= 0 {
            let left = self.branch.node(wl).key();
            let right = self.branch.node(wr).key();
            tracing::error!(branch = self.branch.id(), %left, %right, subtrees, "invalid subtree shift");
            return Err(Error::InvalidSubtreeShift {
                branch: self.branch.id(),
                left,
                right,
                subtrees,
            });
        }
        let per_subtree = shift / subtrees as f64;
        self.scratch[wr].change -= per_subtree;
        self.scratch[wr].shift += shift;
        self.scratch[wl].change += per_subtree;
        self.scratch[wr].prelim += shift;
        self.scratch[wr].modifier += shift;
        Ok(())
    }

    fn execute_shifts(&mut self, v: usize) {
        let branch = self.branch;
        let mut shift = 0.0;
        let mut change = 0.0;
        for &w in branch.children(v).iter().rev() {
            let s = &mut self.scratch[w];
            s.prelim += shift;
            s.modifier += shift;
            change += s.change;
            shift += s.shift + change;
        }
    }

    /// Pre-order pass turning preliminary x plus the ancestors' modifiers into final positions.
    fn second_walk(&mut self, root: usize, m: f64) {
        let branch = self.branch;
        let mut stack = vec![(root, m, 0_usize)];
        while let Some((v, m, depth)) = stack.pop() {
            debug_assert_eq!(self.scratch[v].state, WalkState::FirstWalked);
            let at = Point::new(self.scratch[v].prelim + m, depth as f64 * self.level_height);
            self.positions[v] = at;
            self.bounds.include(at, branch.size(v));
            self.scratch[v].state = WalkState::SecondWalked;

            let m = m + self.scratch[v].modifier;
            for &w in branch.children(v).iter().rev() {
                stack.push((w, m, depth + 1));
            }
        }
    }
}
