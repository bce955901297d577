//! Helper algorithms over [`Graph`].

use super::{EdgeKey, Graph};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Weakly connected components, each listed in breadth-first discovery order. Components are
/// ordered by the insertion position of their first node.
pub fn components<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>>
where
    N: Default,
    E: Default,
{
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.node_ids() {
        if !seen.insert(start.clone()) {
            continue;
        }
        let mut comp: Vec<String> = Vec::new();
        let mut q: VecDeque<String> = VecDeque::new();
        q.push_back(start);
        while let Some(v) = q.pop_front() {
            comp.push(v.clone());
            for n in g.successors(&v) {
                if seen.insert(n.to_string()) {
                    q.push_back(n.to_string());
                }
            }
            for n in g.predecessors(&v) {
                if seen.insert(n.to_string()) {
                    q.push_back(n.to_string());
                }
            }
        }
        out.push(comp);
    }

    out
}

/// Returns whether `w` is reachable from `v` following successor links. On an undirected graph
/// this is plain connectivity. Unknown endpoints are never connected.
pub fn has_path<N, E>(g: &Graph<N, E>, v: &str, w: &str) -> bool
where
    N: Default,
    E: Default,
{
    if !g.has_node(v) || !g.has_node(w) {
        return false;
    }
    if v == w {
        return true;
    }
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut q: VecDeque<&str> = VecDeque::new();
    seen.insert(v);
    q.push_back(v);
    while let Some(u) = q.pop_front() {
        for n in g.successors(u) {
            if n == w {
                return true;
            }
            if seen.insert(n) {
                q.push_back(n);
            }
        }
    }
    false
}

/// Strongly connected components (Tarjan), in the order Tarjan completes them. Nodes inside a
/// component keep graph insertion order.
///
/// Runs on node positions with an explicit work stack, so long ancestor chains do not recurse.
pub fn strongly_connected_components<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>>
where
    N: Default,
    E: Default,
{
    const UNSEEN: usize = usize::MAX;

    let ids = g.node_ids();
    let position: BTreeMap<&str, usize> =
        ids.iter().enumerate().map(|(i, v)| (v.as_str(), i)).collect();
    let succ: Vec<Vec<usize>> = ids
        .iter()
        .map(|v| {
            g.successors(v)
                .into_iter()
                .filter_map(|w| position.get(w).copied())
                .collect()
        })
        .collect();

    let n = ids.len();
    let mut index = vec![UNSEEN; n];
    let mut low = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut next_index = 0;
    let mut done: Vec<Vec<usize>> = Vec::new();
    // (node, next successor slot)
    let mut work: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if index[start] != UNSEEN {
            continue;
        }
        index[start] = next_index;
        low[start] = next_index;
        next_index += 1;
        stack.push(start);
        on_stack[start] = true;
        work.push((start, 0));

        while let Some((v, slot)) = work.pop() {
            if let Some(&w) = succ[v].get(slot) {
                work.push((v, slot + 1));
                if index[w] == UNSEEN {
                    index[w] = next_index;
                    low[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    work.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
                continue;
            }

            if low[v] == index[v] {
                let mut scc = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    scc.push(w);
                    if w == v {
                        break;
                    }
                }
                scc.sort_unstable();
                done.push(scc);
            }
            if let Some(&(parent, _)) = work.last() {
                low[parent] = low[parent].min(low[v]);
            }
        }
    }

    done.into_iter()
        .map(|scc| scc.into_iter().map(|i| ids[i].clone()).collect())
        .collect()
}

pub fn find_cycles<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>>
where
    N: Default,
    E: Default,
{
    let mut cycles: Vec<Vec<String>> = Vec::new();
    for scc in strongly_connected_components(g) {
        if scc.len() > 1 {
            cycles.push(scc);
        } else if g.has_edge(&scc[0], &scc[0]) {
            cycles.push(scc);
        }
    }
    cycles.sort_by(|a, b| a.first().cmp(&b.first()));
    cycles
}

/// Result of [`maximum_branching`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branching {
    /// One root per source strongly connected component, in node insertion order.
    pub roots: Vec<String>,
    /// Retained edges; every node is the target of at most one of them.
    pub kept: Vec<EdgeKey>,
    /// Every other edge of the input, in edge insertion order.
    pub removed: Vec<EdgeKey>,
}

/// Selects a maximum branching of an unweighted directed graph.
///
/// A branching keeps at most one incoming edge per node and contains no cycle. Its largest size is
/// `n - s`, where `s` is the number of strongly connected components that no outside edge enters:
/// each such component needs one root, every other node can be given a parent.
///
/// Tie-break: the root of a source component is its first node in insertion order. Roots are
/// then expanded breadth-first, in insertion order, and every node keeps the first out-edge (in
/// edge insertion order) through which the expansion reaches it.
pub fn maximum_branching<N, E>(g: &Graph<N, E>) -> Branching
where
    N: Default,
    E: Default,
{
    let sccs = strongly_connected_components(g);
    let mut component_of: BTreeMap<&str, usize> = BTreeMap::new();
    for (i, scc) in sccs.iter().enumerate() {
        for v in scc {
            component_of.insert(v.as_str(), i);
        }
    }

    let mut entered: Vec<bool> = vec![false; sccs.len()];
    for e in g.edges() {
        let (Some(&cv), Some(&cw)) = (
            component_of.get(e.v.as_str()),
            component_of.get(e.w.as_str()),
        ) else {
            continue;
        };
        if cv != cw {
            entered[cw] = true;
        }
    }

    let root_set: BTreeSet<&str> = sccs
        .iter()
        .enumerate()
        .filter(|(i, _)| !entered[*i])
        .filter_map(|(_, scc)| scc.first().map(|s| s.as_str()))
        .collect();
    let roots: Vec<String> = g
        .nodes()
        .filter(|v| root_set.contains(v))
        .map(|v| v.to_string())
        .collect();

    let mut claimed: BTreeSet<String> = roots.iter().cloned().collect();
    let mut kept_set: BTreeSet<EdgeKey> = BTreeSet::new();
    for root in &roots {
        let mut q: VecDeque<String> = VecDeque::new();
        q.push_back(root.clone());
        while let Some(u) = q.pop_front() {
            for e in g.out_edges(&u) {
                if claimed.insert(e.w.clone()) {
                    q.push_back(e.w.clone());
                    kept_set.insert(e);
                }
            }
        }
    }

    let mut kept: Vec<EdgeKey> = Vec::new();
    let mut removed: Vec<EdgeKey> = Vec::new();
    for e in g.edges() {
        if kept_set.contains(e) {
            kept.push(e.clone());
        } else {
            removed.push(e.clone());
        }
    }

    Branching {
        roots,
        kept,
        removed,
    }
}
