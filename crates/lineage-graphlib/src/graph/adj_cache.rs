//! Adjacency caches used by [`Graph`](super::Graph).
//!
//! Branching and reachability queries call `successors` / `predecessors` repeatedly; scanning all
//! edges each time is O(E) per query. The caches are compressed per-node edge lists, rebuilt
//! lazily on the first query after a mutation.

#[derive(Debug, Clone)]
pub(in crate::graph) struct DirectedAdjCache {
    pub(in crate::graph) out_offsets: Vec<usize>,
    pub(in crate::graph) out_edges: Vec<usize>,
    pub(in crate::graph) in_offsets: Vec<usize>,
    pub(in crate::graph) in_edges: Vec<usize>,
}

impl DirectedAdjCache {
    pub(in crate::graph) fn build(
        node_count: usize,
        endpoints: impl Iterator<Item = (usize, usize)> + Clone,
    ) -> Self {
        let (out_offsets, out_edges) = csr(node_count, endpoints.clone().map(|(v, _)| v));
        let (in_offsets, in_edges) = csr(node_count, endpoints.map(|(_, w)| w));
        Self {
            out_offsets,
            out_edges,
            in_offsets,
            in_edges,
        }
    }

    pub(in crate::graph) fn out_edges(&self, v_ix: usize) -> &[usize] {
        let start = self.out_offsets[v_ix];
        let end = self.out_offsets[v_ix + 1];
        &self.out_edges[start..end]
    }

    pub(in crate::graph) fn in_edges(&self, v_ix: usize) -> &[usize] {
        let start = self.in_offsets[v_ix];
        let end = self.in_offsets[v_ix + 1];
        &self.in_edges[start..end]
    }
}

#[derive(Debug, Clone)]
pub(in crate::graph) struct UndirectedAdjCache {
    pub(in crate::graph) offsets: Vec<usize>,
    pub(in crate::graph) edges: Vec<usize>,
}

impl UndirectedAdjCache {
    pub(in crate::graph) fn build(
        node_count: usize,
        endpoints: impl Iterator<Item = (usize, usize)> + Clone,
    ) -> Self {
        let (offsets, edges) = csr_incident(node_count, endpoints);
        Self {
            offsets,
            edges,
        }
    }

    pub(in crate::graph) fn edges(&self, v_ix: usize) -> &[usize] {
        let start = self.offsets[v_ix];
        let end = self.offsets[v_ix + 1];
        &self.edges[start..end]
    }
}

/// Groups edge indices by one endpoint, keeping edge insertion order inside each bucket.
fn csr(node_count: usize, owners: impl Iterator<Item = usize> + Clone) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = vec![0usize; node_count + 1];
    for owner in owners.clone() {
        offsets[owner + 1] += 1;
    }
    for i in 0..node_count {
        offsets[i + 1] += offsets[i];
    }
    let mut cursor = offsets.clone();
    let mut slots = vec![0usize; offsets[node_count]];
    for (edge_ix, owner) in owners.enumerate() {
        slots[cursor[owner]] = edge_ix;
        cursor[owner] += 1;
    }
    (offsets, slots)
}

fn csr_incident(
    node_count: usize,
    endpoints: impl Iterator<Item = (usize, usize)> + Clone,
) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = vec![0usize; node_count + 1];
    for (v, w) in endpoints.clone() {
        offsets[v + 1] += 1;
        if v != w {
            offsets[w + 1] += 1;
        }
    }
    for i in 0..node_count {
        offsets[i + 1] += offsets[i];
    }
    let mut cursor = offsets.clone();
    let mut slots = vec![0usize; offsets[node_count]];
    for (edge_ix, (v, w)) in endpoints.enumerate() {
        slots[cursor[v]] = edge_ix;
        cursor[v] += 1;
        if v != w {
            slots[cursor[w]] = edge_ix;
            cursor[w] += 1;
        }
    }
    (offsets, slots)
}
