//! Graph container used by `lineage`.
//!
//! This module contains the core `Graph` container plus the helper algorithms re-exported as
//! `lineage_graphlib::alg`.

use rustc_hash::FxBuildHasher;
use std::cell::{RefCell, RefMut};

mod adj_cache;
pub mod alg;
mod edge_key;
mod entries;
mod options;

use adj_cache::{DirectedAdjCache, UndirectedAdjCache};
use edge_key::EdgeKeyView;
use entries::{EdgeEntry, NodeEntry};

pub use edge_key::EdgeKey;
pub use options::GraphOptions;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// String-keyed graph with node labels `N` and edge labels `E`. Nodes created implicitly by
/// [`Graph::set_edge`] get `N::default()`.
pub struct Graph<N, E> {
    options: GraphOptions,

    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<EdgeKey, usize>,

    // Built on first query, dropped by every mutation.
    directed_adj_cache: RefCell<Option<DirectedAdjCache>>,
    undirected_adj_cache: RefCell<Option<UndirectedAdjCache>>,
}

impl<N, E> Graph<N, E>
where
    N: Default,
    E: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            directed_adj_cache: RefCell::new(None),
            undirected_adj_cache: RefCell::new(None),
        }
    }

    fn invalidate_adj(&mut self) {
        *self.directed_adj_cache.get_mut() = None;
        *self.undirected_adj_cache.get_mut() = None;
    }

    fn endpoint_indices(&self) -> impl Iterator<Item = (usize, usize)> + Clone + '_ {
        self.edges.iter().map(|e| {
            // Both endpoints are ensured on insertion and nodes are never removed.
            (self.node_index[&e.key.v], self.node_index[&e.key.w])
        })
    }

    fn ensure_directed_adj(&self) -> RefMut<'_, DirectedAdjCache> {
        RefMut::map(self.directed_adj_cache.borrow_mut(), |cache| {
            cache.get_or_insert_with(|| {
                DirectedAdjCache::build(self.nodes.len(), self.endpoint_indices())
            })
        })
    }

    fn ensure_undirected_adj(&self) -> RefMut<'_, UndirectedAdjCache> {
        RefMut::map(self.undirected_adj_cache.borrow_mut(), |cache| {
            cache.get_or_insert_with(|| {
                UndirectedAdjCache::build(self.nodes.len(), self.endpoint_indices())
            })
        })
    }

    fn edge_index_of(&self, v: &str, w: &str) -> Option<usize> {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        self.edge_index.get(&EdgeKeyView { v, w }).copied()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].label = label;
            return self;
        }
        self.invalidate_adj();
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, idx);
        self
    }

    fn ensure_node(&mut self, id: &str) {
        if !self.node_index.contains_key(id) {
            self.set_node(id, N::default());
        }
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn for_each_node<F>(&self, mut f: F)
    where
        F: FnMut(&str, &N),
    {
        for n in &self.nodes {
            f(&n.id, &n.label);
        }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edge keys in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().map(|e| &e.key)
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.insert_edge(v.into(), w.into(), None)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.insert_edge(v.into(), w.into(), Some(label))
    }

    fn insert_edge(&mut self, v: String, w: String, label: Option<E>) -> &mut Self {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        self.ensure_node(&v);
        self.ensure_node(&w);

        let key = EdgeKey { v, w };
        if let Some(&idx) = self.edge_index.get(&key) {
            if let Some(label) = label {
                self.edges[idx].label = label;
            }
            return self;
        }

        self.invalidate_adj();
        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            key: key.clone(),
            label: label.unwrap_or_default(),
        });
        self.edge_index.insert(key, idx);
        self
    }

    pub fn has_edge(&self, v: &str, w: &str) -> bool {
        self.edge_index_of(v, w).is_some()
    }

    pub fn edge(&self, v: &str, w: &str) -> Option<&E> {
        let idx = self.edge_index_of(v, w)?;
        Some(&self.edges[idx].label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str) -> Option<&mut E> {
        let idx = self.edge_index_of(v, w)?;
        Some(&mut self.edges[idx].label)
    }

    /// Targets of `v`'s out-edges, in edge insertion order. For undirected graphs this is the
    /// neighbor list.
    pub fn successors(&self, v: &str) -> Vec<&str> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        if !self.options.directed {
            return self.adjacent_nodes(v_idx);
        }
        let cache = self.ensure_directed_adj();
        cache
            .out_edges(v_idx)
            .iter()
            .map(|&edge_idx| self.edges[edge_idx].key.w.as_str())
            .collect()
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        if !self.options.directed {
            return self.adjacent_nodes(v_idx);
        }
        let cache = self.ensure_directed_adj();
        cache
            .in_edges(v_idx)
            .iter()
            .map(|&edge_idx| self.edges[edge_idx].key.v.as_str())
            .collect()
    }

    fn adjacent_nodes(&self, v_idx: usize) -> Vec<&str> {
        let v = self.nodes[v_idx].id.as_str();
        let cache = self.ensure_undirected_adj();
        let mut out: Vec<&str> = Vec::new();
        for &edge_idx in cache.edges(v_idx) {
            let key = &self.edges[edge_idx].key;
            let other = if key.v == v {
                key.w.as_str()
            } else {
                key.v.as_str()
            };
            if !out.contains(&other) {
                out.push(other);
            }
        }
        out
    }

    /// Out-edges of `v` in insertion order; every incident edge on an undirected graph.
    pub fn out_edges(&self, v: &str) -> Vec<EdgeKey> {
        let Some(&v_idx) = self.node_index.get(v) else {
            return Vec::new();
        };
        let edges: Vec<usize> = if self.options.directed {
            self.ensure_directed_adj().out_edges(v_idx).to_vec()
        } else {
            self.ensure_undirected_adj().edges(v_idx).to_vec()
        };
        edges
            .into_iter()
            .map(|edge_idx| self.edges[edge_idx].key.clone())
            .collect()
    }

    /// Returns an undirected copy with the same nodes, labels and edges. Insertion order is kept.
    pub fn to_undirected(&self) -> Graph<N, E>
    where
        N: Clone,
        E: Clone,
    {
        let mut g: Graph<N, E> = Graph::new(GraphOptions { directed: false });
        for n in &self.nodes {
            g.set_node(n.id.clone(), n.label.clone());
        }
        for e in &self.edges {
            g.set_edge_with_label(e.key.v.clone(), e.key.w.clone(), e.label.clone());
        }
        g
    }
}
