// ============================================================
// Layer 3 — Graph Domain Type
// ============================================================
// A small directed graph in coordinate (COO) form:
//
//   num_nodes = 4
//   src       = [0, 1, 2]
//   dst       = [1, 2, 3]      → edges 0→1, 1→2, 2→3
//
// Node ids are 0..num_nodes. Edge ids are positions in src/dst.
// Optional node features are stored row-major, one row per node.
//
// This is the host-side representation produced by the upstream
// graph-construction stage. It never touches a device; the
// disjoint union in data::union turns many of these into one
// device-resident batched graph.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

/// Dense per-node feature rows, flattened row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeFeatures {
    /// Width of one feature row
    pub dim: usize,

    /// `num_nodes * dim` values, node 0's row first
    pub values: Vec<f32>,
}

impl NodeFeatures {
    pub fn new(dim: usize, values: Vec<f32>) -> Self {
        Self { dim, values }
    }

    /// Number of rows held, i.e. the node count these features describe.
    pub fn rows(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.values.len() / self.dim
        }
    }

    /// Feature row for one node.
    pub fn row(&self, node: usize) -> &[f32] {
        &self.values[node * self.dim..(node + 1) * self.dim]
    }
}

/// A directed graph with `num_nodes` nodes and edges `src[e] → dst[e]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGraph", into = "RawGraph")]
pub struct Graph {
    num_nodes: usize,
    src:       Vec<u32>,
    dst:       Vec<u32>,
    features:  Option<NodeFeatures>,
}

impl Graph {
    /// Build a graph, checking that every edge endpoint is a valid
    /// node id and that feature rows (if any) match the node count.
    pub fn new(
        num_nodes: usize,
        src:       Vec<u32>,
        dst:       Vec<u32>,
        features:  Option<NodeFeatures>,
    ) -> Result<Self> {
        ensure!(
            src.len() == dst.len(),
            "edge lists differ in length: {} sources vs {} destinations",
            src.len(),
            dst.len()
        );

        if let Some(bad) = src.iter().chain(dst.iter()).find(|&&n| n as usize >= num_nodes) {
            anyhow::bail!("edge endpoint {bad} out of range for graph with {num_nodes} nodes");
        }

        if let Some(f) = &features {
            ensure!(f.dim > 0, "node features must have a non-zero width");
            ensure!(
                f.values.len() == num_nodes * f.dim,
                "node features hold {} values, expected {} nodes x {} dims",
                f.values.len(),
                num_nodes,
                f.dim
            );
        }

        Ok(Self { num_nodes, src, dst, features })
    }

    /// Convenience constructor for a featureless graph from `(src, dst)` pairs.
    pub fn from_edges(num_nodes: usize, edges: &[(u32, u32)]) -> Result<Self> {
        let (src, dst) = edges.iter().copied().unzip();
        Self::new(num_nodes, src, dst, None)
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.src.len()
    }

    pub fn src(&self) -> &[u32] {
        &self.src
    }

    pub fn dst(&self) -> &[u32] {
        &self.dst
    }

    /// Iterate edges as `(src, dst)` pairs in edge-id order
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }

    pub fn features(&self) -> Option<&NodeFeatures> {
        self.features.as_ref()
    }

    /// Feature width, or `None` for a featureless graph.
    pub fn feature_dim(&self) -> Option<usize> {
        self.features.as_ref().map(|f| f.dim)
    }
}

// ─── Serde shadow ─────────────────────────────────────────────────────────────
// Deserialising goes through Graph::new so a corpus file can never
// produce a graph with dangling edges.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGraph {
    num_nodes: usize,
    #[serde(default)]
    src:       Vec<u32>,
    #[serde(default)]
    dst:       Vec<u32>,
    #[serde(default)]
    features:  Option<NodeFeatures>,
}

impl TryFrom<RawGraph> for Graph {
    type Error = anyhow::Error;

    fn try_from(raw: RawGraph) -> Result<Self> {
        Graph::new(raw.num_nodes, raw.src, raw.dst, raw.features)
    }
}

impl From<Graph> for RawGraph {
    fn from(g: Graph) -> Self {
        RawGraph {
            num_nodes: g.num_nodes,
            src:       g.src,
            dst:       g.dst,
            features:  g.features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_rejects_dangling_edge() {
        let err = Graph::from_edges(2, &[(0, 2)]).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_rejects_wrong_feature_size() {
        let feats = NodeFeatures::new(2, vec![0.0; 5]);
        assert!(Graph::new(3, vec![], vec![], Some(feats)).is_err());
    }

    #[test]
    fn test_empty_graph_is_valid() {
        let g = Graph::from_edges(0, &[]).unwrap();
        assert_eq!(g.num_nodes(), 0);
        assert_eq!(g.num_edges(), 0);
    }

    #[test]
    fn test_deserialise_validates() {
        let ok: Graph = serde_json::from_str(r#"{"num_nodes":2,"src":[0],"dst":[1]}"#).unwrap();
        assert_eq!(ok.num_edges(), 1);

        let bad = serde_json::from_str::<Graph>(r#"{"num_nodes":1,"src":[0],"dst":[3]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_feature_rows() {
        let feats = NodeFeatures::new(2, vec![1.0, 2.0, 3.0, 4.0]);
        let g     = Graph::new(2, vec![0], vec![1], Some(feats)).unwrap();
        assert_eq!(g.feature_dim(), Some(2));
        assert_eq!(g.features().unwrap().row(1), &[3.0, 4.0]);
    }
}
