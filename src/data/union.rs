// ============================================================
// Layer 4 — Disjoint Union of Graphs
// ============================================================
// Places many small graphs side by side as one big graph so a
// GNN can process a whole batch with a single set of sparse ops.
//
// Node ids of each input are shifted by the number of nodes that
// came before it:
//
//   g0: 3 nodes, edges 0→1, 1→2
//   g1: 2 nodes, edge  0→1
//
//   union: 5 nodes, edges 0→1, 1→2, 3→4
//          batch_num_nodes = [3, 2]
//          batch_num_edges = [2, 1]
//
// No edge ever crosses between inputs, and the per-input counts
// are enough to split the union (or any per-node result) back
// into its original graphs.
//
// Reference: Burn Book §3 (Tensor creation from TensorData)

use std::borrow::Borrow;
use std::ops::Range;

use anyhow::{bail, Result};
use burn::{prelude::*, tensor::TensorData};

use crate::domain::graph::{Graph, NodeFeatures};

// ─── DisjointUnion ────────────────────────────────────────────────────────────
/// Host-side result of merging graphs: the merged graph plus the
/// node and edge count of every input, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DisjointUnion {
    pub graph:           Graph,
    pub batch_num_nodes: Vec<usize>,
    pub batch_num_edges: Vec<usize>,
}

/// Merge `graphs` into one graph with offset node ids.
///
/// All inputs must share one feature schema: either none of them
/// carries node features, or all do with the same width.
pub fn disjoint_union<G: Borrow<Graph>>(graphs: &[G]) -> Result<DisjointUnion> {
    let feature_dim = common_feature_dim(graphs)?;

    let total_nodes: usize = graphs.iter().map(|g| g.borrow().num_nodes()).sum();
    let total_edges: usize = graphs.iter().map(|g| g.borrow().num_edges()).sum();

    let mut src             = Vec::with_capacity(total_edges);
    let mut dst             = Vec::with_capacity(total_edges);
    let mut batch_num_nodes = Vec::with_capacity(graphs.len());
    let mut batch_num_edges = Vec::with_capacity(graphs.len());
    let mut feature_values  = feature_dim.map(|dim| Vec::with_capacity(total_nodes * dim));

    let mut offset = 0usize;
    for g in graphs {
        let g = g.borrow();

        let shift = u32::try_from(offset)?;
        src.extend(g.src().iter().map(|&n| n + shift));
        dst.extend(g.dst().iter().map(|&n| n + shift));

        if let (Some(values), Some(f)) = (feature_values.as_mut(), g.features()) {
            values.extend_from_slice(&f.values);
        }

        batch_num_nodes.push(g.num_nodes());
        batch_num_edges.push(g.num_edges());
        offset += g.num_nodes();
    }

    let features = feature_dim
        .zip(feature_values)
        .map(|(dim, values)| NodeFeatures::new(dim, values));

    Ok(DisjointUnion {
        graph: Graph::new(total_nodes, src, dst, features)?,
        batch_num_nodes,
        batch_num_edges,
    })
}

/// Feature width shared by every input, or an error if they disagree.
fn common_feature_dim<G: Borrow<Graph>>(graphs: &[G]) -> Result<Option<usize>> {
    let mut dims = graphs.iter().map(|g| g.borrow().feature_dim());

    let Some(first) = dims.next() else {
        return Ok(None);
    };

    for (i, dim) in dims.enumerate() {
        if dim != first {
            bail!(
                "graph {} has feature width {:?} but graph 0 has {:?}; \
                 all graphs in a union must share one feature schema",
                i + 1,
                dim,
                first
            );
        }
    }
    Ok(first)
}

impl DisjointUnion {
    /// Number of graphs merged into this union
    pub fn num_graphs(&self) -> usize {
        self.batch_num_nodes.len()
    }

    /// Node id at which each input graph starts inside the union.
    pub fn node_offsets(&self) -> Vec<usize> {
        exclusive_prefix_sum(&self.batch_num_nodes)
    }

    /// Node ids of the union that belong to input graph `i`.
    pub fn node_range(&self, i: usize) -> Range<usize> {
        let start = self.batch_num_nodes[..i].iter().sum::<usize>();
        start..start + self.batch_num_nodes[i]
    }

    /// Split the union back into its input graphs.
    pub fn unbatch(&self) -> Result<Vec<Graph>> {
        let mut graphs     = Vec::with_capacity(self.num_graphs());
        let mut edge_start = 0usize;

        for (i, (&n, &e)) in self.batch_num_nodes.iter().zip(&self.batch_num_edges).enumerate() {
            let nodes = self.node_range(i);
            let shift = u32::try_from(nodes.start)?;
            let edges = edge_start..edge_start + e;

            let src = self.graph.src()[edges.clone()].iter().map(|&v| v - shift).collect();
            let dst = self.graph.dst()[edges].iter().map(|&v| v - shift).collect();
            let features = self.graph.features().map(|f| {
                NodeFeatures::new(f.dim, f.values[nodes.start * f.dim..nodes.end * f.dim].to_vec())
            });

            graphs.push(Graph::new(n, src, dst, features)?);
            edge_start += e;
        }
        Ok(graphs)
    }

    /// Upload the union to `device` as index tensors.
    pub fn to_device<B: Backend>(&self, device: &B::Device) -> BatchedGraph<B> {
        let num_edges = self.graph.num_edges();

        let src = index_tensor::<B>(self.graph.src(), device);
        let dst = index_tensor::<B>(self.graph.dst(), device);

        let node_features = self.graph.features().map(|f| {
            Tensor::<B, 2>::from_data(
                TensorData::new(f.values.clone(), [self.graph.num_nodes(), f.dim]),
                device,
            )
        });

        tracing::trace!(
            "Uploaded union: {} graphs, {} nodes, {} edges",
            self.num_graphs(),
            self.graph.num_nodes(),
            num_edges
        );

        BatchedGraph {
            num_nodes:       self.graph.num_nodes(),
            src,
            dst,
            node_features,
            batch_num_nodes: self.batch_num_nodes.clone(),
            batch_num_edges: self.batch_num_edges.clone(),
        }
    }
}

fn index_tensor<B: Backend>(ids: &[u32], device: &B::Device) -> Tensor<B, 1, Int> {
    let values: Vec<i64> = ids.iter().map(|&v| v as i64).collect();
    let len              = values.len();
    Tensor::<B, 1, Int>::from_data(TensorData::new(values, [len]), device)
}

fn exclusive_prefix_sum(counts: &[usize]) -> Vec<usize> {
    counts
        .iter()
        .scan(0usize, |acc, &c| {
            let start = *acc;
            *acc += c;
            Some(start)
        })
        .collect()
}

// ─── BatchedGraph ─────────────────────────────────────────────────────────────
/// Device-resident disjoint union.
///
/// `src`/`dst` have shape `[num_edges]`; `node_features` (when the
/// inputs carried features) has shape `[num_nodes, dim]`. The per-graph
/// counts stay on the host as bookkeeping, not model inputs.
#[derive(Debug, Clone)]
pub struct BatchedGraph<B: Backend> {
    pub num_nodes:       usize,
    pub src:             Tensor<B, 1, Int>,
    pub dst:             Tensor<B, 1, Int>,
    pub node_features:   Option<Tensor<B, 2>>,
    pub batch_num_nodes: Vec<usize>,
    pub batch_num_edges: Vec<usize>,
}

impl<B: Backend> BatchedGraph<B> {
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.batch_num_edges.iter().sum()
    }

    pub fn num_graphs(&self) -> usize {
        self.batch_num_nodes.len()
    }

    /// Node id at which each member graph starts
    pub fn node_offsets(&self) -> Vec<usize> {
        exclusive_prefix_sum(&self.batch_num_nodes)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn path(n: usize) -> Graph {
        let edges: Vec<(u32, u32)> = (1..n as u32).map(|i| (i - 1, i)).collect();
        Graph::from_edges(n, &edges).unwrap()
    }

    #[test]
    fn test_offsets_applied() {
        let u = disjoint_union(&[path(3), path(2)]).unwrap();
        assert_eq!(u.graph.num_nodes(), 5);
        assert_eq!(u.graph.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2), (3, 4)]);
        assert_eq!(u.batch_num_nodes, vec![3, 2]);
        assert_eq!(u.batch_num_edges, vec![2, 1]);
        assert_eq!(u.node_offsets(), vec![0, 3]);
        assert_eq!(u.node_range(1), 3..5);
    }

    #[test]
    fn test_no_edge_crosses_graphs() {
        let graphs = vec![path(4), path(1), path(3), path(2)];
        let u      = disjoint_union(&graphs).unwrap();

        let owner = |node: u32| {
            (0..u.num_graphs())
                .find(|&i| u.node_range(i).contains(&(node as usize)))
                .unwrap()
        };
        for (s, d) in u.graph.edges() {
            assert_eq!(owner(s), owner(d));
        }
    }

    #[test]
    fn test_empty_member_graph_keeps_slot() {
        let u = disjoint_union(&[path(2), path(0), path(2)]).unwrap();
        assert_eq!(u.batch_num_nodes, vec![2, 0, 2]);
        assert_eq!(u.graph.edges().collect::<Vec<_>>(), vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_unbatch_recovers_inputs() {
        let feats = |n: usize| NodeFeatures::new(2, (0..n * 2).map(|v| v as f32).collect());
        let g0    = Graph::new(2, vec![0], vec![1], Some(feats(2))).unwrap();
        let g1    = Graph::new(3, vec![2, 0], vec![1, 2], Some(feats(3))).unwrap();

        let u = disjoint_union(&[g0.clone(), g1.clone()]).unwrap();
        assert_eq!(u.graph.features().unwrap().rows(), 5);
        assert_eq!(u.unbatch().unwrap(), vec![g0, g1]);
    }

    #[test]
    fn test_mixed_feature_schema_rejected() {
        let with = Graph::new(1, vec![], vec![], Some(NodeFeatures::new(3, vec![0.0; 3]))).unwrap();
        let err  = disjoint_union(&[path(2), with]).unwrap_err();
        assert!(err.to_string().contains("feature schema"));
    }

    #[test]
    fn test_to_device_shapes() {
        let device = Default::default();
        let u      = disjoint_union(&[path(3), path(2)]).unwrap();
        let g      = u.to_device::<TestBackend>(&device);

        assert_eq!(g.num_nodes(), 5);
        assert_eq!(g.num_edges(), 3);
        assert_eq!(g.num_graphs(), 2);
        assert_eq!(g.src.dims(), [3]);

        let src: Vec<i64> = g.src.into_data().iter::<i64>().collect();
        let dst: Vec<i64> = g.dst.into_data().iter::<i64>().collect();
        assert_eq!(src, vec![0, 1, 3]);
        assert_eq!(dst, vec![1, 2, 4]);
        assert!(g.node_features.is_none());
    }

    #[test]
    fn test_to_device_features() {
        let device = Default::default();
        let g0     = Graph::new(1, vec![], vec![], Some(NodeFeatures::new(2, vec![1.0, 2.0]))).unwrap();
        let g1     = Graph::new(2, vec![0], vec![1], Some(NodeFeatures::new(2, vec![3.0, 4.0, 5.0, 6.0]))).unwrap();
        let g      = disjoint_union(&[g0, g1]).unwrap().to_device::<TestBackend>(&device);

        let feats = g.node_features.unwrap();
        assert_eq!(feats.dims(), [3, 2]);
        let values: Vec<f32> = feats.into_data().iter::<f32>().collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
