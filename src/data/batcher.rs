// ============================================================
// Layer 4 — Graph QA Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<GraphExample>
// into one GraphBatch on the target device.
//
// What goes where:
//
//   input_ids / input_mask / segment_ids  → [B, L] Int tensors
//   labels                                → [B] or [B, K] Int tensor
//   align_a / align_b                     → host Vec<Arc<..>>, untouched
//   graph_a, graph_b of every example     → ONE union graph (ab)
//   graph_c of every example              → ONE union graph (c)
//
// The ab union interleaves each example's pair:
//
//   a0 b0 a1 b1 a2 b2 ...
//
// and every node gets an origin index naming the graph instance
// it came from, in that emission order. For example i:
//
//   nodes of graph_a → 2*i
//   nodes of graph_b → 2*i + 1
//
// The model pools per instance using exactly this numbering.
//
// The c union carries no origin index; its batch_num_nodes is the
// only record of which example each node came from.
//
// Reference: Burn Book §4 (Batcher)

use std::sync::Arc;

use anyhow::{bail, ensure, Result};
use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::union::{disjoint_union, BatchedGraph, DisjointUnion};
use crate::domain::alignment::AlignmentMap;
use crate::domain::example::{GraphExample, Label};
use crate::domain::graph::Graph;

// ─── GraphBatch ───────────────────────────────────────────────────────────────
/// A batch of graph QA examples ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct GraphBatch<B: Backend> {
    /// Token ids — shape: [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// 1 = real token, 0 = padding — shape: [batch_size, seq_len]
    pub input_mask: Tensor<B, 2, Int>,

    /// Question/answer segment ids — shape: [batch_size, seq_len]
    pub segment_ids: Tensor<B, 2, Int>,

    pub labels: LabelTensor<B>,

    /// Alignment map of each example's graph_a, in batch order
    pub align_a: Vec<Arc<AlignmentMap>>,

    /// Alignment map of each example's graph_b, in batch order
    pub align_b: Vec<Arc<AlignmentMap>>,

    /// Disjoint union of a0, b0, a1, b1, ...
    pub ab_graphs: BatchedGraph<B>,

    /// Graph instance of every ab_graphs node — shape: [ab_graphs.num_nodes]
    pub origin_index: Tensor<B, 1, Int>,

    /// Disjoint union of c0, c1, ...
    pub c_graphs: BatchedGraph<B>,
}

impl<B: Backend> GraphBatch<B> {
    pub fn num_examples(&self) -> usize {
        self.align_a.len()
    }

    /// Graph instances the origin index ranges over (two per example)
    pub fn num_instances(&self) -> usize {
        self.ab_graphs.num_graphs()
    }
}

/// Stacked labels: one id per example, or one fixed-width row per example.
#[derive(Debug, Clone)]
pub enum LabelTensor<B: Backend> {
    /// shape: [batch_size]
    Scalar(Tensor<B, 1, Int>),
    /// shape: [batch_size, label_width]
    Vector(Tensor<B, 2, Int>),
}

// ─── Origin tracking ──────────────────────────────────────────────────────────
/// Accumulator for the interleaved ab union: the graphs in emission
/// order and the origin index of every node emitted so far.
///
/// `next_instance` always equals `graphs.len()`.
#[derive(Debug, Clone, Default)]
pub struct OriginIndex {
    pub graphs:        Vec<Arc<Graph>>,
    pub index:         Vec<i64>,
    pub next_instance: usize,
}

impl OriginIndex {
    /// Emit one graph instance: tag its nodes and advance the counter.
    pub fn emit(mut self, graph: &Arc<Graph>) -> Self {
        let instance = self.next_instance as i64;
        self.index
            .extend(std::iter::repeat(instance).take(graph.num_nodes()));
        self.graphs.push(Arc::clone(graph));
        self.next_instance += 1;
        self
    }
}

/// Fold every example's (graph_a, graph_b) pair into the accumulator,
/// a before b, in example order.
pub fn collect_pair_graphs(items: &[GraphExample]) -> OriginIndex {
    items
        .iter()
        .fold(OriginIndex::default(), |acc, ex| acc.emit(&ex.graph_a).emit(&ex.graph_b))
}

/// Every example's graph_c, in example order. No origin tracking.
pub fn collect_c_graphs(items: &[GraphExample]) -> Vec<Arc<Graph>> {
    items.iter().map(|ex| Arc::clone(&ex.graph_c)).collect()
}

// ─── GraphBatcher ─────────────────────────────────────────────────────────────
/// Stateless assembler; the device is supplied per call.
#[derive(Clone, Debug, Default)]
pub struct GraphBatcher;

impl GraphBatcher {
    pub fn new() -> Self {
        Self
    }

    /// Assemble `items` into one batch on `device`.
    ///
    /// Fails on an empty batch, on token rows that differ in length,
    /// on labels that mix scalars and vectors (or vector widths), and
    /// on graphs whose feature schemas cannot share one union.
    pub fn assemble<B: Backend>(
        &self,
        items:  Vec<GraphExample>,
        device: &B::Device,
    ) -> Result<GraphBatch<B>> {
        ensure!(!items.is_empty(), "cannot assemble an empty batch");

        // ── Token features ────────────────────────────────────────────────────
        let input_ids   = stack_rows::<B>("input_ids", items.iter().map(|ex| &ex.input_ids), device)?;
        let input_mask  = stack_rows::<B>("input_mask", items.iter().map(|ex| &ex.input_mask), device)?;
        let segment_ids = stack_rows::<B>("segment_ids", items.iter().map(|ex| &ex.segment_ids), device)?;
        let labels      = stack_labels::<B>(&items, device)?;

        // ── Alignment maps (host side, shared not copied) ─────────────────────
        let align_a = items.iter().map(|ex| Arc::clone(&ex.align_a)).collect();
        let align_b = items.iter().map(|ex| Arc::clone(&ex.align_b)).collect();

        // ── Interleaved ab union with origin index ────────────────────────────
        let pairs    = collect_pair_graphs(&items);
        let ab_union = disjoint_union(&pairs.graphs)?;
        debug_assert_eq!(pairs.index.len(), ab_union.graph.num_nodes());

        let origin_len   = pairs.index.len();
        let origin_index = Tensor::<B, 1, Int>::from_data(
            TensorData::new(pairs.index, [origin_len]),
            device,
        );

        // ── c union ───────────────────────────────────────────────────────────
        let c_union = disjoint_union(&collect_c_graphs(&items))?;
        warn_on_empty_graphs(&ab_union, &c_union);

        tracing::debug!(
            "Assembled batch: {} examples, ab={} nodes/{} edges, c={} nodes/{} edges",
            items.len(),
            ab_union.graph.num_nodes(),
            ab_union.graph.num_edges(),
            c_union.graph.num_nodes(),
            c_union.graph.num_edges(),
        );

        Ok(GraphBatch {
            input_ids,
            input_mask,
            segment_ids,
            labels,
            align_a,
            align_b,
            ab_graphs: ab_union.to_device(device),
            origin_index,
            c_graphs: c_union.to_device(device),
        })
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// The DataLoader calls .batch(items, device) with each mini-batch.
// The trait is infallible, so a broken upstream contract aborts here.
impl<B: Backend> Batcher<B, GraphExample, GraphBatch<B>> for GraphBatcher {
    fn batch(&self, items: Vec<GraphExample>, device: &B::Device) -> GraphBatch<B> {
        match self.assemble(items, device) {
            Ok(batch) => batch,
            Err(err) => panic!("graph batch contract violated: {err:#}"),
        }
    }
}

/// Stack equal-length rows into a `[rows, len]` Int tensor.
fn stack_rows<'a, B: Backend>(
    field:  &str,
    rows:   impl ExactSizeIterator<Item = &'a Vec<i64>>,
    device: &B::Device,
) -> Result<Tensor<B, 2, Int>> {
    let batch_size = rows.len();
    let mut flat   = Vec::new();
    let mut width  = None;

    for (i, row) in rows.enumerate() {
        let expected = *width.get_or_insert(row.len());
        ensure!(
            row.len() == expected,
            "shape mismatch stacking {field}: row {i} has length {} but row 0 has {expected}",
            row.len()
        );
        flat.extend_from_slice(row);
    }

    let width = width.unwrap_or(0);
    Ok(Tensor::<B, 2, Int>::from_data(TensorData::new(flat, [batch_size, width]), device))
}

fn stack_labels<B: Backend>(items: &[GraphExample], device: &B::Device) -> Result<LabelTensor<B>> {
    match &items[0].label {
        Label::Scalar(_) => {
            let values = items
                .iter()
                .enumerate()
                .map(|(i, ex)| match ex.label {
                    Label::Scalar(v) => Ok(v),
                    Label::Vector(_) => bail!("example {i} has a vector label but example 0 has a scalar"),
                })
                .collect::<Result<Vec<i64>>>()?;
            let len = values.len();
            Ok(LabelTensor::Scalar(Tensor::<B, 1, Int>::from_data(
                TensorData::new(values, [len]),
                device,
            )))
        }
        Label::Vector(_) => {
            let rows = items
                .iter()
                .enumerate()
                .map(|(i, ex)| match &ex.label {
                    Label::Vector(v) => Ok(v),
                    Label::Scalar(_) => bail!("example {i} has a scalar label but example 0 has a vector"),
                })
                .collect::<Result<Vec<&Vec<i64>>>>()?;
            Ok(LabelTensor::Vector(stack_rows::<B>("labels", rows.into_iter(), device)?))
        }
    }
}

fn warn_on_empty_graphs(ab: &DisjointUnion, c: &DisjointUnion) {
    let empty_ab = ab.batch_num_nodes.iter().filter(|&&n| n == 0).count();
    let empty_c  = c.batch_num_nodes.iter().filter(|&&n| n == 0).count();
    if empty_ab + empty_c > 0 {
        tracing::warn!(
            "Batch contains zero-node graphs ({} ab instances, {} c graphs)",
            empty_ab,
            empty_c
        );
    }
}
