use std::sync::Arc;

use anyhow::{ensure, Result};
use burn::data::dataset::Dataset;

use crate::domain::alignment::AlignmentMap;
use crate::domain::example::{GraphExample, Label};
use crate::domain::graph::Graph;

/// The nine parallel corpus columns, one entry per example in each.
#[derive(Debug, Clone, Default)]
pub struct ExampleColumns {
    pub input_ids:   Vec<Vec<i64>>,
    pub input_mask:  Vec<Vec<i64>>,
    pub segment_ids: Vec<Vec<i64>>,
    pub labels:      Vec<Label>,
    pub align_a:     Vec<Arc<AlignmentMap>>,
    pub graph_a:     Vec<Arc<Graph>>,
    pub align_b:     Vec<Arc<AlignmentMap>>,
    pub graph_b:     Vec<Arc<Graph>>,
    pub graph_c:     Vec<Arc<Graph>>,
}

impl ExampleColumns {
    /// Column lengths, in field order, labelled for error messages.
    fn lengths(&self) -> [(&'static str, usize); 9] {
        [
            ("input_ids",   self.input_ids.len()),
            ("input_mask",  self.input_mask.len()),
            ("segment_ids", self.segment_ids.len()),
            ("labels",      self.labels.len()),
            ("align_a",     self.align_a.len()),
            ("graph_a",     self.graph_a.len()),
            ("align_b",     self.align_b.len()),
            ("graph_b",     self.graph_b.len()),
            ("graph_c",     self.graph_c.len()),
        ]
    }

    /// Append one example row to every column
    pub fn push(&mut self, ex: GraphExample) {
        self.input_ids.push(ex.input_ids);
        self.input_mask.push(ex.input_mask);
        self.segment_ids.push(ex.segment_ids);
        self.labels.push(ex.label);
        self.align_a.push(ex.align_a);
        self.graph_a.push(ex.graph_a);
        self.align_b.push(ex.align_b);
        self.graph_b.push(ex.graph_b);
        self.graph_c.push(ex.graph_c);
    }
}

impl FromIterator<GraphExample> for ExampleColumns {
    fn from_iter<I: IntoIterator<Item = GraphExample>>(iter: I) -> Self {
        let mut columns = ExampleColumns::default();
        for ex in iter {
            columns.push(ex);
        }
        columns
    }
}

/// Read-only, random-access store of prepared examples.
///
/// Built once from [`ExampleColumns`]; plugs straight into Burn's
/// `DataLoaderBuilder` through the `Dataset` trait.
pub struct GraphQaDataset {
    columns: ExampleColumns,
}

impl GraphQaDataset {
    /// Build the store, failing fast if the columns disagree in length
    /// or an alignment map points past its example's token sequence.
    pub fn from_columns(columns: ExampleColumns) -> Result<Self> {
        let lengths  = columns.lengths();
        let expected = lengths[0].1;
        ensure!(
            lengths.iter().all(|&(_, n)| n == expected),
            "corpus columns have unequal lengths: {}",
            lengths
                .iter()
                .map(|(name, n)| format!("{name}={n}"))
                .collect::<Vec<_>>()
                .join(", ")
        );

        for (i, seq) in columns.input_ids.iter().enumerate() {
            let l = seq.len();
            for (name, map) in [("align_a", &columns.align_a[i]), ("align_b", &columns.align_b[i])] {
                if let Some(p) = map.max_position() {
                    ensure!(
                        p < l,
                        "example {i}: {name} references token position {p} \
                         but the sequence has length {l}"
                    );
                }
            }
        }

        tracing::debug!("Built graph QA store with {} examples", expected);
        Ok(Self { columns })
    }

    /// Token sequence length of the first example, `None` when empty.
    pub fn seq_len(&self) -> Option<usize> {
        self.columns.input_ids.first().map(Vec::len)
    }
}

impl Dataset<GraphExample> for GraphQaDataset {
    fn get(&self, index: usize) -> Option<GraphExample> {
        let c = &self.columns;
        if index >= c.input_ids.len() {
            return None;
        }
        Some(GraphExample {
            input_ids:   c.input_ids[index].clone(),
            input_mask:  c.input_mask[index].clone(),
            segment_ids: c.segment_ids[index].clone(),
            label:       c.labels[index].clone(),
            align_a:     Arc::clone(&c.align_a[index]),
            graph_a:     Arc::clone(&c.graph_a[index]),
            align_b:     Arc::clone(&c.align_b[index]),
            graph_b:     Arc::clone(&c.graph_b[index]),
            graph_c:     Arc::clone(&c.graph_c[index]),
        })
    }

    fn len(&self) -> usize {
        self.columns.input_ids.len()
    }
}
