// ============================================================
// Layer 3 — GraphExample Domain Type
// ============================================================
// One training example: a fixed-length token sequence for a
// question/answer pair, its label, and three graphs.
//
//   input_ids / input_mask / segment_ids   — length L, pre-padded
//   label                                  — scalar or fixed vector
//   graph_a + align_a                      — graph aligned to tokens
//   graph_b + align_b                      — graph aligned to tokens
//   graph_c                                — independent graph
//
// Graphs and alignment maps sit behind Arc: cloning an example
// (which Burn's Dataset::get does on every access) shares the
// payload instead of copying it, and a batch can hand the exact
// same alignment map back to the caller.
//
// Reference: Rust Book §15 (Rc<T> / Arc<T>)

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::alignment::AlignmentMap;
use crate::domain::graph::Graph;

/// The example's classification target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Scalar(i64),
    Vector(Vec<i64>),
}

impl Label {
    /// Width of the label: `None` for a scalar, `Some(k)` for a vector
    pub fn width(&self) -> Option<usize> {
        match self {
            Label::Scalar(_) => None,
            Label::Vector(v) => Some(v.len()),
        }
    }
}

/// One fully prepared example, field order matching the corpus columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphExample {
    pub input_ids:   Vec<i64>,
    pub input_mask:  Vec<i64>,
    pub segment_ids: Vec<i64>,
    pub label:       Label,
    pub align_a:     Arc<AlignmentMap>,
    pub graph_a:     Arc<Graph>,
    pub align_b:     Arc<AlignmentMap>,
    pub graph_b:     Arc<Graph>,
    pub graph_c:     Arc<Graph>,
}

impl GraphExample {
    /// Token sequence length of this example
    pub fn seq_len(&self) -> usize {
        self.input_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_width() {
        assert_eq!(Label::Scalar(1).width(), None);
        assert_eq!(Label::Vector(vec![0, 1, 0]).width(), Some(3));
    }

    #[test]
    fn test_untagged_label_json() {
        let s: Label = serde_json::from_str("2").unwrap();
        let v: Label = serde_json::from_str("[1, 0]").unwrap();
        assert_eq!(s, Label::Scalar(2));
        assert_eq!(v, Label::Vector(vec![1, 0]));
    }
}
