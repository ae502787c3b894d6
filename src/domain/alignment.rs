// ============================================================
// Layer 3 — Node → Token Alignment Map
// ============================================================
// Maps each node of a graph to the token position it was built
// from, or to nothing at all:
//
//   node:      0       1      2
//   position:  Some(4) None   Some(9)
//
// Produced upstream alongside the graph. The batcher passes these
// through untouched (host side, never on a device); the model looks
// them up later to gather token embeddings for graph nodes.

use serde::{Deserialize, Serialize};

/// Per-node token positions; `None` is the "no alignment" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlignmentMap {
    positions: Vec<Option<usize>>,
}

impl AlignmentMap {
    pub fn new(positions: Vec<Option<usize>>) -> Self {
        Self { positions }
    }

    /// Token position for `node`; `None` if unaligned or not in the map.
    pub fn position(&self, node: usize) -> Option<usize> {
        self.positions.get(node).copied().flatten()
    }

    /// Number of nodes the map covers (aligned or not)
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Largest referenced token position, if any node is aligned.
    pub fn max_position(&self) -> Option<usize> {
        self.positions.iter().flatten().copied().max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_sentinel() {
        let m = AlignmentMap::new(vec![Some(4), None, Some(9)]);
        assert_eq!(m.position(0), Some(4));
        assert_eq!(m.position(1), None);
        assert_eq!(m.position(7), None);
        assert_eq!(m.max_position(), Some(9));
    }

    #[test]
    fn test_json_shape() {
        let m: AlignmentMap = serde_json::from_str("[1, null, 3]").unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.position(2), Some(3));
    }
}
