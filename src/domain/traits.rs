// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer loads corpora through this trait so the
// on-disk format (JSON lines today) stays a Layer 4 detail.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::example::GraphExample;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the prepared examples of a corpus.
///
/// Implementations:
///   - JsonlCorpusLoader → one JSON record per line
pub trait CorpusSource {
    /// Load every example, in corpus order.
    fn load_all(&self) -> Result<Vec<GraphExample>>;
}
