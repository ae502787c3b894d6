// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting file concerns of an inspection run:
//
//   config_store.rs — Persists the LoaderConfig as JSON so a run
//                     (corpus, split seed, batch size, device)
//                     can be reproduced.
//
//   metrics.rs      — Appends the shape of every assembled batch
//                     to a CSV file.
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Loader config saving and loading
pub mod config_store;

/// Per-batch statistics CSV logger
pub mod metrics;
