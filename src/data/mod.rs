// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from a corpus file on disk to device-resident
// graph batches.
//
//   corpus.jsonl
//       │
//       ▼
//   JsonlCorpusLoader → parses one GraphExample per line
//       │
//       ▼
//   split_train_eval  → seeded shuffle, train/eval sets
//       │
//       ▼
//   GraphQaDataset    → implements Burn's Dataset trait
//       │
//       ▼
//   GraphBatcher      → stacks tokens, unions graphs, origin index
//       │                (uses data::union for both unions)
//       ▼
//   DataLoader        → feeds batches to the consumer
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads JSON-lines corpora into GraphExamples
pub mod loader;

/// Seeded train/eval split
pub mod splitter;

/// Implements Burn's Dataset trait over the nine corpus columns
pub mod dataset;

/// Disjoint union of graphs with per-graph bookkeeping
pub mod union;

/// Implements Burn's Batcher trait to create graph batches
pub mod batcher;
