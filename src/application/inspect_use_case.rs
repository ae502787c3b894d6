// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Runs the whole batching pipeline once over a corpus and
// records what the batches look like:
//
//   Step 1: Load examples from the corpus   (Layer 4 - data)
//   Step 2: Split train/eval                (Layer 4 - data)
//   Step 3: Build example stores            (Layer 4 - data)
//   Step 4: Save loader config              (Layer 6 - infra)
//   Step 5: Drive Burn data loaders with
//           GraphBatcher, log every batch   (Layer 4 + 6)
//
// Training loaders shuffle; eval loaders keep corpus order.
//
// Reference: Burn Book §4 (DataLoaderBuilder)

use anyhow::{ensure, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::data::{
    batcher::{GraphBatch, GraphBatcher},
    dataset::GraphQaDataset,
    loader::JsonlCorpusLoader,
    splitter::split_train_eval,
};
use crate::domain::example::GraphExample;
use crate::domain::traits::CorpusSource;
use crate::infra::{
    config_store::ConfigStore,
    metrics::{BatchStats, BatchStatsLogger},
};

// ─── Loader Configuration ────────────────────────────────────────────────────
/// Which Burn backend batches are placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// NdArray backend on the host CPU
    Cpu,
    /// Wgpu backend on the default GPU adapter
    Gpu,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub corpus:        String,
    pub stats_dir:     String,
    pub batch_size:    usize,
    pub num_workers:   usize,
    pub shuffle_seed:  u64,
    pub eval_fraction: f64,
    pub device:        DeviceKind,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            corpus:        "data/corpus.jsonl".to_string(),
            stats_dir:     "stats".to_string(),
            batch_size:    8,
            num_workers:   1,
            shuffle_seed:  42,
            eval_fraction: 0.2,
            device:        DeviceKind::Cpu,
        }
    }
}

/// Totals reported back to the CLI after a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectSummary {
    pub train_examples: usize,
    pub eval_examples:  usize,
    pub train_batches:  usize,
    pub eval_batches:   usize,
}

// ─── InspectUseCase ──────────────────────────────────────────────────────────
pub struct InspectUseCase {
    config: LoaderConfig,
}

impl InspectUseCase {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<InspectSummary> {
        let cfg = &self.config;
        ensure!(cfg.batch_size > 0, "batch size must be at least 1");
        ensure!(
            (0.0..=1.0).contains(&cfg.eval_fraction),
            "eval fraction must be within [0, 1], got {}",
            cfg.eval_fraction
        );

        // ── Step 1: Load the corpus ───────────────────────────────────────────
        let examples = JsonlCorpusLoader::new(&cfg.corpus).load_all()?;
        if examples.is_empty() {
            tracing::warn!("Corpus '{}' holds no examples, nothing to batch", cfg.corpus);
            return Ok(InspectSummary::default());
        }

        // ── Step 2: Train / eval split ────────────────────────────────────────
        let (train, eval) = split_train_eval(examples, 1.0 - cfg.eval_fraction, cfg.shuffle_seed);
        tracing::info!("Split: {} train, {} eval", train.len(), eval.len());

        // ── Step 3: Build example stores ──────────────────────────────────────
        let train_dataset = GraphQaDataset::from_columns(train.into_iter().collect())?;
        let eval_dataset  = GraphQaDataset::from_columns(eval.into_iter().collect())?;

        // ── Step 4: Save config ───────────────────────────────────────────────
        ConfigStore::new(&cfg.stats_dir)?.save(cfg)?;
        let stats = BatchStatsLogger::new(&cfg.stats_dir)?;

        // ── Step 5: Batch on the chosen backend ───────────────────────────────
        match cfg.device {
            DeviceKind::Cpu => {
                let device = burn::backend::ndarray::NdArrayDevice::Cpu;
                tracing::info!("Using NdArray device: {:?}", device);
                run_loaders::<burn::backend::NdArray>(cfg, train_dataset, eval_dataset, &stats, device)
            }
            DeviceKind::Gpu => {
                let device = burn::backend::wgpu::WgpuDevice::default();
                tracing::info!("Using WGPU device: {:?}", device);
                run_loaders::<burn::backend::Wgpu>(cfg, train_dataset, eval_dataset, &stats, device)
            }
        }
    }
}

fn run_loaders<B: Backend>(
    cfg:           &LoaderConfig,
    train_dataset: GraphQaDataset,
    eval_dataset:  GraphQaDataset,
    stats:         &BatchStatsLogger,
    device:        B::Device,
) -> Result<InspectSummary> {
    use burn::data::dataset::Dataset;

    let mut summary = InspectSummary {
        train_examples: train_dataset.len(),
        eval_examples:  eval_dataset.len(),
        ..InspectSummary::default()
    };

    // ── Training loader (shuffled) ────────────────────────────────────────────
    let train_loader = DataLoaderBuilder::<B, GraphExample, GraphBatch<B>>::new(GraphBatcher::new())
        .batch_size(cfg.batch_size)
        .shuffle(cfg.shuffle_seed)
        .num_workers(cfg.num_workers)
        .set_device(device.clone())
        .build(train_dataset);

    for (i, batch) in train_loader.iter().enumerate() {
        stats.log(&BatchStats::from_batch("train", i, &batch))?;
        summary.train_batches += 1;
    }

    // ── Eval loader (corpus order) ────────────────────────────────────────────
    if summary.eval_examples > 0 {
        let eval_loader = DataLoaderBuilder::<B, GraphExample, GraphBatch<B>>::new(GraphBatcher::new())
            .batch_size(cfg.batch_size)
            .num_workers(cfg.num_workers)
            .set_device(device)
            .build(eval_dataset);

        for (i, batch) in eval_loader.iter().enumerate() {
            stats.log(&BatchStats::from_batch("eval", i, &batch))?;
            summary.eval_batches += 1;
        }
    }

    tracing::info!(
        "Inspected {} train and {} eval batches; stats in '{}'",
        summary.train_batches,
        summary.eval_batches,
        stats.csv_path().display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const RECORD: &str = r#"{"input_ids":[1,2,3,4],"input_mask":[1,1,1,0],"segment_ids":[0,0,1,1],"label":0,"align_a":[0,1,null],"graph_a":{"num_nodes":3,"src":[0,1],"dst":[1,2]},"align_b":[3,2],"graph_b":{"num_nodes":2,"src":[1],"dst":[0]},"graph_c":{"num_nodes":2,"src":[0],"dst":[1]}}"#;

    fn config_for(dir: &std::path::Path, examples: usize) -> LoaderConfig {
        let corpus = dir.join("corpus.jsonl");
        fs::write(&corpus, vec![RECORD; examples].join("\n")).unwrap();

        LoaderConfig {
            corpus:        corpus.display().to_string(),
            stats_dir:     dir.join("stats").display().to_string(),
            batch_size:    2,
            eval_fraction: 0.4,
            ..LoaderConfig::default()
        }
    }

    #[test]
    fn test_inspect_counts_batches() {
        let dir     = tempfile::tempdir().unwrap();
        let cfg     = config_for(dir.path(), 5);
        let summary = InspectUseCase::new(cfg.clone()).execute().unwrap();

        assert_eq!(summary.train_examples, 3);
        assert_eq!(summary.eval_examples, 2);
        assert_eq!(summary.train_batches, 2);
        assert_eq!(summary.eval_batches, 1);

        let csv = fs::read_to_string(dir.path().join("stats/batch_stats.csv")).unwrap();
        assert_eq!(csv.lines().count(), 1 + 3);
        assert!(csv.lines().any(|l| l.starts_with("eval,0,2,10,6,4,2,4")));

        let saved = ConfigStore::new(&cfg.stats_dir).unwrap().load().unwrap();
        assert_eq!(saved.batch_size, 2);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = LoaderConfig { batch_size: 0, ..config_for(dir.path(), 1) };
        assert!(InspectUseCase::new(cfg).execute().is_err());
    }

    #[test]
    fn test_empty_corpus_is_not_an_error() {
        let dir     = tempfile::tempdir().unwrap();
        let cfg     = config_for(dir.path(), 0);
        let summary = InspectUseCase::new(cfg).execute().unwrap();
        assert_eq!(summary, InspectSummary::default());
    }
}
