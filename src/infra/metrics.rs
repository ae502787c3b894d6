// ============================================================
// Layer 6 — Batch Statistics Logger
// ============================================================
// Records the shape of every assembled batch to a CSV file.
//
// Metrics recorded per batch:
//   - split:      "train" or "eval"
//   - batch:      batch number within the split (0-based)
//   - examples:   number of examples in the batch
//   - ab_nodes / ab_edges: size of the interleaved a/b union
//   - c_nodes  / c_edges:  size of the c union
//   - instances:  graph instances covered by the origin index
//
// Example CSV output:
//   split,batch,examples,ab_nodes,ab_edges,c_nodes,c_edges,instances
//   train,0,8,412,398,96,88,16
//   train,1,8,377,361,96,88,16
//
// Useful for spotting corpora whose graph sizes vary wildly
// between batches.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use burn::prelude::Backend;
use serde::{Deserialize, Serialize};

use crate::data::batcher::GraphBatch;

const HEADER: &str = "split,batch,examples,ab_nodes,ab_edges,c_nodes,c_edges,instances";

/// One row of statistics for a single assembled batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    pub split:     String,
    pub batch:     usize,
    pub examples:  usize,
    pub ab_nodes:  usize,
    pub ab_edges:  usize,
    pub c_nodes:   usize,
    pub c_edges:   usize,
    pub instances: usize,
}

impl BatchStats {
    pub fn from_batch<B: Backend>(split: &str, batch_no: usize, batch: &GraphBatch<B>) -> Self {
        Self {
            split:     split.to_string(),
            batch:     batch_no,
            examples:  batch.num_examples(),
            ab_nodes:  batch.ab_graphs.num_nodes(),
            ab_edges:  batch.ab_graphs.num_edges(),
            c_nodes:   batch.c_graphs.num_nodes(),
            c_edges:   batch.c_graphs.num_edges(),
            instances: batch.num_instances(),
        }
    }
}

/// Appends batch statistics to `batch_stats.csv`.
pub struct BatchStatsLogger {
    csv_path: PathBuf,
}

impl BatchStatsLogger {
    /// Create the logger, writing the CSV header if the file is new.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("batch_stats.csv");

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created batch stats CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one batch's statistics as a new row.
    pub fn log(&self, s: &BatchStats) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{},{},{},{},{},{},{}",
            s.split, s.batch, s.examples, s.ab_nodes, s.ab_edges, s.c_nodes, s.c_edges, s.instances,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batcher::GraphBatcher;
    use crate::data::dataset::tests::example;
    use burn::backend::NdArray;

    #[test]
    fn test_stats_from_batch() {
        let items = vec![example(0, 4, 3, 2, 2), example(1, 4, 2, 4, 3)];
        let batch = GraphBatcher::new()
            .assemble::<NdArray>(items, &Default::default())
            .unwrap();

        let s = BatchStats::from_batch("train", 0, &batch);
        assert_eq!(s.examples, 2);
        assert_eq!(s.ab_nodes, 11);
        assert_eq!(s.ab_edges, 2 + 1 + 1 + 3);
        assert_eq!(s.c_nodes, 5);
        assert_eq!(s.c_edges, 3);
        assert_eq!(s.instances, 4);
    }

    #[test]
    fn test_header_written_once_and_rows_appended() {
        let dir = tempfile::tempdir().unwrap();
        let row = BatchStats {
            split:     "eval".into(),
            batch:     1,
            examples:  2,
            ab_nodes:  10,
            ab_edges:  6,
            c_nodes:   4,
            c_edges:   2,
            instances: 4,
        };

        BatchStatsLogger::new(dir.path()).unwrap().log(&row).unwrap();
        // A second logger on the same directory appends, no new header
        let logger = BatchStatsLogger::new(dir.path()).unwrap();
        logger.log(&row).unwrap();

        let text  = fs::read_to_string(logger.csv_path()).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines, vec![HEADER, "eval,1,2,10,6,4,2,4", "eval,1,2,10,6,4,2,4"]);
    }
}
