// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the `inspect` subcommand and its flags.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use crate::application::inspect_use_case::{DeviceKind, LoaderConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Batch a prepared corpus once and record the shape of every batch
    Inspect(InspectArgs),
}

/// Where batches are placed
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DeviceArg {
    Cpu,
    Gpu,
}

impl From<DeviceArg> for DeviceKind {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Cpu => DeviceKind::Cpu,
            DeviceArg::Gpu => DeviceKind::Gpu,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// JSON-lines corpus, one prepared example per line
    #[arg(long, default_value = "data/corpus.jsonl")]
    pub corpus: String,

    /// Directory for loader_config.json and batch_stats.csv
    #[arg(long, default_value = "stats")]
    pub stats_dir: String,

    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    /// Worker threads prefetching batches
    #[arg(long, default_value_t = 1)]
    pub num_workers: usize,

    /// Seed for the train/eval split and the training loader shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Share of the corpus held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub eval_fraction: f64,

    #[arg(long, value_enum, default_value_t = DeviceArg::Cpu)]
    pub device: DeviceArg,
}

/// The application layer never sees clap types.
impl From<InspectArgs> for LoaderConfig {
    fn from(a: InspectArgs) -> Self {
        LoaderConfig {
            corpus:        a.corpus,
            stats_dir:     a.stats_dir,
            batch_size:    a.batch_size,
            num_workers:   a.num_workers,
            shuffle_seed:  a.seed,
            eval_fraction: a.eval_fraction,
            device:        a.device.into(),
        }
    }
}
