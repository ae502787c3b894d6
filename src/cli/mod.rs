// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and hands off to the
// application layer. Only this layer prints to stdout.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs};

#[derive(Parser, Debug)]
#[command(
    name = "graph-qa-batcher",
    version = "0.1.0",
    about = "Assemble graph QA examples into disjoint-union batches and inspect them."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    tracing::info!("Inspecting corpus: {}", args.corpus);

    let summary = InspectUseCase::new(args.into()).execute()?;

    println!(
        "train: {} examples in {} batches | eval: {} examples in {} batches",
        summary.train_examples, summary.train_batches, summary.eval_examples, summary.eval_batches,
    );
    Ok(())
}
