//! Command-line interface for sv-view.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **render**: Render a viewport of a dataset (overview or detail)
//! - **highlight**: Render a viewport and link a selected jump or seed
//! - **runs**: List the caller runs of a dataset
//! - **serve**: Start the HTTP render service
//!
//! ## Usage
//!
//! ```text
//! # Render a viewport of run 1
//! sv-view render --dataset toy.json --run-id 1 0 0 5000 5000
//!
//! # Compare against a ground-truth run, JSON output for a frontend
//! sv-view render --dataset toy.json --run-id 1 --ground-truth-run-id 2 0 0 5000 5000 --format json
//!
//! # Which seeds support jump 17?
//! sv-view highlight --dataset toy.json --run-id 1 --jump 17 0 0 5000 5000
//!
//! # Serve a dataset
//! sv-view serve --dataset toy.json --port 8080 --open
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::core::types::RunId;
use crate::parsing::fasta;
use crate::render::config::{
    RenderRequest, Viewport, DEFAULT_GIVE_UP_FACTOR, DEFAULT_MAX_NUM_ELE,
};
use crate::store::dataset::Dataset;

pub mod highlight;
pub mod render;
pub mod runs;

#[derive(Parser)]
#[command(name = "sv-view")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Browse structural-variant breakpoints at adaptive level of detail")]
#[command(
    long_about = "sv-view renders a rectangle of breakpoint space (from position x to position) for a caller run.\n\nDense regions are summarized as a call-density grid; sparse regions are drawn in detail:\n- Jumps classified by strand information, with fuzziness markers\n- Accepted and ground-truth SV calls\n- Seeds of the supporting reads packed into display lanes\n- Reference bases along both axes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a viewport
    Render(render::RenderArgs),

    /// Render a viewport and highlight the elements linked to a selection
    Highlight(highlight::HighlightArgs),

    /// List the caller runs of a dataset
    Runs(runs::RunsArgs),

    /// Start the web server
    Serve(ServeArgs),
}

/// Where to load the browsed data from
#[derive(Args, Clone)]
pub struct DatasetArgs {
    /// Dataset file (JSON)
    #[arg(short, long, required = true)]
    pub dataset: PathBuf,

    /// FASTA file replacing the dataset's reference (plain or gzipped)
    #[arg(long)]
    pub fasta: Option<PathBuf>,
}

impl DatasetArgs {
    /// Load the dataset, swapping in the FASTA reference if one was given
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset or FASTA file cannot be loaded.
    pub fn load(&self) -> anyhow::Result<Dataset> {
        let dataset = Dataset::load_from_file(&self.dataset)
            .with_context(|| format!("Failed to load dataset {}", self.dataset.display()))?;
        match &self.fasta {
            Some(path) => {
                let pack = fasta::load_pack(path)
                    .with_context(|| format!("Failed to load FASTA {}", path.display()))?;
                Ok(dataset.with_pack(pack))
            }
            None => Ok(dataset),
        }
    }
}

/// Viewport and thresholds of one render
#[derive(Args, Clone)]
pub struct ViewportArgs {
    /// Run whose calls and jumps are shown
    #[arg(long, required = true)]
    pub run_id: i64,

    /// Run holding ground-truth calls
    #[arg(long)]
    pub ground_truth_run_id: Option<i64>,

    /// Minimum support ratio (num_supp_nt / coverage) of shown calls
    #[arg(long, default_value = "0.0")]
    pub min_score: f64,

    /// Element budget: above it the region is shown as an overview grid
    #[arg(long, default_value_t = DEFAULT_MAX_NUM_ELE)]
    pub max_num_ele: u64,

    /// Cap on counted calls per overview cell
    #[arg(long, default_value_t = DEFAULT_GIVE_UP_FACTOR)]
    pub give_up_factor: u64,

    /// Viewport start on the from axis
    #[arg(allow_negative_numbers = true)]
    pub xs: i64,

    /// Viewport start on the to axis
    #[arg(allow_negative_numbers = true)]
    pub ys: i64,

    /// Viewport end on the from axis
    #[arg(allow_negative_numbers = true)]
    pub xe: i64,

    /// Viewport end on the to axis
    #[arg(allow_negative_numbers = true)]
    pub ye: i64,
}

impl ViewportArgs {
    #[must_use]
    pub fn to_request(&self, dataset_name: &str) -> RenderRequest {
        RenderRequest {
            region: Viewport::new(self.xs, self.ys, self.xe, self.ye),
            run_id: RunId(self.run_id),
            ground_truth_run_id: self.ground_truth_run_id.map(RunId),
            min_score: self.min_score,
            max_num_ele: self.max_num_ele,
            dataset_name: dataset_name.to_string(),
            give_up_factor: self.give_up_factor,
        }
    }
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
