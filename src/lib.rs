//! # sv-view
//!
//! An adaptive level-of-detail render engine for browsing structural-variant breakpoints.
//!
//! A breakpoint joins two positions of the reference, so the browsed space is a plane:
//! the x axis is the "from" position and the y axis the "to" position. A viewport is a
//! rectangle of that plane. Depending on how much falls inside it, `sv-view` produces
//! one of two render models:
//!
//! - **Overview**: a grid of SV-call counts, colored by density
//! - **Detail**: classified jumps, accepted and ground-truth calls, the seeds of the
//!   supporting reads packed into lanes, and the reference bases along both axes
//!
//! Render models are plain data. Drawing them is left to a frontend, fed either
//! by the CLI (`--format json`) or by the HTTP service.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sv_view::{Dataset, InteractionLinker, RenderRequest, RunId, Selection, Viewport};
//! use sv_view::{JumpId, ViewportAnalyzer};
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_file(Path::new("dataset.json")).unwrap();
//! let request = RenderRequest::new(Viewport::new(0, 0, 20_000, 20_000), RunId(1));
//! let model = ViewportAnalyzer::for_dataset(&dataset).render(&request).unwrap();
//!
//! let selection = Selection::Jump { id: JumpId(17) };
//! let highlights = InteractionLinker::highlight(&model, &selection);
//! println!("{} seeds support jump 17", highlights.highlighted_seeds().len());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Regions, records, seeds, contigs and colors
//! - [`store`]: Contracts of the pack, call store and seeder, plus in-memory backends
//! - [`render`]: The analyzer and its overview and detail builders
//! - [`parsing`]: FASTA loading into a pack
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: HTTP render service

pub mod cli;
pub mod core;
pub mod parsing;
pub mod render;
pub mod store;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use core::region::Region;
pub use core::types::*;
pub use render::{
    InteractionLinker, RenderConfig, RenderError, RenderMode, RenderModel, RenderRequest,
    RenderSession, Selection, Viewport, ViewportAnalyzer,
};
pub use store::dataset::Dataset;
