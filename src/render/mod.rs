//! The adaptive level-of-detail render engine.
//!
//! A render takes a [`RenderRequest`] (viewport, run, thresholds) and produces an
//! immutable [`RenderModel`]. [`ViewportAnalyzer`] estimates how many calls fall in
//! the padded viewport and routes to one of two paths:
//!
//! - **Overview**: [`OverviewBinner`] aggregates call counts into a colored grid
//! - **Detail**: [`CallFetcher`], [`JumpSweeper`], [`ReadLayoutPacker`] and
//!   [`SequenceTrackBuilder`] run concurrently and fill one field each
//!
//! [`InteractionLinker`] is applied afterwards, on demand, to correlate a
//! selected jump or seed with the rest of a detail render.
//! [`RenderSession`] drops renders that were superseded by a newer request.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sv_view::core::types::RunId;
//! use sv_view::render::{RenderRequest, ViewportAnalyzer, Viewport};
//! use sv_view::store::dataset::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_file(Path::new("dataset.json")).unwrap();
//! let analyzer = ViewportAnalyzer::for_dataset(&dataset);
//! let request = RenderRequest::new(Viewport::new(0, 0, 50_000, 50_000), RunId(1));
//! let model = analyzer.render(&request).unwrap();
//! println!("{:?}", model.mode());
//! ```

use thiserror::Error;

use crate::core::types::RunId;
use crate::store::StoreError;
use crate::utils::validation::ValidationError;

pub mod analyzer;
pub mod calls;
pub mod config;
pub mod jumps;
pub mod linker;
pub mod model;
pub mod overview;
pub mod reads;
pub mod sequence;
pub mod session;

pub use analyzer::ViewportAnalyzer;
pub use calls::CallFetcher;
pub use config::{RenderConfig, RenderRequest, Viewport};
pub use jumps::JumpSweeper;
pub use linker::{HighlightMap, InteractionLinker, Selection};
pub use model::{RenderMode, RenderModel};
pub use overview::OverviewBinner;
pub use reads::ReadLayoutPacker;
pub use sequence::SequenceTrackBuilder;
pub use session::RenderSession;

#[derive(Error, Debug)]
pub enum RenderError {
    /// The requested run does not exist; the view should be rendered empty
    #[error("Run {0} not found")]
    NotFound(RunId),

    #[error("Invalid render request: {0}")]
    InvalidRequest(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Render task failed: {0}")]
    Task(String),
}

impl From<ValidationError> for RenderError {
    fn from(e: ValidationError) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}
