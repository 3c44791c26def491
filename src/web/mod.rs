//! HTTP transport for the render engine.
//!
//! This module serves render models and highlight mappings as JSON using Axum.
//! A presentation layer posts viewport changes and selections and draws the result.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! sv-view serve --dataset toy.json
//!
//! # Custom port and auto-open browser
//! sv-view serve --dataset toy.json --port 3000 --open
//!
//! # Bind to all interfaces
//! sv-view serve --dataset toy.json --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `POST /api/render` - Render a viewport (`RenderRequest` JSON, optional `view_id`)
//! - `POST /api/highlight` - Render a viewport and link a `selection`
//! - `GET /api/runs` - List the runs of the served dataset
//!
//! A missing run answers 404 with `error_type` `run_not_found`; the client shows an
//! empty view. A render superseded by a newer request of the same view answers 409.

pub mod server;
