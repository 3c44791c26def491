//! Stale-render suppression for one view.
//!
//! Every render submitted through a [`RenderSession`] takes a ticket from a
//! monotonically increasing generation counter. When a render finishes and a
//! newer ticket has been issued in the meantime, its result is dropped and the
//! caller gets `Ok(None)`. Renders share no mutable state, so abandoning one needs
//! no cleanup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::render::analyzer::ViewportAnalyzer;
use crate::render::config::RenderRequest;
use crate::render::model::RenderModel;
use crate::render::RenderError;
use crate::store::dataset::Dataset;

/// Generation a render was started under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderTicket(u64);

/// Render pipeline of a single view
#[derive(Debug, Clone)]
pub struct RenderSession {
    dataset: Arc<Dataset>,
    generation: Arc<AtomicU64>,
}

impl RenderSession {
    #[must_use]
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Issue a ticket, superseding every render started before it
    pub fn begin(&self) -> RenderTicket {
        RenderTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Supersede in-flight renders without starting a new one
    pub fn cancel(&self) {
        self.begin();
    }

    /// No clone of this session is held elsewhere, so no render can be in flight
    #[must_use]
    pub fn is_idle(&self) -> bool {
        Arc::strong_count(&self.generation) == 1
    }

    #[must_use]
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Render `request` on the blocking pool under `ticket`.
    ///
    /// Returns `Ok(None)` when the ticket was superseded before or while rendering.
    ///
    /// # Errors
    ///
    /// Returns the render's `RenderError`, or `RenderError::Task` if the blocking
    /// task panicked.
    pub async fn render(
        &self,
        ticket: RenderTicket,
        request: RenderRequest,
    ) -> Result<Option<RenderModel>, RenderError> {
        let dataset = Arc::clone(&self.dataset);
        let generation = Arc::clone(&self.generation);
        let outcome = tokio::task::spawn_blocking(move || {
            if generation.load(Ordering::SeqCst) != ticket.0 {
                return Ok(None);
            }
            ViewportAnalyzer::for_dataset(&dataset)
                .render(&request)
                .map(Some)
        })
        .await;

        // A superseded render is dropped whether it succeeded or not
        if !self.is_current(ticket) {
            tracing::debug!("Discarding render {} superseded by a newer request", ticket.0);
            return Ok(None);
        }
        outcome.map_err(|e| RenderError::Task(e.to_string()))?
    }

    /// Start a new render, superseding any in flight
    ///
    /// # Errors
    ///
    /// See [`RenderSession::render`].
    pub async fn submit(
        &self,
        request: RenderRequest,
    ) -> Result<Option<RenderModel>, RenderError> {
        let ticket = self.begin();
        self.render(ticket, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RunId;
    use crate::render::config::Viewport;

    const DATASET: &str = r#"{
        "version": "1.0.0",
        "name": "toy",
        "contigs": [{"name": "chr1", "sequence": "ACGTACGTACGTACGTACGT"}],
        "runs": [{"id": 1, "name": "caller"}]
    }"#;

    fn session() -> RenderSession {
        RenderSession::new(Arc::new(Dataset::from_json(DATASET).unwrap()))
    }

    fn request() -> RenderRequest {
        RenderRequest::new(Viewport::new(0, 0, 5, 5), RunId(1))
    }

    #[test]
    fn test_idle_until_cloned() {
        let session = session();
        assert!(session.is_idle());
        let in_flight = session.clone();
        assert!(!session.is_idle());
        drop(in_flight);
        assert!(session.is_idle());
    }

    #[tokio::test]
    async fn test_latest_render_is_presented() {
        let session = session();
        let model = session.submit(request()).await.unwrap();
        assert!(model.is_some());
    }

    #[tokio::test]
    async fn test_superseded_render_is_discarded() {
        let session = session();
        let stale = session.begin();
        let fresh = session.begin();
        assert!(!session.is_current(stale));

        assert!(session.render(stale, request()).await.unwrap().is_none());
        assert!(session.render(fresh, request()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cancel_drops_in_flight_render() {
        let session = session();
        let ticket = session.begin();
        session.cancel();
        assert!(session.render(ticket, request()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_superseded_failure_is_discarded() {
        let session = session();
        let stale = session.begin();
        session.begin();
        let failing = RenderRequest::new(Viewport::new(0, 0, 5, 5), RunId(9));
        assert!(session.render(stale, failing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_errors_are_reported() {
        let session = session();
        let request = RenderRequest::new(Viewport::new(0, 0, 5, 5), RunId(9));
        assert!(matches!(
            session.submit(request).await,
            Err(RenderError::NotFound(RunId(9)))
        ));
    }
}
