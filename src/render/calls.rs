//! Accepted and ground-truth SV calls intersecting the padded region.

use crate::core::color::palette;
use crate::core::records::{count_to_f64, CallRecord};
use crate::core::region::Region;
use crate::core::types::{CallShape, RunId};
use crate::render::config::RenderConfig;
use crate::render::model::{AcceptedCalls, CallBox, CallMarker, GroundTruthCalls};
use crate::store::{CallStore, StoreError};

/// Streams call records and turns them into markers and boxes
#[derive(Debug, Clone, Copy, Default)]
pub struct CallFetcher;

/// Marker at `(x, y)` carrying the call's support figures
fn marker_at(call: &CallRecord, x: f64, y: f64) -> CallMarker {
    CallMarker {
        call_id: call.id,
        shape: call.shape(),
        x,
        y,
        num_supp_nt: call.num_supp_nt,
        coverage: call.coverage,
        num_supporting_jumps: call.supporting_jump_ids.len(),
        score: call.score(),
    }
}

/// Marker at the center of the call's rectangle
fn centered_marker(call: &CallRecord) -> CallMarker {
    marker_at(
        call,
        count_to_f64(call.from_start) + count_to_f64(call.from_size) / 2.0,
        count_to_f64(call.to_start) + count_to_f64(call.to_size) / 2.0,
    )
}

/// Accepted point calls sit on their anchor, boxes get a centered marker
fn accepted_marker(call: &CallRecord) -> CallMarker {
    match call.shape() {
        CallShape::Point => marker_at(
            call,
            count_to_f64(call.from_start),
            count_to_f64(call.to_start),
        ),
        CallShape::Box => centered_marker(call),
    }
}

fn call_box(call: &CallRecord) -> CallBox {
    CallBox {
        call_id: call.id,
        left: count_to_f64(call.from_start) - 0.5,
        bottom: count_to_f64(call.to_start) - 0.5,
        right: count_to_f64(call.from_start.saturating_add(call.from_size)) + 1.0,
        top: count_to_f64(call.to_start.saturating_add(call.to_size)) + 1.0,
        num_supp_nt: call.num_supp_nt,
        coverage: call.coverage,
        num_supporting_jumps: call.supporting_jump_ids.len(),
        score: call.score(),
    }
}

fn element_limit(config: &RenderConfig) -> usize {
    usize::try_from(config.max_num_ele).unwrap_or(usize::MAX)
}

impl CallFetcher {
    /// Calls of `run_id` in `padded` passing the score filter.
    ///
    /// Point calls become a marker on their anchor; larger calls become a box plus
    /// a marker at its center. At most `max_num_ele` calls are kept, in store order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the run does not exist or the stream fails.
    pub fn fetch_accepted(
        store: &dyn CallStore,
        run_id: RunId,
        padded: &Region,
        config: &RenderConfig,
    ) -> Result<AcceptedCalls, StoreError> {
        let mut calls = AcceptedCalls {
            color: Some(palette::ACCEPTED_CALL),
            ..AcceptedCalls::default()
        };
        for call in store
            .stream_calls(run_id, padded, config.min_score)?
            .take(element_limit(config))
        {
            let call = call?;
            if call.shape() == CallShape::Box {
                calls.boxes.push(call_box(&call));
            }
            calls.markers.push(accepted_marker(&call));
        }
        tracing::debug!(
            "Fetched {} accepted calls ({} boxes) for run {}",
            calls.markers.len(),
            calls.boxes.len(),
            run_id
        );
        Ok(calls)
    }

    /// Ground-truth calls of `run_id` in `padded`.
    ///
    /// Ground truth is expected to be point calls. Larger records are logged and
    /// listed in `anomalies` but get no marker. A run that does not exist yields
    /// an empty result.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store fails.
    pub fn fetch_ground_truth(
        store: &dyn CallStore,
        run_id: RunId,
        padded: &Region,
        config: &RenderConfig,
    ) -> Result<GroundTruthCalls, StoreError> {
        if !store.run_exists(run_id)? {
            tracing::warn!("Ground-truth run {} not found, showing no ground truth", run_id);
            return Ok(GroundTruthCalls::default());
        }

        let mut calls = GroundTruthCalls {
            color: Some(palette::GROUND_TRUTH_CALL),
            ..GroundTruthCalls::default()
        };
        for call in store
            .stream_calls(run_id, padded, config.min_score)?
            .take(element_limit(config))
        {
            let call = call?;
            match call.shape() {
                CallShape::Point => calls.markers.push(centered_marker(&call)),
                CallShape::Box => {
                    tracing::warn!(
                        "Ground-truth call {} has size {}x{}, expected 1x1",
                        call.id,
                        call.from_size,
                        call.to_size
                    );
                    calls.anomalies.push(call.id);
                }
            }
        }
        Ok(calls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryCallStore;
    use std::collections::BTreeSet;

    fn call(id: i64, from_start: u64, from_size: u64, to_start: u64, to_size: u64) -> CallRecord {
        CallRecord {
            id,
            from_start,
            from_size,
            to_start,
            to_size,
            num_supp_nt: 6,
            coverage: 10,
            supporting_jump_ids: BTreeSet::new(),
        }
    }

    fn store_with(run_id: RunId, calls: Vec<CallRecord>) -> InMemoryCallStore {
        let mut store = InMemoryCallStore::new();
        store.add_run(run_id, "run", "");
        for c in calls {
            store.add_call(run_id, c).unwrap();
        }
        store
    }

    #[test]
    fn test_points_and_boxes() {
        let store = store_with(
            RunId(1),
            vec![call(1, 10, 1, 20, 1), call(2, 30, 10, 40, 4)],
        );
        let padded = Region::clamp(0, 0, 100, 100, 100);
        let calls =
            CallFetcher::fetch_accepted(&store, RunId(1), &padded, &RenderConfig::default())
                .unwrap();

        assert_eq!(calls.markers.len(), 2);
        assert_eq!(calls.boxes.len(), 1);
        assert_eq!(calls.markers[0].shape, CallShape::Point);
        assert_eq!(calls.markers[0].score, Some(0.6));
        assert_eq!((calls.markers[0].x, calls.markers[0].y), (10.0, 20.0));

        let b = &calls.boxes[0];
        assert_eq!((b.left, b.right), (29.5, 41.0));
        assert_eq!((b.bottom, b.top), (39.5, 45.0));
        // marker sits at the box center
        assert_eq!((calls.markers[1].x, calls.markers[1].y), (35.0, 42.0));
    }

    #[test]
    fn test_min_score_filter() {
        let store = store_with(RunId(1), vec![call(1, 10, 1, 20, 1)]);
        let padded = Region::clamp(0, 0, 100, 100, 100);
        let config = RenderConfig {
            min_score: 0.6,
            ..RenderConfig::default()
        };
        let calls = CallFetcher::fetch_accepted(&store, RunId(1), &padded, &config).unwrap();
        assert!(calls.markers.is_empty());
    }

    #[test]
    fn test_zero_coverage_has_no_score() {
        let mut c = call(1, 10, 1, 20, 1);
        c.coverage = 0;
        let store = store_with(RunId(1), vec![c]);
        let padded = Region::clamp(0, 0, 100, 100, 100);
        let calls =
            CallFetcher::fetch_accepted(&store, RunId(1), &padded, &RenderConfig::default())
                .unwrap();
        assert_eq!(calls.markers[0].score, None);
    }

    #[test]
    fn test_ground_truth_anomalies_are_counted_not_drawn() {
        let store = store_with(
            RunId(2),
            vec![call(1, 10, 1, 20, 1), call(2, 30, 3, 40, 1), call(3, 50, 1, 60, 1)],
        );
        let padded = Region::clamp(0, 0, 100, 100, 100);
        let truth =
            CallFetcher::fetch_ground_truth(&store, RunId(2), &padded, &RenderConfig::default())
                .unwrap();
        assert_eq!(truth.markers.len(), 2);
        assert_eq!(truth.anomalies, vec![2]);
        // ground truth points are drawn at the center of their unit cell
        assert_eq!((truth.markers[0].x, truth.markers[0].y), (10.5, 20.5));
    }

    #[test]
    fn test_box_at_end_of_coordinate_space_does_not_overflow() {
        let b = call_box(&call(1, u64::MAX - 1, 5, u64::MAX - 1, 5));
        assert!(b.right.is_finite() && b.top.is_finite());
        assert!(b.right >= b.left && b.top >= b.bottom);
    }

    #[test]
    fn test_missing_ground_truth_run_is_empty() {
        let store = store_with(RunId(1), vec![]);
        let padded = Region::clamp(0, 0, 100, 100, 100);
        let truth =
            CallFetcher::fetch_ground_truth(&store, RunId(5), &padded, &RenderConfig::default())
                .unwrap();
        assert!(truth.markers.is_empty());
        assert!(truth.color.is_none());
    }
}
