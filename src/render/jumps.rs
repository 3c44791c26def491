//! Ordered sweep over the jumps of a region: classification, quad geometry and
//! fuzziness markers.

use std::collections::BTreeSet;

use crate::core::color::category_color;
use crate::core::records::{count_to_f64, Jump};
use crate::core::region::Region;
use crate::core::types::{ReadId, RunId};
use crate::render::model::{JumpLayer, JumpQuad, PolygonBatch};
use crate::store::{CallStore, StoreError};

/// Supporting bases at which a jump quad reaches full opacity
const FULL_ALPHA_SUPPORT: f64 = 1000.0;

/// Streams jumps in sweep order and geometrizes them
#[derive(Debug, Clone, Copy, Default)]
pub struct JumpSweeper;

/// Quad extent `(left, bottom, right, top)` centered on integer coordinates
#[must_use]
pub fn quad_bounds(jump: &Jump) -> (f64, f64, f64, f64) {
    (
        count_to_f64(jump.from_start) - 0.5,
        count_to_f64(jump.to_start) - 0.5,
        count_to_f64(jump.from_start.saturating_add(jump.from_size)) + 1.0,
        count_to_f64(jump.to_start.saturating_add(jump.to_size)) + 1.0,
    )
}

/// Corner points of the fuzziness triangle of `jump`.
///
/// The triangle points away from the breakpoint in the direction the breakpoint
/// may be off: rightwards on the from axis and/or downwards on the to axis.
#[must_use]
pub fn fuzziness_triangle(jump: &Jump) -> ([f64; 3], [f64; 3]) {
    let (f, t) = jump.fuzziness_anchor();
    let (f, t) = (count_to_f64(f), count_to_f64(t));
    let xs = if jump.from_fuzziness_is_rightwards {
        [f + 2.5, f - 0.5, f - 0.5]
    } else {
        [f - 2.5, f + 0.5, f + 0.5]
    };
    let ys = if jump.to_fuzziness_is_downwards {
        [t + 0.5, t - 2.5, t + 0.5]
    } else {
        [t - 0.5, t + 2.5, t - 0.5]
    };
    (xs, ys)
}

fn quad(jump: &Jump) -> JumpQuad {
    let (left, bottom, right, top) = quad_bounds(jump);
    let category = jump.category();
    JumpQuad {
        id: jump.id,
        read_id: jump.read_id,
        category,
        color: category_color(category),
        left,
        bottom,
        right,
        top,
        from_pos: jump.from_pos,
        to_pos: jump.to_pos,
        sort_start: jump.sort_start(),
        num_supp_nt: jump.num_supp_nt,
        query_distance: jump.query_distance,
        alpha: (count_to_f64(jump.num_supp_nt) / FULL_ALPHA_SUPPORT).min(1.0),
        score: jump.score(),
    }
}

impl JumpSweeper {
    /// Sweep all jumps of `run_id` inside `padded`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the stream fails, or `StoreError::Unordered` if the
    /// store hands out jumps out of sort-start order.
    pub fn sweep(
        store: &dyn CallStore,
        run_id: RunId,
        padded: &Region,
    ) -> Result<JumpLayer, StoreError> {
        let mut layer = JumpLayer {
            swept: true,
            ..JumpLayer::default()
        };
        let mut previous: Option<u64> = None;
        for jump in store.stream_jumps(run_id, padded)? {
            let jump = jump?;
            let current = jump.sort_start();
            if let Some(previous) = previous.filter(|p| *p > current) {
                return Err(StoreError::Unordered { previous, current });
            }
            previous = Some(current);

            let (xs, ys) = fuzziness_triangle(&jump);
            layer.fuzziness.push_shape(&xs, &ys);
            layer.quads.push(quad(&jump));
        }
        tracing::debug!(
            "Swept {} jumps of run {} in {}",
            layer.quads.len(),
            run_id,
            padded
        );
        Ok(layer)
    }

    /// A layer for a region whose jumps were not swept
    #[must_use]
    pub fn skipped() -> JumpLayer {
        JumpLayer {
            quads: Vec::new(),
            fuzziness: PolygonBatch::default(),
            swept: false,
        }
    }
}

impl JumpLayer {
    /// Distinct reads behind the swept jumps
    #[must_use]
    pub fn read_ids(&self) -> BTreeSet<ReadId> {
        self.quads.iter().map(|q| q.read_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::tests::make_jump;
    use crate::core::types::JumpCategory;
    use crate::store::memory::InMemoryCallStore;
    use crate::store::RecordStream;

    #[test]
    fn test_quad_bounds() {
        let mut jump = make_jump(1, 10, 20);
        jump.from_size = 3;
        assert_eq!(quad_bounds(&jump), (9.5, 19.5, 14.0, 22.0));
    }

    #[test]
    fn test_quad_bounds_at_end_of_coordinate_space() {
        let mut jump = make_jump(1, 0, 0);
        jump.from_start = u64::MAX - 1;
        jump.from_size = 5;
        jump.to_start = u64::MAX;
        jump.to_size = 5;
        let (left, bottom, right, top) = quad_bounds(&jump);
        assert!(right.is_finite() && top.is_finite());
        assert!(right >= left && top >= bottom);
    }

    #[test]
    fn test_fuzziness_left_down() {
        let mut jump = make_jump(1, 100, 200);
        jump.from_fuzziness_is_rightwards = false;
        jump.to_fuzziness_is_downwards = true;
        let (xs, ys) = fuzziness_triangle(&jump);
        assert_eq!(xs, [97.5, 100.5, 100.5]);
        assert_eq!(ys, [200.5, 197.5, 200.5]);
    }

    #[test]
    fn test_fuzziness_all_orientations() {
        let cases = [
            (false, false, [97.5, 100.5, 100.5], [199.5, 202.5, 199.5]),
            (false, true, [97.5, 100.5, 100.5], [200.5, 197.5, 200.5]),
            (true, false, [102.5, 99.5, 99.5], [199.5, 202.5, 199.5]),
            (true, true, [102.5, 99.5, 99.5], [200.5, 197.5, 200.5]),
        ];
        for (rightwards, downwards, xs, ys) in cases {
            let mut jump = make_jump(1, 100, 200);
            jump.from_fuzziness_is_rightwards = rightwards;
            jump.to_fuzziness_is_downwards = downwards;
            assert_eq!(fuzziness_triangle(&jump), (xs, ys));
        }
    }

    #[test]
    fn test_fuzziness_unknown_from_uses_to() {
        let mut jump = make_jump(1, 100, 200);
        jump.from_known = false;
        let (xs, ys) = fuzziness_triangle(&jump);
        assert_eq!(xs, [197.5, 200.5, 200.5]);
        assert_eq!(ys, [199.5, 202.5, 199.5]);
    }

    #[test]
    fn test_sweep_is_sorted_and_classified() {
        let mut store = InMemoryCallStore::new();
        store.add_run(RunId(1), "run", "");
        for (id, pos) in [(1, 40), (2, 10), (3, 25)] {
            let mut jump = make_jump(id, pos, pos + 100);
            jump.num_supp_nt = 2_000;
            store.add_jump(RunId(1), jump).unwrap();
        }
        let padded = Region::clamp(0, 0, 500, 500, 500);
        let layer = JumpSweeper::sweep(&store, RunId(1), &padded).unwrap();

        assert!(layer.swept);
        let starts: Vec<u64> = layer.quads.iter().map(|q| q.sort_start).collect();
        assert!(starts.windows(2).all(|w| w[0] <= w[1]));
        assert!(layer.quads.iter().all(|q| q.category == JumpCategory::SameStrand));
        assert!(layer.quads.iter().all(|q| q.alpha == 1.0));
        assert_eq!(layer.fuzziness.num_shapes(), 3);
        assert_eq!(layer.read_ids().len(), 1);
    }

    struct ShuffledStore(InMemoryCallStore);

    impl CallStore for ShuffledStore {
        fn run_exists(&self, run_id: RunId) -> Result<bool, StoreError> {
            self.0.run_exists(run_id)
        }
        fn runs(&self) -> Result<Vec<crate::store::RunInfo>, StoreError> {
            self.0.runs()
        }
        fn estimate_count(&self, r: RunId, s: f64, g: &Region) -> Result<u64, StoreError> {
            self.0.estimate_count(r, s, g)
        }
        fn count_calls(&self, r: RunId, s: f64, c: &Region, f: u64) -> Result<u64, StoreError> {
            self.0.count_calls(r, s, c, f)
        }
        fn count_jumps(&self, r: RunId, g: &Region) -> Result<u64, StoreError> {
            self.0.count_jumps(r, g)
        }
        fn stream_calls<'a>(
            &'a self,
            r: RunId,
            g: &Region,
            s: f64,
        ) -> Result<RecordStream<'a, crate::core::records::CallRecord>, StoreError> {
            self.0.stream_calls(r, g, s)
        }
        fn stream_jumps<'a>(
            &'a self,
            r: RunId,
            g: &Region,
        ) -> Result<RecordStream<'a, Jump>, StoreError> {
            let mut jumps: Vec<_> = self.0.stream_jumps(r, g)?.collect();
            jumps.reverse();
            Ok(Box::new(jumps.into_iter()))
        }
        fn get_read(&self, id: ReadId) -> Result<crate::core::seed::Read, StoreError> {
            self.0.get_read(id)
        }
    }

    #[test]
    fn test_out_of_order_stream_fails() {
        let mut inner = InMemoryCallStore::new();
        inner.add_run(RunId(1), "run", "");
        inner.add_jump(RunId(1), make_jump(1, 10, 20)).unwrap();
        inner.add_jump(RunId(1), make_jump(2, 30, 40)).unwrap();
        let store = ShuffledStore(inner);
        let padded = Region::clamp(0, 0, 100, 100, 100);
        assert!(matches!(
            JumpSweeper::sweep(&store, RunId(1), &padded),
            Err(StoreError::Unordered {
                previous: 30,
                current: 10
            })
        ));
    }

    #[test]
    fn test_skipped_layer_is_empty() {
        let layer = JumpSweeper::skipped();
        assert!(!layer.swept);
        assert!(layer.quads.is_empty());
        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["swept"], false);
    }
}
