//! Coarse call-density grid for regions too dense to draw in detail.

use crate::core::color::light_spectrum;
use crate::core::contig::ContigLayout;
use crate::core::records::count_to_f64;
use crate::core::region::Region;
use crate::core::types::RunId;
use crate::render::config::RenderConfig;
use crate::render::model::OverviewCell;
use crate::store::{CallStore, Pack, StoreError};

/// Aggregates call counts of a padded region into grid cells
#[derive(Debug, Clone, Copy, Default)]
pub struct OverviewBinner;

/// Number of grid cells along each axis for a given element budget
#[must_use]
pub fn grid_divisor(max_num_ele: u64) -> u64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let divisor = count_to_f64(max_num_ele).sqrt().floor() as u64;
    divisor.max(1)
}

/// Split `[start, end]` (inclusive) into consecutive inclusive cells of `step` positions
fn axis_cells(start: u64, end: u64, step: u64) -> Vec<(u64, u64)> {
    let mut cells = Vec::new();
    let mut pos = start;
    loop {
        let last = pos.saturating_add(step - 1).min(end);
        cells.push((pos, last));
        if last >= end {
            break;
        }
        pos = last + 1;
    }
    cells
}

impl OverviewBinner {
    /// Count the calls of `run_id` in every cell of the grid over `padded`.
    ///
    /// Each contig pair in `padded` is tiled separately, so no cell crosses a
    /// contig boundary. Only non-empty cells are returned, colored by their count
    /// relative to the densest cell. Counts are whatever the store reports under
    /// the configured give-up factor.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a count query fails.
    pub fn bin(
        pack: &dyn Pack,
        store: &dyn CallStore,
        run_id: RunId,
        padded: &Region,
        config: &RenderConfig,
    ) -> Result<Vec<OverviewCell>, StoreError> {
        let divisor = grid_divisor(config.max_num_ele);
        let cell_w = (padded.width() / divisor).max(1);
        let cell_h = (padded.height() / divisor).max(1);

        let layout = ContigLayout::new(&pack.contig_lengths());
        let names = pack.contig_names();
        let name_of = |index: usize| names.get(index).cloned().unwrap_or_default();

        // Cells never straddle a contig boundary: each contig pair is tiled on its own
        let mut columns = Vec::new();
        for (index, first, last) in layout.spans_within(padded.xs, padded.xe) {
            columns.extend(axis_cells(first, last, cell_w).into_iter().map(|c| (index, c)));
        }
        let mut rows = Vec::new();
        for (index, first, last) in layout.spans_within(padded.ys, padded.ye) {
            rows.extend(axis_cells(first, last, cell_h).into_iter().map(|c| (index, c)));
        }
        tracing::debug!(
            "Binning {} into {}x{} cells of {}x{}",
            padded,
            columns.len(),
            rows.len(),
            cell_w,
            cell_h
        );

        let mut counted = Vec::new();
        for &(from_contig_index, (xs, xe)) in &columns {
            for &(to_contig_index, (ys, ye)) in &rows {
                let cell = Region { xs, ys, xe, ye };
                let count =
                    store.count_calls(run_id, config.min_score, &cell, config.give_up_factor)?;
                if count > 0 {
                    counted.push((cell, count, from_contig_index, to_contig_index));
                }
            }
        }

        let max_count = counted.iter().map(|(_, c, _, _)| *c).max().unwrap_or(0);
        let cells = counted
            .into_iter()
            .map(|(cell, count, from_contig_index, to_contig_index)| {
                let t = count_to_f64(count) / count_to_f64(max_count.max(1));
                OverviewCell {
                    x: cell.xs,
                    y: cell.ys,
                    w: cell.width() + 1,
                    h: cell.height() + 1,
                    count,
                    from_contig_index,
                    to_contig_index,
                    from_contig: name_of(from_contig_index),
                    to_contig: name_of(to_contig_index),
                    color: light_spectrum(t),
                }
            })
            .collect();
        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::CallRecord;
    use crate::store::memory::{InMemoryCallStore, InMemoryPack};
    use std::collections::BTreeSet;

    fn call(id: i64, x: u64, y: u64, size: u64) -> CallRecord {
        CallRecord {
            id,
            from_start: x,
            from_size: size,
            to_start: y,
            to_size: size,
            num_supp_nt: 5,
            coverage: 10,
            supporting_jump_ids: BTreeSet::new(),
        }
    }

    fn store_of(calls: Vec<CallRecord>) -> InMemoryCallStore {
        let mut store = InMemoryCallStore::new();
        store.add_run(RunId(1), "run", "");
        for c in calls {
            store.add_call(RunId(1), c).unwrap();
        }
        store
    }

    fn fixture(calls: &[(u64, u64)]) -> (InMemoryPack, InMemoryCallStore) {
        let mut pack = InMemoryPack::new();
        pack.add_contig("chr1", &[b'A'; 500]);
        pack.add_contig("chr2", &[b'C'; 500]);
        let store = store_of(
            calls
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| call(i as i64, x, y, 1))
                .collect(),
        );
        (pack, store)
    }

    fn config(max_num_ele: u64, give_up_factor: u64) -> RenderConfig {
        RenderConfig {
            max_num_ele,
            give_up_factor,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_grid_divisor() {
        assert_eq!(grid_divisor(10_000), 100);
        assert_eq!(grid_divisor(99), 9);
        assert_eq!(grid_divisor(1), 1);
    }

    #[test]
    fn test_axis_cells_partition() {
        assert_eq!(axis_cells(0, 10, 3), vec![(0, 2), (3, 5), (6, 8), (9, 10)]);
        assert_eq!(axis_cells(5, 5, 1), vec![(5, 5)]);
    }

    #[test]
    fn test_cell_counts_sum_to_total() {
        let calls = [(10, 10), (12, 15), (500, 700), (650, 900), (999, 0), (300, 300)];
        let (pack, store) = fixture(&calls);
        let padded = Region::clamp(0, 0, 1_000, 1_000, 1_000);
        let cells = OverviewBinner::bin(&pack, &store, RunId(1), &padded, &config(16, 1_000)).unwrap();

        let total: u64 = cells.iter().map(|c| c.count).sum();
        assert_eq!(total, calls.len() as u64);
        assert!(cells.iter().all(|c| c.count > 0));
    }

    #[test]
    fn test_cells_carry_contig_and_color() {
        let (pack, store) = fixture(&[(10, 10), (12, 15), (700, 20)]);
        let padded = Region::clamp(0, 0, 1_000, 1_000, 1_000);
        let cells = OverviewBinner::bin(&pack, &store, RunId(1), &padded, &config(4, 1_000)).unwrap();
        assert_eq!(cells.len(), 2);

        let dense = cells.iter().find(|c| c.count == 2).unwrap();
        assert_eq!(dense.from_contig, "chr1");
        assert_eq!(dense.color, light_spectrum(1.0));

        let sparse = cells.iter().find(|c| c.count == 1).unwrap();
        assert_eq!(sparse.from_contig_index, 1);
        assert_eq!(sparse.from_contig, "chr2");
        assert_eq!(sparse.to_contig, "chr1");
        assert_eq!(sparse.color, light_spectrum(0.5));
    }

    #[test]
    fn test_cell_sum_matches_estimate() {
        let mut pack = InMemoryPack::new();
        pack.add_contig("chr1", &[b'A'; 1_000]);
        let store = store_of(vec![
            // overlaps the region but is anchored before it
            call(1, 0, 0, 200),
            // anchored inside, reaching past the region
            call(2, 150, 150, 500),
            call(3, 120, 300, 1),
            call(4, 390, 110, 1),
        ]);
        let padded = Region::clamp(100, 100, 400, 400, 1_000);
        let cells = OverviewBinner::bin(&pack, &store, RunId(1), &padded, &config(9, 1_000)).unwrap();

        let total: u64 = cells.iter().map(|c| c.count).sum();
        let estimate = store.estimate_count(RunId(1), 0.0, &padded).unwrap();
        assert_eq!(total, 3);
        assert_eq!(total, estimate);
    }

    #[test]
    fn test_cells_stop_at_contig_boundaries() {
        let mut pack = InMemoryPack::new();
        pack.add_contig("chr1", &[b'A'; 100]);
        pack.add_contig("chr2", &[b'C'; 900]);
        let store = store_of((0..5).map(|i| call(i, 150 + i as u64, 150, 1)).collect());
        let padded = Region::clamp(0, 0, 1_000, 1_000, 1_000);
        let cells = OverviewBinner::bin(&pack, &store, RunId(1), &padded, &config(4, 1_000)).unwrap();

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].count, 5);
        assert_eq!(cells[0].from_contig_index, 1);
        assert_eq!(cells[0].from_contig, "chr2");
        assert_eq!(cells[0].to_contig, "chr2");
        assert_eq!((cells[0].x, cells[0].y), (100, 100));
        for cell in &cells {
            assert!(cell.x >= 100 || cell.x + cell.w <= 100);
            assert!(cell.y >= 100 || cell.y + cell.h <= 100);
        }
    }

    #[test]
    fn test_counts_monotonic_in_give_up_factor() {
        let calls: Vec<(u64, u64)> = (0..20).map(|i| (i, i)).collect();
        let (pack, store) = fixture(&calls);
        let padded = Region::clamp(0, 0, 100, 100, 1_000);

        let mut previous = 0;
        for give_up in [1, 2, 5, 10, 1_000] {
            let cells =
                OverviewBinner::bin(&pack, &store, RunId(1), &padded, &config(1, give_up)).unwrap();
            let total: u64 = cells.iter().map(|c| c.count).sum();
            assert!(total >= previous);
            previous = total;
        }
        assert_eq!(previous, 20);
    }

    #[test]
    fn test_unknown_run_fails() {
        let (pack, store) = fixture(&[]);
        let padded = Region::clamp(0, 0, 10, 10, 1_000);
        assert!(OverviewBinner::bin(&pack, &store, RunId(9), &padded, &config(4, 10)).is_err());
    }
}
