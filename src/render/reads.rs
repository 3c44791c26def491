//! Lane layout of the seeds of every read behind the visible jumps.
//!
//! Each read is re-seeded through the [`Seeder`] and its seeds are packed into
//! display lanes so that no two seeds sharing a lane overlap on the reference.
//! Packing is greedy first-fit over seeds sorted by reference start, which uses
//! exactly as many lanes as there are seeds overlapping at the busiest point.
//!
//! Reads are placed side by side in descending read id order, each read taking
//! one display column per lane followed by `lane_gap` blank columns.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::core::color::strand_color;
use crate::core::records::count_to_f64;
use crate::core::seed::{to_signed, Seed};
use crate::core::types::{ReadId, SeedId};
use crate::render::config::RenderConfig;
use crate::render::model::{ReadLanes, ReadLayout, SeedGlyph};
use crate::store::{CallStore, Seeder, StoreError};

/// Reference positions kept free after a seed before the next seed may share its lane
const LANE_SPACING: i64 = 3;

/// Half-open reference interval a seed occupies in its lane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedInterval {
    pub start: i64,
    pub end: i64,
}

impl SeedInterval {
    #[must_use]
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn overlaps(&self, other: &SeedInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Lane assignment for a list of intervals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanePacking {
    /// Lane of every interval, in input order
    pub lanes: Vec<usize>,
    /// Final `occupied_until` of every lane
    pub lane_ends: Vec<i64>,
}

impl LanePacking {
    #[must_use]
    pub fn num_lanes(&self) -> usize {
        self.lane_ends.len()
    }
}

/// Reference interval of `seed` including lane spacing.
///
/// Forward seeds cover `[start_ref, start_ref + size + 3)`, reverse seeds
/// extend leftwards: `[start_ref - size, start_ref + 3)`.
#[must_use]
pub fn reference_interval(seed: &Seed) -> SeedInterval {
    let start_ref = to_signed(seed.start_ref);
    let size = to_signed(seed.size);
    if seed.on_forward_strand {
        SeedInterval::new(start_ref, start_ref + size + LANE_SPACING)
    } else {
        SeedInterval::new(start_ref - size, start_ref + LANE_SPACING)
    }
}

/// Greedy lane assignment.
///
/// Intervals are visited by ascending start (ties keep input order); each goes
/// into the first lane whose `occupied_until <= start`, or a new lane.
#[must_use]
pub fn pack_lanes(intervals: &[SeedInterval]) -> LanePacking {
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    order.sort_by_key(|&i| intervals[i].start);

    let mut lanes = vec![0; intervals.len()];
    let mut lane_ends: Vec<i64> = Vec::new();
    for i in order {
        let interval = intervals[i];
        let lane = match lane_ends.iter().position(|&end| end <= interval.start) {
            Some(lane) => lane,
            None => {
                lane_ends.push(interval.start);
                lane_ends.len() - 1
            }
        };
        lane_ends[lane] = interval.end;
        lanes[i] = lane;
    }
    LanePacking { lanes, lane_ends }
}

#[allow(clippy::cast_precision_loss)]
fn signed_to_f64(value: i64) -> f64 {
    value as f64
}

/// Seeds of one read in read-space order
struct SeededRead {
    read_id: ReadId,
    seeds: Vec<Seed>,
}

fn seed_read(
    store: &dyn CallStore,
    seeder: &dyn Seeder,
    read_id: ReadId,
) -> Result<SeededRead, StoreError> {
    let read = store.get_read(read_id)?;
    let mut seeds = seeder.seed(&read)?;
    seeds.sort_by_key(|s| s.start);
    Ok(SeededRead { read_id, seeds })
}

fn glyph(read_id: ReadId, index: usize, seed: &Seed, lane: usize, column: usize) -> SeedGlyph {
    let start_ref = to_signed(seed.start_ref);
    let size = to_signed(seed.size);
    let ref_segment = if seed.on_forward_strand {
        (start_ref, start_ref + size)
    } else {
        (start_ref + 1, start_ref - size + 1)
    };
    SeedGlyph {
        id: SeedId::new(read_id, index),
        read_id,
        lane,
        column,
        layer: seed.layer,
        on_forward_strand: seed.on_forward_strand,
        color: strand_color(seed.on_forward_strand),
        start: seed.start,
        size: seed.size,
        start_ref: seed.start_ref,
        ref_interval: {
            let interval = reference_interval(seed);
            (interval.start, interval.end)
        },
        ref_first: seed.ref_first(),
        ref_last: seed.ref_last(),
        center: signed_to_f64(seed.ref_first()) + count_to_f64(seed.size) / 2.0,
        ref_segment,
        read_segment: (seed.start, seed.start + seed.size),
    }
}

/// Packs the seeds of a set of reads into display columns
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadLayoutPacker;

impl ReadLayoutPacker {
    /// Lay out the seeds of `read_ids`.
    ///
    /// Returns `Ok(None)` when the layout would exceed the element budget, either
    /// because there are more reads than `max_num_ele` or because the reads carry
    /// more seeds than that. Reads are fetched and seeded in parallel.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if a read cannot be fetched or seeded.
    pub fn layout(
        store: &dyn CallStore,
        seeder: &dyn Seeder,
        read_ids: &BTreeSet<ReadId>,
        config: &RenderConfig,
    ) -> Result<Option<ReadLayout>, StoreError> {
        if !config.within_budget(read_ids.len() as u64) {
            tracing::warn!(
                "Skipping read layout: {} reads exceed the budget of {}",
                read_ids.len(),
                config.max_num_ele
            );
            return Ok(None);
        }

        let ordered: Vec<ReadId> = read_ids.iter().rev().copied().collect();
        let seeded = ordered
            .par_iter()
            .map(|&read_id| seed_read(store, seeder, read_id))
            .collect::<Result<Vec<_>, _>>()?;

        let num_seeds: usize = seeded.iter().map(|r| r.seeds.len()).sum();
        if !config.within_budget(num_seeds as u64) {
            tracing::warn!(
                "Skipping read layout: {} seeds exceed the budget of {}",
                num_seeds,
                config.max_num_ele
            );
            return Ok(None);
        }

        let mut layout = ReadLayout::default();
        for read in seeded {
            let intervals: Vec<SeedInterval> =
                read.seeds.iter().map(reference_interval).collect();
            let packing = pack_lanes(&intervals);
            let first_column = layout.column_labels.len();

            for (index, seed) in read.seeds.iter().enumerate() {
                let lane = packing.lanes[index];
                layout
                    .seeds
                    .push(glyph(read.read_id, index, seed, lane, first_column + lane));
            }

            if packing.num_lanes() > 0 {
                layout.read_ticks.push(first_column);
                for lane in 0..packing.num_lanes() {
                    layout.lane_ticks.push(first_column + lane);
                    layout.column_labels.push(Some(read.read_id));
                }
                layout
                    .column_labels
                    .extend(std::iter::repeat(None).take(config.lane_gap));
            }

            layout.reads.push(ReadLanes {
                read_id: read.read_id,
                first_column,
                num_lanes: packing.num_lanes(),
                lane_ends: packing.lane_ends,
            });
        }

        tracing::debug!(
            "Laid out {} seeds of {} reads in {} columns",
            layout.seeds.len(),
            layout.reads.len(),
            layout.column_labels.len()
        );
        Ok(Some(layout))
    }
}
