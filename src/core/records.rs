//! Breakpoint evidence ("jumps") and the SV calls aggregated from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::region::Region;
use crate::core::types::{CallShape, JumpCategory, JumpId, ReadId};

/// Helper function to convert a count to f64 with explicit precision loss allowance
#[inline]
pub(crate) fn count_to_f64(count: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Support ratio `num_supp_nt / coverage`, absent when there is no coverage
#[must_use]
pub fn support_score(num_supp_nt: u64, coverage: u64) -> Option<f64> {
    if coverage == 0 {
        None
    } else {
        Some(count_to_f64(num_supp_nt) / count_to_f64(coverage))
    }
}

/// Whether a record passes the `num_supp_nt > min_score * coverage` filter
#[must_use]
pub fn passes_min_score(num_supp_nt: u64, coverage: u64, min_score: f64) -> bool {
    count_to_f64(num_supp_nt) > min_score * count_to_f64(coverage)
}

/// A single piece of breakpoint evidence: one alignment discontinuity within one read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jump {
    pub id: JumpId,

    /// Breakpoint anchor on the from axis
    pub from_pos: u64,

    /// Breakpoint anchor on the to axis
    pub to_pos: u64,

    pub from_start: u64,
    pub from_size: u64,
    pub to_start: u64,
    pub to_size: u64,

    /// Number of read bases supporting this jump
    pub num_supp_nt: u64,

    #[serde(default)]
    pub coverage: u64,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub supporting_jump_ids: BTreeSet<JumpId>,

    pub read_id: ReadId,

    /// Distance between the two breakpoint ends on the read
    #[serde(default)]
    pub query_distance: u64,

    #[serde(default)]
    pub switch_strand_known: bool,
    #[serde(default)]
    pub does_switch_strand: bool,
    #[serde(default)]
    pub from_known: bool,
    #[serde(default)]
    pub to_known: bool,
    #[serde(default)]
    pub from_fuzziness_is_rightwards: bool,
    #[serde(default)]
    pub to_fuzziness_is_downwards: bool,
}

impl Jump {
    /// Sweep order key: the lower of the two interval starts
    #[must_use]
    pub fn sort_start(&self) -> u64 {
        self.from_start.min(self.to_start)
    }

    #[must_use]
    pub fn score(&self) -> Option<f64> {
        support_score(self.num_supp_nt, self.coverage)
    }

    /// Classify into exactly one display category, first matching rule wins
    #[must_use]
    pub fn category(&self) -> JumpCategory {
        match (self.switch_strand_known, self.does_switch_strand, self.from_known) {
            (true, true, _) => JumpCategory::StrandSwitch,
            (true, false, _) => JumpCategory::SameStrand,
            (false, _, true) => JumpCategory::FromOnly,
            (false, _, false) => JumpCategory::NeitherKnown,
        }
    }

    /// Anchors used for the fuzziness marker; an unknown endpoint collapses onto the known one
    #[must_use]
    pub fn fuzziness_anchor(&self) -> (u64, u64) {
        let f = if self.from_known {
            self.from_pos
        } else {
            self.to_pos
        };
        let t = if self.to_known { self.to_pos } else { f };
        (f, t)
    }
}

/// An SV call: one or more jumps aggregated into a scored breakpoint rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: i64,
    pub from_start: u64,
    pub from_size: u64,
    pub to_start: u64,
    pub to_size: u64,
    pub num_supp_nt: u64,
    pub coverage: u64,
    #[serde(default)]
    pub supporting_jump_ids: BTreeSet<JumpId>,
}

impl CallRecord {
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        support_score(self.num_supp_nt, self.coverage)
    }

    /// Unit size on both axes is a point call, anything larger a box
    #[must_use]
    pub fn shape(&self) -> CallShape {
        if self.from_size == 1 && self.to_size == 1 {
            CallShape::Point
        } else {
            CallShape::Box
        }
    }

    #[must_use]
    pub fn passes(&self, min_score: f64) -> bool {
        passes_min_score(self.num_supp_nt, self.coverage, min_score)
    }

    /// Whether the call's anchor `(from_start, to_start)` lies inside `region`.
    /// Calls are counted by anchor, so every call lands in exactly one grid cell.
    #[must_use]
    pub fn anchored_in(&self, region: &Region) -> bool {
        region.contains_point(self.from_start, self.to_start)
    }
}
