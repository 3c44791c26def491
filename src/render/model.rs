//! The per-render output handed to the presentation layer.
//!
//! Everything here is immutable once a render completes. Interaction produces a
//! separate [`HighlightMap`](crate::render::linker::HighlightMap) rather than
//! mutating these structures.

use serde::Serialize;

use crate::core::color::Rgb;
use crate::core::region::Region;
use crate::core::types::{CallShape, JumpCategory, JumpId, ReadId, SeedId};

/// Which of the two render paths a request takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    Overview,
    Detail,
}

/// Result of one render
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RenderModel {
    Overview(OverviewView),
    Detail(DetailView),
}

impl RenderModel {
    #[must_use]
    pub fn mode(&self) -> RenderMode {
        match self {
            Self::Overview(_) => RenderMode::Overview,
            Self::Detail(_) => RenderMode::Detail,
        }
    }

    #[must_use]
    pub fn frame(&self) -> &Frame {
        match self {
            Self::Overview(view) => &view.frame,
            Self::Detail(view) => &view.frame,
        }
    }

    #[must_use]
    pub fn as_detail(&self) -> Option<&DetailView> {
        match self {
            Self::Detail(view) => Some(view),
            Self::Overview(_) => None,
        }
    }
}

/// Viewport geometry shared by both modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub total_size: u64,
    /// The clamped viewport
    pub region: Region,
    /// The clamped viewport expanded by its own extent on every side
    pub padded: Region,
    /// End points of the reference diagonal through the view
    pub diagonal: (u64, u64),
}

impl Frame {
    #[must_use]
    pub fn new(region: Region, total_size: u64) -> Self {
        Self {
            total_size,
            region,
            padded: region.padded(total_size),
            diagonal: region.diagonal(total_size),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewView {
    pub frame: Frame,
    pub cells: Vec<OverviewCell>,
    /// Largest cell count in the batch, the top of the color scale
    pub max_count: u64,
}

/// One non-empty cell of the overview grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewCell {
    pub x: u64,
    pub y: u64,
    pub w: u64,
    pub h: u64,
    /// Number of calls anchored in the cell, possibly truncated by the give-up factor
    pub count: u64,
    pub from_contig_index: usize,
    pub to_contig_index: usize,
    pub from_contig: String,
    pub to_contig: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailView {
    pub frame: Frame,
    pub jumps: JumpLayer,
    pub accepted_calls: AcceptedCalls,
    pub ground_truth_calls: GroundTruthCalls,
    /// Absent when the read or seed budget was exceeded
    pub read_layout: Option<ReadLayout>,
    /// Absent when the padded extent exceeds the budget
    pub sequence_tracks: Option<SequenceTracks>,
    /// True when no layer was skipped for budget reasons
    pub complete: bool,
}

/// Geometry of a single jump glyph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JumpQuad {
    pub id: JumpId,
    pub read_id: ReadId,
    pub category: JumpCategory,
    pub color: Rgb,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
    pub from_pos: u64,
    pub to_pos: u64,
    pub sort_start: u64,
    pub num_supp_nt: u64,
    pub query_distance: u64,
    /// Fill opacity, grows with supporting bases
    pub alpha: f64,
    pub score: Option<f64>,
}

/// Disjoint triangles packed into one path, shapes separated by `NaN`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolygonBatch {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl PolygonBatch {
    /// Append one closed shape followed by the path-break sentinel
    pub fn push_shape(&mut self, xs: &[f64], ys: &[f64]) {
        self.xs.extend_from_slice(xs);
        self.xs.push(f64::NAN);
        self.ys.extend_from_slice(ys);
        self.ys.push(f64::NAN);
    }

    /// Number of shapes in the batch
    #[must_use]
    pub fn num_shapes(&self) -> usize {
        self.xs.iter().filter(|x| x.is_nan()).count()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct JumpLayer {
    /// Quads in sweep order
    pub quads: Vec<JumpQuad>,
    pub fuzziness: PolygonBatch,
    /// False when the jump count exceeded the budget and nothing was swept
    pub swept: bool,
}

/// Marker for a call: the call itself for point calls, the box center otherwise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallMarker {
    pub call_id: i64,
    pub shape: CallShape,
    pub x: f64,
    pub y: f64,
    pub num_supp_nt: u64,
    pub coverage: u64,
    pub num_supporting_jumps: usize,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallBox {
    pub call_id: i64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
    pub num_supp_nt: u64,
    pub coverage: u64,
    pub num_supporting_jumps: usize,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AcceptedCalls {
    pub color: Option<Rgb>,
    pub boxes: Vec<CallBox>,
    pub markers: Vec<CallMarker>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroundTruthCalls {
    pub color: Option<Rgb>,
    pub markers: Vec<CallMarker>,
    /// Ids of ground-truth calls with non-unit size; counted, not drawn
    pub anomalies: Vec<i64>,
}

/// Display columns occupied by one read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadLanes {
    pub read_id: ReadId,
    /// Global display column of lane 0
    pub first_column: usize,
    pub num_lanes: usize,
    /// `occupied_until` of every lane after packing, in lane order
    pub lane_ends: Vec<i64>,
}

/// One seed placed in its lane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedGlyph {
    pub id: SeedId,
    pub read_id: ReadId,
    /// Lane within the read
    pub lane: usize,
    /// Global display column (`first_column + lane`)
    pub column: usize,
    pub layer: u32,
    pub on_forward_strand: bool,
    pub color: Rgb,
    /// Read-space offset and size
    pub start: u64,
    pub size: u64,
    pub start_ref: u64,
    /// Half-open reference interval used for packing (includes spacing)
    pub ref_interval: (i64, i64),
    /// Leftmost and rightmost covered reference base
    pub ref_first: i64,
    pub ref_last: i64,
    /// Center of the glyph on the reference axis
    pub center: f64,
    /// Read-vs-reference line: reference end points
    pub ref_segment: (i64, i64),
    /// Read-vs-reference line: read end points
    pub read_segment: (u64, u64),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReadLayout {
    /// Reads in display order (descending read id)
    pub reads: Vec<ReadLanes>,
    pub seeds: Vec<SeedGlyph>,
    /// Read id of every display column, `None` for gap columns
    pub column_labels: Vec<Option<ReadId>>,
    /// First column of every read (axis ticks)
    pub read_ticks: Vec<usize>,
    /// Column of every lane (grid lines)
    pub lane_ticks: Vec<usize>,
}

/// One reference base of a sequence strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseGlyph {
    pub pos: u64,
    pub center: f64,
    pub symbol: char,
    pub color: Rgb,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SequenceTracks {
    /// Bases along the to axis (left strip)
    pub vertical: Vec<BaseGlyph>,
    /// Bases along the from axis (bottom strip)
    pub horizontal: Vec<BaseGlyph>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_batch_separates_shapes() {
        let mut batch = PolygonBatch::default();
        batch.push_shape(&[0.0, 1.0, 1.0], &[0.0, 0.0, 1.0]);
        batch.push_shape(&[5.0, 6.0, 6.0], &[5.0, 5.0, 6.0]);
        assert_eq!(batch.xs.len(), 8);
        assert!(batch.xs[3].is_nan());
        assert!(batch.ys[7].is_nan());
        assert_eq!(batch.num_shapes(), 2);
    }

    #[test]
    fn test_model_serializes_with_mode_tag() {
        let region = Region::clamp(0, 0, 10, 10, 100);
        let model = RenderModel::Overview(OverviewView {
            frame: Frame::new(region, 100),
            cells: vec![],
            max_count: 0,
        });
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["mode"], "overview");
        assert_eq!(json["frame"]["padded"]["xe"], 20);
    }

    #[test]
    fn test_nan_sentinel_serializes_as_null() {
        let mut batch = PolygonBatch::default();
        batch.push_shape(&[1.0], &[2.0]);
        let json = serde_json::to_value(&batch).unwrap();
        assert!(json["xs"][1].is_null());
    }
}
