use serde::{Deserialize, Serialize};

use crate::core::types::RunId;
use crate::utils::validation::{validate_render_params, ValidationError};

/// Default element budget per render
pub const DEFAULT_MAX_NUM_ELE: u64 = 10_000;

/// Default cap on per-cell counting cost in overview mode
pub const DEFAULT_GIVE_UP_FACTOR: u64 = 1_000;

/// Default number of blank display columns between two reads
pub const DEFAULT_LANE_GAP: usize = 2;

fn default_max_num_ele() -> u64 {
    DEFAULT_MAX_NUM_ELE
}

fn default_give_up_factor() -> u64 {
    DEFAULT_GIVE_UP_FACTOR
}

/// Raw viewport rectangle as sent by the presentation layer; may be negative
/// or reach past the genome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub xs: i64,
    pub ys: i64,
    pub xe: i64,
    pub ye: i64,
}

impl Viewport {
    #[must_use]
    pub fn new(xs: i64, ys: i64, xe: i64, ye: i64) -> Self {
        Self { xs, ys, xe, ye }
    }
}

/// One render request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    pub region: Viewport,

    /// Run whose calls (and jumps) are shown
    pub run_id: RunId,

    /// Optional run holding ground-truth calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth_run_id: Option<RunId>,

    /// Calls and jumps need `num_supp_nt > min_score * coverage`
    #[serde(default)]
    pub min_score: f64,

    /// Element budget deciding between overview and detail
    #[serde(default = "default_max_num_ele")]
    pub max_num_ele: u64,

    #[serde(default)]
    pub dataset_name: String,

    #[serde(default = "default_give_up_factor")]
    pub give_up_factor: u64,
}

impl RenderRequest {
    #[must_use]
    pub fn new(region: Viewport, run_id: RunId) -> Self {
        Self {
            region,
            run_id,
            ground_truth_run_id: None,
            min_score: 0.0,
            max_num_ele: DEFAULT_MAX_NUM_ELE,
            dataset_name: String::new(),
            give_up_factor: DEFAULT_GIVE_UP_FACTOR,
        }
    }

    #[must_use]
    pub fn with_ground_truth(mut self, run_id: RunId) -> Self {
        self.ground_truth_run_id = Some(run_id);
        self
    }

    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    #[must_use]
    pub fn with_max_num_ele(mut self, max_num_ele: u64) -> Self {
        self.max_num_ele = max_num_ele;
        self
    }

    /// Validated configuration for this request
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a parameter is out of range.
    pub fn config(&self) -> Result<RenderConfig, ValidationError> {
        validate_render_params(self.min_score, self.max_num_ele, self.give_up_factor)?;
        Ok(RenderConfig {
            min_score: self.min_score,
            max_num_ele: self.max_num_ele,
            give_up_factor: self.give_up_factor,
            lane_gap: DEFAULT_LANE_GAP,
        })
    }
}

/// Thresholds every render component is called with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub min_score: f64,
    pub max_num_ele: u64,
    pub give_up_factor: u64,
    pub lane_gap: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            max_num_ele: DEFAULT_MAX_NUM_ELE,
            give_up_factor: DEFAULT_GIVE_UP_FACTOR,
            lane_gap: DEFAULT_LANE_GAP,
        }
    }
}

impl RenderConfig {
    /// Whether `count` elements fit in the budget
    #[must_use]
    pub fn within_budget(&self, count: u64) -> bool {
        count <= self.max_num_ele
    }
}
