use crate::core::region::Region;
use crate::render::calls::CallFetcher;
use crate::render::config::{RenderConfig, RenderRequest};
use crate::render::jumps::JumpSweeper;
use crate::render::model::{
    DetailView, Frame, GroundTruthCalls, JumpLayer, OverviewView, ReadLayout, RenderMode,
    RenderModel,
};
use crate::render::overview::OverviewBinner;
use crate::render::reads::ReadLayoutPacker;
use crate::render::sequence::SequenceTrackBuilder;
use crate::render::RenderError;
use crate::store::dataset::Dataset;
use crate::store::{CallStore, Pack, Seeder, StoreError};

/// Jumps and the read layout derived from them
type JumpsAndReads = (JumpLayer, Option<ReadLayout>);

/// Top-level render controller: picks overview or detail and assembles the model
pub struct ViewportAnalyzer<'a> {
    pack: &'a dyn Pack,
    store: &'a dyn CallStore,
    seeder: &'a dyn Seeder,
    /// Name requests must carry, if any
    dataset_name: &'a str,
}

impl<'a> ViewportAnalyzer<'a> {
    pub fn new(pack: &'a dyn Pack, store: &'a dyn CallStore, seeder: &'a dyn Seeder) -> Self {
        Self {
            pack,
            store,
            seeder,
            dataset_name: "",
        }
    }

    /// Analyzer over a loaded dataset; requests naming another dataset are rejected
    pub fn for_dataset(dataset: &'a Dataset) -> Self {
        Self {
            pack: &dataset.pack,
            store: &dataset.store,
            seeder: &dataset.seeder,
            dataset_name: &dataset.name,
        }
    }

    fn prepare(&self, request: &RenderRequest) -> Result<(RenderConfig, Frame), RenderError> {
        let config = request.config()?;
        if !request.dataset_name.is_empty()
            && !self.dataset_name.is_empty()
            && request.dataset_name != self.dataset_name
        {
            return Err(RenderError::InvalidRequest(format!(
                "unknown dataset '{}'",
                request.dataset_name
            )));
        }
        if !self.store.run_exists(request.run_id)? {
            return Err(RenderError::NotFound(request.run_id));
        }

        let total_size = self.pack.total_size();
        let viewport = request.region;
        let region = Region::clamp(viewport.xs, viewport.ys, viewport.xe, viewport.ye, total_size);
        Ok((config, Frame::new(region, total_size)))
    }

    fn mode_for(
        &self,
        request: &RenderRequest,
        config: &RenderConfig,
        frame: &Frame,
    ) -> Result<RenderMode, RenderError> {
        let estimate = self
            .store
            .estimate_count(request.run_id, config.min_score, &frame.padded)?;
        let mode = if config.within_budget(estimate) {
            RenderMode::Detail
        } else {
            RenderMode::Overview
        };
        tracing::debug!(
            "Estimated {} calls in {} (budget {}): {:?}",
            estimate,
            frame.padded,
            config.max_num_ele,
            mode
        );
        Ok(mode)
    }

    /// Decide between overview and detail for `request`.
    ///
    /// # Errors
    ///
    /// `RenderError::InvalidRequest` for out-of-range parameters,
    /// `RenderError::NotFound` if the run does not exist, `RenderError::Store` if
    /// the estimate query fails.
    pub fn choose_mode(&self, request: &RenderRequest) -> Result<RenderMode, RenderError> {
        let (config, frame) = self.prepare(request)?;
        self.mode_for(request, &config, &frame)
    }

    /// Render `request` into a model.
    ///
    /// # Errors
    ///
    /// See [`ViewportAnalyzer::choose_mode`]; any collaborator failure during
    /// assembly is reported as `RenderError::Store`.
    pub fn render(&self, request: &RenderRequest) -> Result<RenderModel, RenderError> {
        let (config, frame) = self.prepare(request)?;
        match self.mode_for(request, &config, &frame)? {
            RenderMode::Overview => {
                let cells = OverviewBinner::bin(
                    self.pack,
                    self.store,
                    request.run_id,
                    &frame.padded,
                    &config,
                )?;
                let max_count = cells.iter().map(|c| c.count).max().unwrap_or(0);
                Ok(RenderModel::Overview(OverviewView {
                    frame,
                    cells,
                    max_count,
                }))
            }
            RenderMode::Detail => Ok(RenderModel::Detail(self.detail(request, &config, frame)?)),
        }
    }

    fn detail(
        &self,
        request: &RenderRequest,
        config: &RenderConfig,
        frame: Frame,
    ) -> Result<DetailView, StoreError> {
        let padded = frame.padded;

        // Independent read-only queries; each result lands in its own field
        let (calls, (jumps_and_reads, tracks)) = rayon::join(
            || {
                rayon::join(
                    || CallFetcher::fetch_accepted(self.store, request.run_id, &padded, config),
                    || match request.ground_truth_run_id {
                        Some(run_id) => {
                            CallFetcher::fetch_ground_truth(self.store, run_id, &padded, config)
                        }
                        None => Ok(GroundTruthCalls::default()),
                    },
                )
            },
            || {
                rayon::join(
                    || self.jumps_and_reads(request, config, &padded),
                    || SequenceTrackBuilder::build(self.pack, &frame.region, config),
                )
            },
        );
        let (accepted_calls, ground_truth_calls) = (calls.0?, calls.1?);
        let (jumps, read_layout) = jumps_and_reads?;
        let sequence_tracks = tracks?;

        let complete = jumps.swept && read_layout.is_some() && sequence_tracks.is_some();
        Ok(DetailView {
            frame,
            jumps,
            accepted_calls,
            ground_truth_calls,
            read_layout,
            sequence_tracks,
            complete,
        })
    }

    fn jumps_and_reads(
        &self,
        request: &RenderRequest,
        config: &RenderConfig,
        padded: &Region,
    ) -> Result<JumpsAndReads, StoreError> {
        let num_jumps = self.store.count_jumps(request.run_id, padded)?;
        if num_jumps >= config.max_num_ele {
            tracing::warn!(
                "Skipping jumps: {} jumps reach the budget of {}",
                num_jumps,
                config.max_num_ele
            );
            return Ok((JumpSweeper::skipped(), None));
        }

        let jumps = JumpSweeper::sweep(self.store, request.run_id, padded)?;
        let read_layout =
            ReadLayoutPacker::layout(self.store, self.seeder, &jumps.read_ids(), config)?;
        Ok((jumps, read_layout))
    }
}
