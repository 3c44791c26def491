//! Contracts of the external collaborators the render engine reads from.
//!
//! The engine never owns genome, call or read data. It consumes three read-only
//! services:
//!
//! - [`Pack`]: the packed reference sequence (bases and contig metadata)
//! - [`CallStore`]: SV calls, jumps and reads of one or more caller runs
//! - [`Seeder`]: the aligner's seeding step, treated as a black box `read -> seeds`
//!
//! All three are `Send + Sync` so detail-mode queries can be issued concurrently.
//! [`memory`] provides reference implementations backed by a [`dataset`] file.
//!
//! ## Streams
//!
//! Record streams are lazy and restartable: every call to
//! [`CallStore::stream_jumps`] or [`CallStore::stream_calls`] starts a fresh,
//! finite sequence. Jump streams are ordered by [`Jump::sort_start`] ascending.
//!
//! [`Jump::sort_start`]: crate::core::records::Jump::sort_start

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::records::{CallRecord, Jump};
use crate::core::region::Region;
use crate::core::seed::{Read, Seed};
use crate::core::types::{ReadId, RunId};

pub mod dataset;
pub mod memory;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Run {0} not found")]
    RunNotFound(RunId),

    #[error("Read {0} not found")]
    ReadNotFound(ReadId),

    #[error("Reference range {start}..{end} is outside the pack (size {total_size})")]
    OutOfRange { start: u64, end: u64, total_size: u64 },

    #[error("Jump stream out of order: start {current} after {previous}")]
    Unordered { previous: u64, current: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// A lazily evaluated sequence of records fetched from a store
pub type RecordStream<'a, T> = Box<dyn Iterator<Item = Result<T, StoreError>> + Send + 'a>;

/// Summary of a caller run as listed by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    pub id: RunId,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub num_calls: usize,
    pub num_jumps: usize,
}

/// Reference sequence access
pub trait Pack: Send + Sync {
    /// Bases in the half-open range `[start, end)`, clamped to the pack
    fn extract_bases(&self, start: u64, end: u64) -> Result<Vec<u8>, StoreError>;

    /// Contig names in pack order
    fn contig_names(&self) -> Vec<String>;

    /// Contig lengths in pack order
    fn contig_lengths(&self) -> Vec<u64>;

    /// Length of the concatenated forward strand
    fn total_size(&self) -> u64;
}

/// SV-call storage, consumed through range and count queries only
pub trait CallStore: Send + Sync {
    fn run_exists(&self, run_id: RunId) -> Result<bool, StoreError>;

    fn runs(&self) -> Result<Vec<RunInfo>, StoreError>;

    /// Estimated number of calls of `run_id` passing `min_score` anchored inside `region`.
    ///
    /// Uses the same anchor rule as [`CallStore::count_calls`], so an exact store
    /// reports the sum of the overview cells covering `region`.
    fn estimate_count(
        &self,
        run_id: RunId,
        min_score: f64,
        region: &Region,
    ) -> Result<u64, StoreError>;

    /// Number of calls passing `min_score` whose `(from_start, to_start)` lies in `cell`.
    ///
    /// The store may stop counting once `give_up_factor` calls have been seen and
    /// return that truncated value; callers accept it as authoritative.
    fn count_calls(
        &self,
        run_id: RunId,
        min_score: f64,
        cell: &Region,
        give_up_factor: u64,
    ) -> Result<u64, StoreError>;

    /// Number of jumps behind `run_id` inside `region`
    fn count_jumps(&self, run_id: RunId, region: &Region) -> Result<u64, StoreError>;

    fn stream_calls<'a>(
        &'a self,
        run_id: RunId,
        region: &Region,
        min_score: f64,
    ) -> Result<RecordStream<'a, CallRecord>, StoreError>;

    /// Jumps behind `run_id` inside `region`, ascending by sort start
    fn stream_jumps<'a>(
        &'a self,
        run_id: RunId,
        region: &Region,
    ) -> Result<RecordStream<'a, Jump>, StoreError>;

    fn get_read(&self, read_id: ReadId) -> Result<Read, StoreError>;
}

/// The aligner's seeding step
pub trait Seeder: Send + Sync {
    /// Seeds of `read`, each tagged with the seeding pass (`layer`) that found it
    fn seed(&self, read: &Read) -> Result<Vec<Seed>, StoreError>;
}
