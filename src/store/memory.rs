//! In-memory implementations of the collaborator contracts.
//!
//! These back the CLI and the web server (loaded from a dataset file) and serve as
//! fixtures in tests. They answer every query by scanning indexed vectors, so counts
//! are exact; `count_calls` still honors the give-up factor.

use std::collections::{BTreeMap, HashMap};

use crate::core::contig::Contig;
use crate::core::records::{CallRecord, Jump};
use crate::core::region::Region;
use crate::core::seed::{Read, Seed};
use crate::core::types::{ReadId, RunId};
use crate::store::{CallStore, Pack, RecordStream, RunInfo, Seeder, StoreError};

/// A packed reference held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryPack {
    contigs: Vec<Contig>,
    /// Concatenated forward strand of all contigs
    sequence: Vec<u8>,
}

impl InMemoryPack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contig to the end of the pack
    pub fn add_contig(&mut self, name: impl Into<String>, bases: &[u8]) {
        self.contigs.push(Contig::new(name, bases.len() as u64));
        self.sequence.extend_from_slice(bases);
    }

    pub fn contigs(&self) -> &[Contig] {
        &self.contigs
    }
}

impl Pack for InMemoryPack {
    fn extract_bases(&self, start: u64, end: u64) -> Result<Vec<u8>, StoreError> {
        let total_size = self.total_size();
        if start > end {
            return Err(StoreError::OutOfRange {
                start,
                end,
                total_size,
            });
        }
        let to_index = |pos: u64| usize::try_from(pos.min(total_size)).unwrap_or(usize::MAX);
        let (start, end) = (to_index(start), to_index(end));
        Ok(self.sequence[start..end].to_vec())
    }

    fn contig_names(&self) -> Vec<String> {
        self.contigs.iter().map(|c| c.name.clone()).collect()
    }

    fn contig_lengths(&self) -> Vec<u64> {
        self.contigs.iter().map(|c| c.length).collect()
    }

    fn total_size(&self) -> u64 {
        self.sequence.len() as u64
    }
}

#[derive(Debug, Clone, Default)]
struct RunData {
    name: String,
    description: String,
    calls: Vec<CallRecord>,
    /// Kept sorted by `Jump::sort_start`
    jumps: Vec<Jump>,
}

impl RunData {
    fn calls_passing(&self, min_score: f64) -> impl Iterator<Item = &CallRecord> + '_ {
        self.calls.iter().filter(move |c| c.passes(min_score))
    }
}

/// Whether a jump falls inside a query window. An endpoint that is not known
/// matches anywhere on its axis.
fn jump_in_region(jump: &Jump, region: &Region) -> bool {
    let from_ok = !jump.from_known || (region.xs..=region.xe).contains(&jump.from_pos);
    let to_ok = !jump.to_known || (region.ys..=region.ye).contains(&jump.to_pos);
    from_ok && to_ok
}

/// Call store holding runs and reads in memory
#[derive(Debug, Default)]
pub struct InMemoryCallStore {
    runs: BTreeMap<RunId, RunData>,
    reads: HashMap<ReadId, Read>,
}

impl InMemoryCallStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a run; registering an existing id renames it and keeps its records
    pub fn add_run(
        &mut self,
        run_id: RunId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) {
        let run = self.runs.entry(run_id).or_default();
        run.name = name.into();
        run.description = description.into();
    }

    /// Add a call to an existing run
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RunNotFound` if the run has not been registered.
    pub fn add_call(&mut self, run_id: RunId, call: CallRecord) -> Result<(), StoreError> {
        let run = self
            .runs
            .get_mut(&run_id)
            .ok_or(StoreError::RunNotFound(run_id))?;
        run.calls.push(call);
        Ok(())
    }

    /// Add a jump to an existing run, keeping the run's jumps in sweep order
    ///
    /// # Errors
    ///
    /// Returns `StoreError::RunNotFound` if the run has not been registered.
    pub fn add_jump(&mut self, run_id: RunId, jump: Jump) -> Result<(), StoreError> {
        let run = self
            .runs
            .get_mut(&run_id)
            .ok_or(StoreError::RunNotFound(run_id))?;
        // Insert after any equal keys so insertion order breaks ties
        let at = run
            .jumps
            .partition_point(|j| j.sort_start() <= jump.sort_start());
        run.jumps.insert(at, jump);
        Ok(())
    }

    pub fn add_read(&mut self, read: Read) {
        self.reads.insert(read.id, read);
    }

    fn run(&self, run_id: RunId) -> Result<&RunData, StoreError> {
        self.runs.get(&run_id).ok_or(StoreError::RunNotFound(run_id))
    }
}

impl CallStore for InMemoryCallStore {
    fn run_exists(&self, run_id: RunId) -> Result<bool, StoreError> {
        Ok(self.runs.contains_key(&run_id))
    }

    fn runs(&self) -> Result<Vec<RunInfo>, StoreError> {
        Ok(self
            .runs
            .iter()
            .map(|(id, run)| RunInfo {
                id: *id,
                name: run.name.clone(),
                description: run.description.clone(),
                num_calls: run.calls.len(),
                num_jumps: run.jumps.len(),
            })
            .collect())
    }

    fn estimate_count(
        &self,
        run_id: RunId,
        min_score: f64,
        region: &Region,
    ) -> Result<u64, StoreError> {
        let run = self.run(run_id)?;
        Ok(run
            .calls_passing(min_score)
            .filter(|c| c.anchored_in(region))
            .count() as u64)
    }

    fn count_calls(
        &self,
        run_id: RunId,
        min_score: f64,
        cell: &Region,
        give_up_factor: u64,
    ) -> Result<u64, StoreError> {
        let run = self.run(run_id)?;
        let limit = usize::try_from(give_up_factor).unwrap_or(usize::MAX);
        Ok(run
            .calls_passing(min_score)
            .filter(|c| c.anchored_in(cell))
            .take(limit)
            .count() as u64)
    }

    fn count_jumps(&self, run_id: RunId, region: &Region) -> Result<u64, StoreError> {
        let run = self.run(run_id)?;
        Ok(run
            .jumps
            .iter()
            .filter(|j| jump_in_region(j, region))
            .count() as u64)
    }

    fn stream_calls<'a>(
        &'a self,
        run_id: RunId,
        region: &Region,
        min_score: f64,
    ) -> Result<RecordStream<'a, CallRecord>, StoreError> {
        let run = self.run(run_id)?;
        let region = *region;
        Ok(Box::new(
            run.calls_passing(min_score)
                .filter(move |c| {
                    region.intersects(c.from_start, c.to_start, c.from_size, c.to_size)
                })
                .cloned()
                .map(Ok),
        ))
    }

    fn stream_jumps<'a>(
        &'a self,
        run_id: RunId,
        region: &Region,
    ) -> Result<RecordStream<'a, Jump>, StoreError> {
        let run = self.run(run_id)?;
        let region = *region;
        Ok(Box::new(
            run.jumps
                .iter()
                .filter(move |j| jump_in_region(j, &region))
                .cloned()
                .map(Ok),
        ))
    }

    fn get_read(&self, read_id: ReadId) -> Result<Read, StoreError> {
        self.reads
            .get(&read_id)
            .cloned()
            .ok_or(StoreError::ReadNotFound(read_id))
    }
}

/// Seeder answering from a precomputed seed table, standing in for the aligner
#[derive(Debug, Clone, Default)]
pub struct PrecomputedSeeder {
    seeds: HashMap<ReadId, Vec<Seed>>,
}

impl PrecomputedSeeder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, read_id: ReadId, seeds: Vec<Seed>) {
        self.seeds.insert(read_id, seeds);
    }
}

impl Seeder for PrecomputedSeeder {
    fn seed(&self, read: &Read) -> Result<Vec<Seed>, StoreError> {
        Ok(self.seeds.get(&read.id).cloned().unwrap_or_default())
    }
}
