//! JSON dataset files bundling a reference, caller runs and reads.
//!
//! A dataset is what the CLI and web server browse. It is loaded once into the
//! in-memory collaborators and never written back.
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "name": "toy",
//!   "contigs": [{ "name": "chr1", "sequence": "ACGT..." }],
//!   "runs": [{ "id": 1, "name": "caller", "calls": [], "jumps": [] }],
//!   "reads": [{ "id": 7, "sequence": "ACGT...", "seeds": [] }]
//! }
//! ```
//!
//! Instead of inline `contigs`, a dataset may name a `fasta` file (resolved
//! relative to the dataset file).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::records::{CallRecord, Jump};
use crate::core::seed::{Read, Seed};
use crate::core::types::{ReadId, RunId};
use crate::parsing::fasta::{self, FastaError};
use crate::store::memory::{InMemoryCallStore, InMemoryPack, PrecomputedSeeder};
use crate::store::StoreError;
use crate::utils::validation::{validate_dataset, ValidationError};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse dataset: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to load reference: {0}")]
    Fasta(#[from] FastaError),

    #[error("Invalid dataset: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Inconsistent dataset: {0}")]
    Store(#[from] StoreError),
}

/// Dataset format version for compatibility checking
pub const DATASET_VERSION: &str = "1.0.0";

/// Serializable dataset format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetData {
    pub version: String,
    pub name: String,

    /// Inline reference contigs, in pack order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contigs: Vec<ContigData>,

    /// FASTA file to load the reference from instead of `contigs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fasta: Option<PathBuf>,

    #[serde(default)]
    pub runs: Vec<RunData>,

    #[serde(default)]
    pub reads: Vec<ReadData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContigData {
    pub name: String,
    pub sequence: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunData {
    pub id: RunId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub calls: Vec<CallRecord>,
    #[serde(default)]
    pub jumps: Vec<Jump>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadData {
    pub id: ReadId,
    pub sequence: String,
    /// Seeds the aligner produces for this read
    #[serde(default)]
    pub seeds: Vec<Seed>,
}

/// A loaded dataset: the three collaborators the render engine reads from
#[derive(Debug)]
pub struct Dataset {
    pub name: String,
    pub pack: InMemoryPack,
    pub store: InMemoryCallStore,
    pub seeder: PrecomputedSeeder,
}

impl Dataset {
    /// Load a dataset from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `DatasetError` if the file cannot be read or parsed, the referenced
    /// FASTA cannot be loaded, or the dataset fails validation.
    pub fn load_from_file(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json_in(&content, base_dir)
    }

    /// Parse a dataset from a JSON string; a `fasta` path is resolved against the
    /// working directory
    ///
    /// # Errors
    ///
    /// See [`Dataset::load_from_file`].
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Self::from_json_in(json, Path::new("."))
    }

    fn from_json_in(json: &str, base_dir: &Path) -> Result<Self, DatasetError> {
        let data: DatasetData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != DATASET_VERSION {
            tracing::warn!(
                "Dataset version mismatch (expected {}, found {})",
                DATASET_VERSION,
                data.version
            );
        }

        validate_dataset(&data)?;

        let pack = match &data.fasta {
            Some(fasta_path) => fasta::load_pack(&base_dir.join(fasta_path))?,
            None => {
                let mut pack = InMemoryPack::new();
                for contig in &data.contigs {
                    pack.add_contig(&contig.name, contig.sequence.as_bytes());
                }
                pack
            }
        };

        let mut store = InMemoryCallStore::new();
        for run in data.runs {
            store.add_run(run.id, run.name, run.description);
            for call in run.calls {
                store.add_call(run.id, call)?;
            }
            for jump in run.jumps {
                store.add_jump(run.id, jump)?;
            }
        }

        let mut seeder = PrecomputedSeeder::new();
        for read in data.reads {
            seeder.insert(read.id, read.seeds);
            store.add_read(Read {
                id: read.id,
                sequence: read.sequence,
            });
        }

        tracing::debug!("Loaded dataset '{}'", data.name);

        Ok(Self {
            name: data.name,
            pack,
            store,
            seeder,
        })
    }

    /// Replace the reference with another pack (e.g. one loaded from FASTA)
    #[must_use]
    pub fn with_pack(mut self, pack: InMemoryPack) -> Self {
        self.pack = pack;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CallStore, Pack, Seeder};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TOY: &str = r#"{
        "version": "1.0.0",
        "name": "toy",
        "contigs": [{"name": "chr1", "sequence": "ACGTACGTAC"}, {"name": "chr2", "sequence": "GGGGG"}],
        "runs": [{
            "id": 1,
            "name": "caller",
            "calls": [{"id": 1, "from_start": 2, "from_size": 1, "to_start": 12, "to_size": 1,
                       "num_supp_nt": 5, "coverage": 10}],
            "jumps": [{"id": 3, "from_pos": 2, "to_pos": 12, "from_start": 2, "from_size": 1,
                       "to_start": 12, "to_size": 1, "num_supp_nt": 10, "read_id": 7,
                       "switch_strand_known": true, "from_known": true, "to_known": true}]
        }],
        "reads": [{"id": 7, "sequence": "ACGTGGG", "seeds": [
            {"start": 0, "start_ref": 0, "size": 4, "on_forward_strand": true}
        ]}]
    }"#;

    #[test]
    fn test_from_json() {
        let dataset = Dataset::from_json(TOY).unwrap();
        assert_eq!(dataset.name, "toy");
        assert_eq!(dataset.pack.total_size(), 15);
        assert!(dataset.store.run_exists(RunId(1)).unwrap());
        let read = dataset.store.get_read(ReadId(7)).unwrap();
        assert_eq!(read.sequence, "ACGTGGG");
        assert_eq!(dataset.seeder.seed(&read).unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Dataset::from_json("{not json"),
            Err(DatasetError::ParseError(_))
        ));
    }

    #[test]
    fn test_loads_fasta_relative_to_dataset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ref.fa"), b">chrA\nACGT\nAC\n").unwrap();
        let json = r#"{"version": "1.0.0", "name": "fa", "fasta": "ref.fa", "runs": []}"#;

        let mut file = NamedTempFile::new_in(dir.path()).unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();

        let dataset = Dataset::load_from_file(file.path()).unwrap();
        assert_eq!(dataset.pack.contig_names(), vec!["chrA"]);
        assert_eq!(dataset.pack.total_size(), 6);
    }
}
