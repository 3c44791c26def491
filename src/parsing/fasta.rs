//! Load a packed reference from FASTA using noodles.
//!
//! Contigs are concatenated in file order onto one forward-strand axis.
//! Paths ending in `.gz` or `.bgz` are decompressed on the fly.

use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use thiserror::Error;

use crate::store::memory::InMemoryPack;
use crate::utils::validation::check_contig_limit;

#[derive(Error, Debug)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("FASTA parse error: {0}")]
    Noodles(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Too many contigs: {0}")]
    TooManyContigs(usize),
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Read a FASTA file into an in-memory pack.
///
/// # Errors
///
/// Returns `FastaError::Io` if the file cannot be read, `FastaError::Noodles` if
/// parsing fails, `FastaError::InvalidFormat` if no contigs are found, or
/// `FastaError::TooManyContigs` if the limit is exceeded.
pub fn load_pack(path: &Path) -> Result<InMemoryPack, FastaError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        let reader = BufReader::new(GzDecoder::new(file));
        load_pack_from_reader(&mut fasta::io::Reader::new(reader))
    } else {
        let reader = BufReader::new(file);
        load_pack_from_reader(&mut fasta::io::Reader::new(reader))
    }
}

/// Build a pack from a noodles FASTA reader
fn load_pack_from_reader<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<InMemoryPack, FastaError> {
    let mut pack = InMemoryPack::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| FastaError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        // Check contig limit for DOS protection
        if check_contig_limit(pack.contigs().len()).is_some() {
            return Err(FastaError::TooManyContigs(pack.contigs().len()));
        }

        let name = String::from_utf8_lossy(record.name()).to_string();
        pack.add_contig(name, record.sequence().as_ref());
    }

    if pack.contigs().is_empty() {
        return Err(FastaError::InvalidFormat(
            "No sequences found in FASTA file".to_string(),
        ));
    }

    Ok(pack)
}
