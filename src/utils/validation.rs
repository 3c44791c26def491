//! Centralized validation and helper functions.

use std::collections::HashSet;

use crate::store::dataset::DatasetData;

/// Maximum number of contigs allowed in a single reference (DOS protection)
pub const MAX_CONTIGS: usize = 100_000;

/// Maximum number of calls, jumps or reads in a dataset file (DOS protection)
pub const MAX_DATASET_RECORDS: usize = 10_000_000;

/// Upper bound on the per-render element budget accepted from clients
pub const MAX_ELEMENT_BUDGET: u64 = 1_000_000;

/// Check if adding another contig would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new contig.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_contig_limit(count: usize) -> Option<String> {
    if count >= MAX_CONTIGS {
        Some(format!(
            "Too many contigs: adding another would exceed maximum of {MAX_CONTIGS}"
        ))
    } else {
        None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("min_score must be a number in [0, 1], got {0}")]
    MinScoreOutOfRange(f64),
    #[error("max_num_ele must be between 1 and {MAX_ELEMENT_BUDGET}, got {0}")]
    ElementBudgetOutOfRange(u64),
    #[error("give_up_factor must be at least 1")]
    ZeroGiveUpFactor,
    #[error("Dataset has too many {kind}: {count} exceeds {MAX_DATASET_RECORDS}")]
    TooManyRecords { kind: &'static str, count: usize },
    #[error("Too many contigs: {0}")]
    TooManyContigs(usize),
    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: i64 },
    #[error("Jump {0} has an empty interval (sizes must be at least 1)")]
    EmptyJumpInterval(i64),
    #[error("Dataset defines both inline contigs and a FASTA file")]
    AmbiguousReference,
}

/// Validate the per-render parameters.
///
/// # Errors
///
/// Returns the first violated constraint.
pub fn validate_render_params(
    min_score: f64,
    max_num_ele: u64,
    give_up_factor: u64,
) -> Result<(), ValidationError> {
    if !(0.0..=1.0).contains(&min_score) {
        // NaN fails the range check as well
        return Err(ValidationError::MinScoreOutOfRange(min_score));
    }
    if max_num_ele == 0 || max_num_ele > MAX_ELEMENT_BUDGET {
        return Err(ValidationError::ElementBudgetOutOfRange(max_num_ele));
    }
    if give_up_factor == 0 {
        return Err(ValidationError::ZeroGiveUpFactor);
    }
    Ok(())
}

fn check_record_limit(kind: &'static str, count: usize) -> Result<(), ValidationError> {
    if count > MAX_DATASET_RECORDS {
        Err(ValidationError::TooManyRecords { kind, count })
    } else {
        Ok(())
    }
}

fn check_unique<I: IntoIterator<Item = i64>>(
    kind: &'static str,
    ids: I,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId { kind, id });
        }
    }
    Ok(())
}

/// Validate a parsed dataset before it is loaded into memory.
///
/// # Errors
///
/// Returns the first violated constraint: record limits, duplicate run/read ids,
/// jumps with empty intervals, or an ambiguous reference definition.
pub fn validate_dataset(data: &DatasetData) -> Result<(), ValidationError> {
    if data.fasta.is_some() && !data.contigs.is_empty() {
        return Err(ValidationError::AmbiguousReference);
    }
    if check_contig_limit(data.contigs.len()).is_some() {
        return Err(ValidationError::TooManyContigs(data.contigs.len()));
    }

    check_record_limit("reads", data.reads.len())?;
    check_unique("run", data.runs.iter().map(|r| r.id.0))?;
    check_unique("read", data.reads.iter().map(|r| r.id.0))?;

    for run in &data.runs {
        check_record_limit("calls", run.calls.len())?;
        check_record_limit("jumps", run.jumps.len())?;
        if let Some(jump) = run
            .jumps
            .iter()
            .find(|j| j.from_size == 0 || j.to_size == 0)
        {
            return Err(ValidationError::EmptyJumpInterval(jump.id.0));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ReadId, RunId};
    use crate::store::dataset::{ContigData, ReadData, RunData};

    fn empty_dataset() -> DatasetData {
        DatasetData {
            version: "1.0.0".to_string(),
            name: "test".to_string(),
            contigs: vec![],
            fasta: None,
            runs: vec![],
            reads: vec![],
        }
    }

    #[test]
    fn test_check_contig_limit() {
        assert!(check_contig_limit(0).is_none());
        assert!(check_contig_limit(MAX_CONTIGS - 1).is_none());
        assert!(check_contig_limit(MAX_CONTIGS).is_some());
    }

    #[test]
    fn test_validate_render_params() {
        assert!(validate_render_params(0.0, 1, 1).is_ok());
        assert!(validate_render_params(1.0, 10_000, 1_000).is_ok());
        assert!(matches!(
            validate_render_params(1.5, 10, 10),
            Err(ValidationError::MinScoreOutOfRange(_))
        ));
        assert!(matches!(
            validate_render_params(f64::NAN, 10, 10),
            Err(ValidationError::MinScoreOutOfRange(_))
        ));
        assert!(matches!(
            validate_render_params(0.5, 0, 10),
            Err(ValidationError::ElementBudgetOutOfRange(0))
        ));
        assert!(matches!(
            validate_render_params(0.5, 10, 0),
            Err(ValidationError::ZeroGiveUpFactor)
        ));
    }

    #[test]
    fn test_duplicate_run_ids_rejected() {
        let mut data = empty_dataset();
        for _ in 0..2 {
            data.runs.push(RunData {
                id: RunId(1),
                name: "a".to_string(),
                description: String::new(),
                calls: vec![],
                jumps: vec![],
            });
        }
        assert!(matches!(
            validate_dataset(&data),
            Err(ValidationError::DuplicateId { kind: "run", id: 1 })
        ));
    }

    #[test]
    fn test_duplicate_read_ids_rejected() {
        let mut data = empty_dataset();
        for _ in 0..2 {
            data.reads.push(ReadData {
                id: ReadId(9),
                sequence: "ACGT".to_string(),
                seeds: vec![],
            });
        }
        assert!(validate_dataset(&data).is_err());
    }

    #[test]
    fn test_ambiguous_reference_rejected() {
        let mut data = empty_dataset();
        data.fasta = Some("ref.fa".into());
        data.contigs.push(ContigData {
            name: "chr1".to_string(),
            sequence: "ACGT".to_string(),
        });
        assert!(matches!(
            validate_dataset(&data),
            Err(ValidationError::AmbiguousReference)
        ));
    }
}
