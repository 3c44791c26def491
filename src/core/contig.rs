use serde::{Deserialize, Serialize};

/// A single contig of the packed reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contig {
    /// Sequence name
    pub name: String,

    /// Sequence length in bases
    pub length: u64,
}

impl Contig {
    pub fn new(name: impl Into<String>, length: u64) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

/// Contig boundaries on the concatenated forward-strand coordinate axis.
///
/// Built once from the ordered contig lengths; used to translate a global
/// coordinate into the index of the contig it falls in.
#[derive(Debug, Clone, Default)]
pub struct ContigLayout {
    /// Start offset of each contig, ascending
    starts: Vec<u64>,
    total_size: u64,
}

impl ContigLayout {
    #[must_use]
    pub fn new(lengths: &[u64]) -> Self {
        let mut starts = Vec::with_capacity(lengths.len());
        let mut offset = 0u64;
        for length in lengths {
            starts.push(offset);
            offset = offset.saturating_add(*length);
        }
        Self {
            starts,
            total_size: offset,
        }
    }

    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Index of the contig containing `pos`. Positions at or past the end of the
    /// genome map to the last contig; an empty layout yields `None`.
    #[must_use]
    pub fn index_of(&self, pos: u64) -> Option<usize> {
        if self.starts.is_empty() {
            return None;
        }
        // partition_point gives the number of contigs starting at or before pos
        let idx = self.starts.partition_point(|&start| start <= pos);
        Some(idx.saturating_sub(1))
    }

    /// Start offset of contig `index`
    #[must_use]
    pub fn start_of(&self, index: usize) -> Option<u64> {
        self.starts.get(index).copied()
    }

    /// Split the inclusive range `[first, last]` at contig boundaries.
    ///
    /// Yields `(contig_index, span_first, span_last)` with inclusive ends, in pack
    /// order. The last contig extends to `last`. An empty layout yields the whole
    /// range as contig 0.
    #[must_use]
    pub fn spans_within(&self, first: u64, last: u64) -> Vec<(usize, u64, u64)> {
        let (Some(lo), Some(hi)) = (self.index_of(first), self.index_of(last)) else {
            return vec![(0, first, last)];
        };
        (lo..=hi)
            .filter_map(|index| {
                let span_first = self.start_of(index)?.max(first);
                let span_last = match self.start_of(index + 1) {
                    Some(next) => next.checked_sub(1)?.min(last),
                    None => last,
                };
                (span_first <= span_last).then_some((index, span_first, span_last))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_of() {
        let layout = ContigLayout::new(&[100, 50, 25]);
        assert_eq!(layout.total_size(), 175);
        assert_eq!(layout.index_of(0), Some(0));
        assert_eq!(layout.index_of(99), Some(0));
        assert_eq!(layout.index_of(100), Some(1));
        assert_eq!(layout.index_of(149), Some(1));
        assert_eq!(layout.index_of(150), Some(2));
        assert_eq!(layout.index_of(10_000), Some(2));
        assert_eq!(layout.start_of(2), Some(150));
    }

    #[test]
    fn test_empty_layout() {
        let layout = ContigLayout::new(&[]);
        assert!(layout.is_empty());
        assert_eq!(layout.index_of(5), None);
        assert_eq!(layout.spans_within(3, 9), vec![(0, 3, 9)]);
    }

    #[test]
    fn test_spans_within() {
        let layout = ContigLayout::new(&[100, 50, 25]);
        assert_eq!(layout.spans_within(10, 20), vec![(0, 10, 20)]);
        assert_eq!(
            layout.spans_within(90, 175),
            vec![(0, 90, 99), (1, 100, 149), (2, 150, 175)]
        );
        assert_eq!(layout.spans_within(100, 100), vec![(1, 100, 100)]);
    }

    #[test]
    fn test_spans_skip_empty_contigs() {
        let layout = ContigLayout::new(&[10, 0, 10]);
        assert_eq!(layout.spans_within(5, 15), vec![(0, 5, 9), (2, 10, 15)]);
    }
}
