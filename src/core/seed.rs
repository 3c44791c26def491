use serde::{Deserialize, Serialize};

use crate::core::types::ReadId;

/// A local match between a read and the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Offset on the read
    pub start: u64,

    /// Offset on the reference. For reverse-strand seeds this is the rightmost
    /// reference base, the seed extends leftwards from here.
    pub start_ref: u64,

    pub size: u64,

    pub on_forward_strand: bool,

    /// Index of the seeding pass that produced this seed
    #[serde(default)]
    pub layer: u32,
}

impl Seed {
    #[must_use]
    pub fn forward(start: u64, start_ref: u64, size: u64) -> Self {
        Self {
            start,
            start_ref,
            size,
            on_forward_strand: true,
            layer: 0,
        }
    }

    #[must_use]
    pub fn reverse(start: u64, start_ref: u64, size: u64) -> Self {
        Self {
            start,
            start_ref,
            size,
            on_forward_strand: false,
            layer: 0,
        }
    }

    /// Leftmost reference base covered by the seed
    #[must_use]
    pub fn ref_first(&self) -> i64 {
        if self.on_forward_strand {
            to_signed(self.start_ref)
        } else {
            to_signed(self.start_ref) - to_signed(self.size) + 1
        }
    }

    /// Rightmost reference base covered by the seed
    #[must_use]
    pub fn ref_last(&self) -> i64 {
        self.ref_first() + to_signed(self.size) - 1
    }
}

/// Reference coordinates are bounded by the genome size, far below `i64::MAX`
#[inline]
pub(crate) fn to_signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// A sequencing read as fetched from the call store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Read {
    pub id: ReadId,

    /// Base sequence (ASCII nucleotides)
    pub sequence: String,
}
