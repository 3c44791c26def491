use serde::{Deserialize, Serialize};

/// Identifier of an SV-caller run (accepted calls, ground truth, or the jump set behind them)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub i64);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a sequencing read in the call store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadId(pub i64);

impl std::fmt::Display for ReadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a single jump record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JumpId(pub i64);

impl std::fmt::Display for JumpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A seed is addressed by its read and its index among that read's seeds
/// (seeds enumerated in ascending read-space start).
///
/// Serialized as the string `READ:INDEX` so it can key JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SeedId {
    pub read_id: ReadId,
    pub index: usize,
}

impl SeedId {
    #[must_use]
    pub fn new(read_id: ReadId, index: usize) -> Self {
        Self { read_id, index }
    }
}

impl std::fmt::Display for SeedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.read_id, self.index)
    }
}

impl std::str::FromStr for SeedId {
    type Err = String;

    /// Parses the `READ:INDEX` form produced by `Display`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (read, index) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid seed id '{s}': expected READ:INDEX"))?;
        let read = read
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid read id in '{s}': {e}"))?;
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid seed index in '{s}': {e}"))?;
        Ok(Self::new(ReadId(read), index))
    }
}

impl From<SeedId> for String {
    fn from(id: SeedId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for SeedId {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Display category of a jump, in classification priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpCategory {
    /// Strand switch is known and the jump switches strand
    StrandSwitch,
    /// Strand switch is known and the jump stays on the same strand
    SameStrand,
    /// Strand switch unknown, only the from endpoint is known
    FromOnly,
    /// Neither the strand switch nor the from endpoint is known
    NeitherKnown,
}

impl JumpCategory {
    pub const ALL: [JumpCategory; 4] = [
        Self::StrandSwitch,
        Self::SameStrand,
        Self::FromOnly,
        Self::NeitherKnown,
    ];
}

impl std::fmt::Display for JumpCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrandSwitch => write!(f, "strand-switch"),
            Self::SameStrand => write!(f, "same-strand"),
            Self::FromOnly => write!(f, "from-only"),
            Self::NeitherKnown => write!(f, "neither-known"),
        }
    }
}

/// Whether a call is drawn as a single marker or as a box with a centered marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallShape {
    Point,
    Box,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_id_round_trips_through_display() {
        let id = SeedId::new(ReadId(42), 3);
        assert_eq!(id.to_string(), "42:3");
        assert_eq!("42:3".parse::<SeedId>().unwrap(), id);
    }

    #[test]
    fn test_seed_id_serializes_as_string() {
        let id = SeedId::new(ReadId(7), 0);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7:0\"");
        let back: SeedId = serde_json::from_str("\"7:0\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_seed_id_rejects_garbage() {
        assert!("42".parse::<SeedId>().is_err());
        assert!("a:1".parse::<SeedId>().is_err());
        assert!("1:-1".parse::<SeedId>().is_err());
    }

    #[test]
    fn test_category_display() {
        assert_eq!(JumpCategory::StrandSwitch.to_string(), "strand-switch");
        assert_eq!(JumpCategory::NeitherKnown.to_string(), "neither-known");
    }
}
