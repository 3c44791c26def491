//! Reference bases along the two flanking strips of the breakpoint plot.

use crate::core::color::{palette, Rgb};
use crate::core::records::count_to_f64;
use crate::core::region::Region;
use crate::render::config::RenderConfig;
use crate::render::model::{BaseGlyph, SequenceTracks};
use crate::store::{Pack, StoreError};

/// Display color of a reference base, case-insensitive
#[must_use]
pub fn base_color(base: u8) -> Rgb {
    match base.to_ascii_uppercase() {
        b'A' => palette::BLUE,
        b'C' => palette::RED,
        b'G' => palette::GREEN,
        b'T' => palette::YELLOW,
        _ => palette::LIGHT_GREEN,
    }
}

fn strip(pack: &dyn Pack, start: u64, end: u64) -> Result<Vec<BaseGlyph>, StoreError> {
    let bases = pack.extract_bases(start, end)?;
    Ok(bases
        .iter()
        .zip(start..)
        .map(|(&base, pos)| BaseGlyph {
            pos,
            center: count_to_f64(pos) + 0.5,
            symbol: char::from(base),
            color: base_color(base),
        })
        .collect())
}

/// Builds the color-coded base strips for a viewport
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceTrackBuilder;

impl SequenceTrackBuilder {
    /// Bases over the padded extent of `region` on both axes.
    ///
    /// Returns `Ok(None)` unless `3w + 3h` is below the element budget.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the pack cannot deliver the bases.
    pub fn build(
        pack: &dyn Pack,
        region: &Region,
        config: &RenderConfig,
    ) -> Result<Option<SequenceTracks>, StoreError> {
        let (w, h) = (region.width(), region.height());
        let extent = w.saturating_mul(3).saturating_add(h.saturating_mul(3));
        if extent >= config.max_num_ele {
            tracing::debug!(
                "Skipping sequence tracks: extent {} exceeds the budget of {}",
                extent,
                config.max_num_ele
            );
            return Ok(None);
        }

        let total_size = pack.total_size();
        let span = |start: u64, end: u64, pad: u64| {
            (
                start.saturating_sub(pad),
                end.saturating_add(pad).saturating_add(1).min(total_size),
            )
        };
        let (ys, ye) = span(region.ys, region.ye, h);
        let (xs, xe) = span(region.xs, region.xe, w);

        Ok(Some(SequenceTracks {
            vertical: strip(pack, ys, ye)?,
            horizontal: strip(pack, xs, xe)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryPack;

    fn pack() -> InMemoryPack {
        let mut pack = InMemoryPack::new();
        pack.add_contig("chr1", b"ACGTacgtNNACGTACGTAC");
        pack
    }

    #[test]
    fn test_base_colors() {
        assert_eq!(base_color(b'A'), palette::BLUE);
        assert_eq!(base_color(b'c'), palette::RED);
        assert_eq!(base_color(b'g'), palette::GREEN);
        assert_eq!(base_color(b'T'), palette::YELLOW);
        let fallback = base_color(b'N');
        for base in b"ACGT" {
            assert_ne!(fallback, base_color(*base));
        }
    }

    #[test]
    fn test_tracks_cover_padded_extent() {
        let pack = pack();
        let region = Region::clamp(6, 2, 8, 3, pack.total_size());
        let tracks = SequenceTrackBuilder::build(&pack, &region, &RenderConfig::default())
            .unwrap()
            .unwrap();

        // [6 - 2, 8 + 2 + 1)
        let xs: Vec<u64> = tracks.horizontal.iter().map(|b| b.pos).collect();
        assert_eq!(xs, (4..11).collect::<Vec<_>>());
        // [2 - 1, 3 + 1 + 1)
        assert_eq!(tracks.vertical.first().map(|b| b.pos), Some(1));
        assert_eq!(tracks.vertical.len(), 4);

        let n = tracks.horizontal.iter().find(|b| b.pos == 8).unwrap();
        assert_eq!(n.symbol, 'N');
        assert_eq!(n.center, 8.5);
        assert_eq!(tracks.horizontal[0].symbol, 'a');
    }

    #[test]
    fn test_tracks_clamped_to_genome() {
        let pack = pack();
        let region = Region::clamp(15, 0, 20, 5, pack.total_size());
        let tracks = SequenceTrackBuilder::build(&pack, &region, &RenderConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(tracks.horizontal.last().map(|b| b.pos), Some(19));
        assert_eq!(tracks.vertical.first().map(|b| b.pos), Some(0));
    }

    #[test]
    fn test_budget_skips_tracks() {
        let pack = pack();
        let region = Region::clamp(0, 0, 10, 10, pack.total_size());
        let config = RenderConfig {
            max_num_ele: 60,
            ..RenderConfig::default()
        };
        assert!(SequenceTrackBuilder::build(&pack, &region, &config)
            .unwrap()
            .is_none());
    }
}
