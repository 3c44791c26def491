//! Selection linking between jumps and seeds.
//!
//! A seed and a jump are linked when they come from the same read and one end of
//! the seed's reference span sits on one of the jump's breakpoint anchors.
//! [`InteractionLinker::highlight`] turns a selection into a style for every jump
//! and seed of a detail render; the render model itself is never touched.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::color::{palette, Rgb};
use crate::core::seed::to_signed;
use crate::core::types::{JumpId, SeedId};
use crate::render::model::{DetailView, JumpQuad, RenderModel, SeedGlyph};

/// The element the user picked, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Jump {
        id: JumpId,
    },
    Seed {
        id: SeedId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightState {
    Default,
    Highlighted,
    Dimmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementStyle {
    pub state: HighlightState,
    pub color: Rgb,
}

impl ElementStyle {
    fn default_for(color: Rgb) -> Self {
        Self {
            state: HighlightState::Default,
            color,
        }
    }

    fn highlighted(color: Rgb) -> Self {
        Self {
            state: HighlightState::Highlighted,
            color,
        }
    }

    fn dimmed() -> Self {
        Self {
            state: HighlightState::Dimmed,
            color: palette::DIMMED,
        }
    }
}

/// Style of every jump and seed after a selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightMap {
    pub jumps: BTreeMap<JumpId, ElementStyle>,
    pub seeds: BTreeMap<SeedId, ElementStyle>,
}

impl HighlightMap {
    /// Jumps in the highlighted state
    #[must_use]
    pub fn highlighted_jumps(&self) -> BTreeSet<JumpId> {
        highlighted(&self.jumps)
    }

    /// Seeds in the highlighted state
    #[must_use]
    pub fn highlighted_seeds(&self) -> BTreeSet<SeedId> {
        highlighted(&self.seeds)
    }
}

fn highlighted<K: Copy + Ord>(styles: &BTreeMap<K, ElementStyle>) -> BTreeSet<K> {
    styles
        .iter()
        .filter(|(_, style)| style.state == HighlightState::Highlighted)
        .map(|(id, _)| *id)
        .collect()
}

/// Whether `seed` supports `jump`
#[must_use]
pub fn is_linked(seed: &SeedGlyph, jump: &JumpQuad) -> bool {
    if seed.read_id != jump.read_id {
        return false;
    }
    let anchors = [to_signed(jump.from_pos), to_signed(jump.to_pos)];
    anchors.contains(&seed.ref_first) || anchors.contains(&seed.ref_last)
}

/// Correlates a selected element with the rest of a render
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionLinker;

impl InteractionLinker {
    /// Highlight state of every jump and seed in `model` for `selection`.
    ///
    /// No selection, or a selection naming an element not in the model, yields
    /// the default style everywhere. Overview renders have no linkable elements.
    #[must_use]
    pub fn highlight(model: &RenderModel, selection: &Selection) -> HighlightMap {
        let Some(view) = model.as_detail() else {
            return HighlightMap::default();
        };
        let seeds = view
            .read_layout
            .as_ref()
            .map_or(&[][..], |layout| layout.seeds.as_slice());
        let jumps = view.jumps.quads.as_slice();

        match selection {
            Selection::Jump { id } => match jumps.iter().find(|j| j.id == *id) {
                Some(selected) => select_jump(jumps, seeds, selected),
                None => defaults(view),
            },
            Selection::Seed { id } => match seeds.iter().find(|s| s.id == *id) {
                Some(selected) => select_seed(jumps, seeds, selected),
                None => defaults(view),
            },
            Selection::None => defaults(view),
        }
    }
}

fn defaults(view: &DetailView) -> HighlightMap {
    let mut map = HighlightMap::default();
    for jump in &view.jumps.quads {
        map.jumps.insert(jump.id, ElementStyle::default_for(jump.color));
    }
    if let Some(layout) = &view.read_layout {
        for seed in &layout.seeds {
            map.seeds.insert(seed.id, ElementStyle::default_for(seed.color));
        }
    }
    map
}

fn select_jump(jumps: &[JumpQuad], seeds: &[SeedGlyph], selected: &JumpQuad) -> HighlightMap {
    let mut map = HighlightMap::default();
    for jump in jumps {
        let style = if jump.id == selected.id {
            ElementStyle::highlighted(jump.color)
        } else {
            ElementStyle::dimmed()
        };
        map.jumps.insert(jump.id, style);
    }
    for seed in seeds {
        let style = if is_linked(seed, selected) {
            ElementStyle::highlighted(seed.color)
        } else {
            ElementStyle::dimmed()
        };
        map.seeds.insert(seed.id, style);
    }
    map
}

fn select_seed(jumps: &[JumpQuad], seeds: &[SeedGlyph], selected: &SeedGlyph) -> HighlightMap {
    let mut map = HighlightMap::default();
    let same_read: Vec<&SeedGlyph> = seeds
        .iter()
        .filter(|s| s.read_id == selected.read_id)
        .collect();
    for seed in seeds {
        let style = if seed.read_id == selected.read_id {
            ElementStyle::highlighted(seed.color)
        } else {
            ElementStyle::dimmed()
        };
        map.seeds.insert(seed.id, style);
    }
    for jump in jumps {
        let style = if same_read.iter().any(|s| is_linked(s, jump)) {
            ElementStyle::highlighted(jump.color)
        } else {
            ElementStyle::dimmed()
        };
        map.jumps.insert(jump.id, style);
    }
    map
}
