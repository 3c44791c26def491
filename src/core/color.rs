//! Display colors and the wavelength spectrum used for overview density.

use serde::{Deserialize, Serialize};

use crate::core::types::JumpCategory;

/// An 8-bit RGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert unit-interval channels, truncating `x * 255` and clamping to `[0, 255]`
    #[must_use]
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Self::new(unit_to_channel(r), unit_to_channel(g), unit_to_channel(b))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_channel(x: f64) -> u8 {
    let scaled = (x * 255.0).trunc();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= 255.0 {
        255
    } else {
        scaled as u8
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| format!("invalid color '{s}': expected #rrggbb"))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|e| format!("invalid color '{s}': {e}"))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Named colors of the browser palette
pub mod palette {
    use super::Rgb;

    pub const ORANGE: Rgb = Rgb::new(0xff, 0xa5, 0x00);
    pub const BLUE: Rgb = Rgb::new(0x00, 0x00, 0xff);
    pub const LIGHT_GREEN: Rgb = Rgb::new(0x90, 0xee, 0x90);
    pub const YELLOW: Rgb = Rgb::new(0xff, 0xff, 0x00);
    pub const GREEN: Rgb = Rgb::new(0x00, 0x80, 0x00);
    pub const PURPLE: Rgb = Rgb::new(0x80, 0x00, 0x80);
    pub const RED: Rgb = Rgb::new(0xff, 0x00, 0x00);
    pub const MAGENTA: Rgb = Rgb::new(0xff, 0x00, 0xff);
    pub const LIGHT_GREY: Rgb = Rgb::new(0xd3, 0xd3, 0xd3);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);

    /// Dimmed elements after a selection
    pub const DIMMED: Rgb = LIGHT_GREY;
    /// Accepted SV calls (boxes and markers)
    pub const ACCEPTED_CALL: Rgb = MAGENTA;
    /// Ground-truth SV calls
    pub const GROUND_TRUTH_CALL: Rgb = GREEN;
    /// Fuzziness triangles
    pub const FUZZINESS: Rgb = BLACK;
}

/// Fixed display color of a jump category
#[must_use]
pub fn category_color(category: JumpCategory) -> Rgb {
    match category {
        JumpCategory::StrandSwitch => palette::ORANGE,
        JumpCategory::SameStrand => palette::BLUE,
        JumpCategory::FromOnly => palette::LIGHT_GREEN,
        JumpCategory::NeitherKnown => palette::YELLOW,
    }
}

/// Seed color by strand: green forward, purple reverse
#[must_use]
pub fn strand_color(on_forward_strand: bool) -> Rgb {
    if on_forward_strand {
        palette::GREEN
    } else {
        palette::PURPLE
    }
}

const SPECTRUM_GAMMA: f64 = 0.8;

/// Map `t` in `[0, 1]` onto the visible spectrum (violet to red).
///
/// `t` selects a wavelength `370 + t * 275` nm, which is converted to RGB by
/// piecewise-linear bands, attenuated near the spectrum edges and gamma corrected.
#[must_use]
pub fn light_spectrum(t: f64) -> Rgb {
    let w = 370.0 + t * (645.0 - 370.0);
    let (mut r, mut g, mut b) = (0.0f64, 0.0f64, 0.0f64);
    if w < 440.0 {
        r = -(w - 440.0) / (440.0 - 380.0);
        b = 1.0;
    } else if w < 490.0 {
        g = (w - 440.0) / (490.0 - 440.0);
        b = 1.0;
    } else if w < 510.0 {
        g = 1.0;
        b = -(w - 510.0) / (510.0 - 490.0);
    } else if w < 580.0 {
        r = (w - 510.0) / (580.0 - 510.0);
        g = 1.0;
    } else if w < 645.0 {
        r = 1.0;
        g = -(w - 645.0) / (645.0 - 580.0);
    } else {
        r = 1.0;
    }

    let intensity = if w > 650.0 {
        0.3 + 0.7 * (780.0 - w) / (780.0 - 650.0)
    } else if w < 420.0 {
        0.3 + 0.7 * (w - 380.0) / (420.0 - 380.0)
    } else {
        1.0
    };

    Rgb::from_unit(
        intensity * r.powf(SPECTRUM_GAMMA),
        intensity * g.powf(SPECTRUM_GAMMA),
        intensity * b.powf(SPECTRUM_GAMMA),
    )
}
