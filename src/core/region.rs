use serde::{Deserialize, Serialize};

/// A rectangle in breakpoint space: the x axis holds "from" positions, the y axis "to" positions.
///
/// Coordinates are offsets on the concatenated forward-strand reference. Both ends are
/// inclusive, so a region with `xs == xe` still covers one column. A `Region` is always
/// clamped to `[0, total_size]` and has `xs <= xe`, `ys <= ye`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub xs: u64,
    pub ys: u64,
    pub xe: u64,
    pub ye: u64,
}

/// Clamp a signed coordinate into `[0, total_size]`
fn clamp_coordinate(value: i64, total_size: u64) -> u64 {
    u64::try_from(value).map_or(0, |v| v.min(total_size))
}

impl Region {
    /// Build a region from raw viewport coordinates.
    ///
    /// Negative inputs become 0 and everything is capped at `total_size`. An inverted
    /// axis (end before start) collapses to its start.
    #[must_use]
    pub fn clamp(xs: i64, ys: i64, xe: i64, ye: i64, total_size: u64) -> Self {
        let xs = clamp_coordinate(xs, total_size);
        let ys = clamp_coordinate(ys, total_size);
        let xe = clamp_coordinate(xe, total_size).max(xs);
        let ye = clamp_coordinate(ye, total_size).max(ys);
        Self { xs, ys, xe, ye }
    }

    /// Width `xe - xs`
    #[must_use]
    pub fn width(&self) -> u64 {
        self.xe - self.xs
    }

    /// Height `ye - ys`
    #[must_use]
    pub fn height(&self) -> u64 {
        self.ye - self.ys
    }

    /// Expand by one width left and right and one height up and down, clamped to the genome.
    #[must_use]
    pub fn padded(&self, total_size: u64) -> Self {
        let w = self.width();
        let h = self.height();
        Self {
            xs: self.xs.saturating_sub(w),
            ys: self.ys.saturating_sub(h),
            xe: self.xe.saturating_add(w).min(total_size),
            ye: self.ye.saturating_add(h).min(total_size),
        }
    }

    /// Whether the point `(x, y)` lies inside the region (inclusive bounds)
    #[must_use]
    pub fn contains_point(&self, x: u64, y: u64) -> bool {
        (self.xs..=self.xe).contains(&x) && (self.ys..=self.ye).contains(&y)
    }

    /// Whether the half-open rectangle `[x, x + w) x [y, y + h)` overlaps the region
    #[must_use]
    pub fn intersects(&self, x: u64, y: u64, w: u64, h: u64) -> bool {
        x <= self.xe
            && x.saturating_add(w.max(1)) > self.xs
            && y <= self.ye
            && y.saturating_add(h.max(1)) > self.ys
    }

    /// The reference diagonal `(s, e)` drawn through the padded view
    #[must_use]
    pub fn diagonal(&self, total_size: u64) -> (u64, u64) {
        let w = self.width();
        let h = self.height();
        let s = self.xs.saturating_sub(w).min(self.ys.saturating_sub(h));
        let e = self
            .xe
            .saturating_add(w)
            .max(self.ye.saturating_add(h))
            .min(total_size);
        (s, e)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}..={}] x [{}..={}]", self.xs, self.xe, self.ys, self.ye)
    }
}
