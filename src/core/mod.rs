//! Core data types for structural-variant breakpoint browsing.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Region`]: A clamped rectangle in breakpoint space (from axis x, to axis y)
//! - [`Jump`]: One piece of breakpoint evidence from a single read
//! - [`CallRecord`]: An SV call aggregated from supporting jumps
//! - [`Seed`], [`Read`]: Local read-to-reference matches and the reads they come from
//! - [`Contig`], [`ContigLayout`]: Contig boundaries on the concatenated reference
//! - [`Rgb`]: Display colors and the density spectrum
//!
//! ## Coordinates
//!
//! All positions are offsets on the concatenated forward strand of the reference
//! ("pack"). A breakpoint is a point `(from, to)` in the plane spanned by two copies
//! of that axis:
//!
//! | Axis | Meaning | Region fields |
//! |------|---------|---------------|
//! | x    | from position | `xs..=xe` |
//! | y    | to position   | `ys..=ye` |
//!
//! [`Region`]: region::Region
//! [`Jump`]: records::Jump
//! [`CallRecord`]: records::CallRecord
//! [`Seed`]: seed::Seed
//! [`Read`]: seed::Read
//! [`Contig`]: contig::Contig
//! [`ContigLayout`]: contig::ContigLayout
//! [`Rgb`]: color::Rgb

pub mod color;
pub mod contig;
pub mod records;
pub mod region;
pub mod seed;
pub mod types;
