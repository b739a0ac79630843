//! Error types for the `covert-world` crate.
//!
//! Only construction and editing of the grid can fail. Queries against
//! out-of-bounds points answer "nothing there" instead of erroring, since
//! cascading effects routinely reach past the map edge.

use covert_types::Point;

/// Errors that can occur while building or editing a tile map.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The map has a zero dimension or is too large to index.
    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A point lies outside the map.
    #[error("point {0} is outside the map")]
    OutOfBounds(Point),

    /// An ASCII layout contained a character with no tile meaning.
    #[error("unknown tile glyph {glyph:?} at {at}")]
    UnknownGlyph {
        /// The offending character.
        glyph: char,
        /// Where it appeared.
        at: Point,
    },

    /// ASCII layout rows have different lengths.
    #[error("row {row} has length {found}, expected {expected}")]
    RaggedRow {
        /// Row index.
        row: u32,
        /// Length of the first row.
        expected: u32,
        /// Length of this row.
        found: u32,
    },
}
