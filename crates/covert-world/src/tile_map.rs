//! The level grid.
//!
//! [`TileMap`] stores tiles row-major and answers the point queries the
//! stimulus engine needs: walkability, zones, and the per-tile stimulus
//! set. Spatial searches (flood fill, waves) live in
//! [`propagation`](crate::propagation).

use covert_types::{Point, Stimulus, StimulusType, Zone};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;
use crate::tile::Tile;

/// Force of liquids and voltage placed by an ASCII layout.
pub const LAYOUT_STIMULUS_FORCE: u32 = 50;

/// A rectangular grid of tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Create a map of public floor tiles.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either dimension is zero
    /// or the tile count does not fit in memory indices.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        let count = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .filter(|&n| n > 0)
            .ok_or(WorldError::InvalidDimensions { width, height })?;
        // Every coordinate must also fit in an i32.
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            tiles: vec![Tile::floor(Zone::Public); count],
        })
    }

    /// Parse a map from an ASCII layout, one row per line.
    ///
    /// | Glyph | Tile |
    /// |-------|------|
    /// | `#` | wall |
    /// | `.` | public floor |
    /// | `r` | restricted floor |
    /// | `h` | hostile floor |
    /// | `~` | public floor with water |
    /// | `o` | public floor with burnable liquid |
    /// | `b` | public floor with blood |
    /// | `x` | public floor with live voltage |
    ///
    /// Leading and trailing blank lines are ignored, as is leading
    /// whitespace on each row.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownGlyph`] or [`WorldError::RaggedRow`]
    /// for malformed layouts.
    pub fn from_ascii(layout: &str) -> Result<Self, WorldError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let height = u32::try_from(rows.len()).map_err(|_err| WorldError::InvalidDimensions {
            width: 0,
            height: u32::MAX,
        })?;
        let width = rows
            .first()
            .map_or(0, |row| u32::try_from(row.chars().count()).unwrap_or(u32::MAX));

        let mut map = Self::new(width, height)?;

        for (y, row) in rows.iter().enumerate() {
            let row_index = u32::try_from(y).unwrap_or(u32::MAX);
            let found = u32::try_from(row.chars().count()).unwrap_or(u32::MAX);
            if found != width {
                return Err(WorldError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let at = Point::new(
                    i32::try_from(x).unwrap_or(i32::MAX),
                    i32::try_from(y).unwrap_or(i32::MAX),
                );
                let tile = glyph_tile(glyph).ok_or(WorldError::UnknownGlyph { glyph, at })?;
                if let Some(slot) = map.tile_mut(at) {
                    *slot = tile;
                }
            }
        }

        Ok(map)
    }

    /// Map width in tiles.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height in tiles.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether `point` lies inside the map.
    pub fn contains(&self, point: Point) -> bool {
        self.index(point).is_some()
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x = u32::try_from(point.x).ok()?;
        let y = u32::try_from(point.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = usize::try_from(y).ok()?.checked_mul(usize::try_from(self.width).ok()?)?;
        row.checked_add(usize::try_from(x).ok()?)
    }

    /// The tile at `point`.
    pub fn tile(&self, point: Point) -> Option<&Tile> {
        self.index(point).and_then(|i| self.tiles.get(i))
    }

    /// The tile at `point`, mutably.
    pub fn tile_mut(&mut self, point: Point) -> Option<&mut Tile> {
        self.index(point).and_then(|i| self.tiles.get_mut(i))
    }

    /// Every point of the map, row-major.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let width = i32::try_from(self.width).unwrap_or(0);
        let height = i32::try_from(self.height).unwrap_or(0);
        (0..height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
    }

    /// Whether `point` is inside the map and walkable.
    pub fn is_walkable(&self, point: Point) -> bool {
        self.tile(point).is_some_and(|t| t.walkable)
    }

    /// Change walkability (doors opening, walls collapsing).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `point` is outside the map.
    pub fn set_walkable(&mut self, point: Point, walkable: bool) -> Result<(), WorldError> {
        let tile = self.tile_mut(point).ok_or(WorldError::OutOfBounds(point))?;
        tile.walkable = walkable;
        Ok(())
    }

    /// The zone at `point`. Points outside the map are public.
    pub fn zone(&self, point: Point) -> Zone {
        self.tile(point).map_or(Zone::Public, |t| t.zone)
    }

    /// Change the zone at `point`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if `point` is outside the map.
    pub fn set_zone(&mut self, point: Point, zone: Zone) -> Result<(), WorldError> {
        let tile = self.tile_mut(point).ok_or(WorldError::OutOfBounds(point))?;
        tile.zone = zone;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Stimulus set
    // -------------------------------------------------------------------

    /// Whether a stimulus of `kind` is recorded at `point`.
    pub fn is_stimulus_on_tile(&self, point: Point, kind: StimulusType) -> bool {
        self.tile(point).is_some_and(|t| t.has(kind))
    }

    /// The stimulus of `kind` recorded at `point`, if any.
    pub fn stimulus_on_tile(&self, point: Point, kind: StimulusType) -> Option<Stimulus> {
        self.tile(point).and_then(|t| t.get(kind))
    }

    /// Record `stimulus` at `point`. Returns `false` if the point is
    /// outside the map.
    pub fn add_stimulus_to_tile(&mut self, point: Point, stimulus: Stimulus) -> bool {
        let Some(tile) = self.tile_mut(point) else {
            debug!(%point, kind = ?stimulus.kind, "Stimulus dropped outside map");
            return false;
        };
        tile.insert(stimulus);
        true
    }

    /// Remove the stimulus of `kind` at `point`, returning it if present.
    pub fn remove_stimulus_from_tile(&mut self, point: Point, kind: StimulusType) -> Option<Stimulus> {
        self.tile_mut(point).and_then(|t| t.remove(kind))
    }
}

/// Translate one layout glyph into a tile.
fn glyph_tile(glyph: char) -> Option<Tile> {
    let with = |kind: StimulusType| {
        let mut tile = Tile::floor(Zone::Public);
        tile.insert(Stimulus::new(kind, LAYOUT_STIMULUS_FORCE));
        tile
    };
    match glyph {
        '#' => Some(Tile::wall()),
        '.' => Some(Tile::floor(Zone::Public)),
        'r' => Some(Tile::floor(Zone::Restricted)),
        'h' => Some(Tile::floor(Zone::Hostile)),
        '~' => Some(with(StimulusType::Water)),
        'o' => Some(with(StimulusType::BurnableLiquid)),
        'b' => Some(with(StimulusType::Blood)),
        'x' => Some(with(StimulusType::HighVoltage)),
        _ => None,
    }
}
