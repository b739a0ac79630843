//! Tile grid and spatial propagation for the Covert simulation.
//!
//! This crate models the physical level: a rectangular grid of tiles, each
//! with walkability, an access zone, and a persistent stimulus set (fire,
//! water, burnable liquid, blood, voltage). It knows nothing about actors
//! or items; the stimulus engine in `covert-core` decides what a stimulus
//! does and uses this crate only to query and mutate tiles.
//!
//! # Modules
//!
//! - [`error`] -- Error types for map construction and editing.
//! - [`tile`] -- [`Tile`]: one cell and its stimulus set.
//! - [`tile_map`] -- [`TileMap`]: the grid, point queries, ASCII layouts.
//! - [`propagation`] -- Flood fill, neighbor filters, explosion/sound
//!   waves, and liquid distribution rings.

pub mod error;
pub mod propagation;
pub mod tile;
pub mod tile_map;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use tile::Tile;
pub use tile_map::{LAYOUT_STIMULUS_FORCE, TileMap};
