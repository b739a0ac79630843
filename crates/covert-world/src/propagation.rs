//! Spatial searches over the tile grid.
//!
//! These are the grid queries the stimulus engine builds its cascades
//! from: flood fill over a predicate, filtered cardinal neighbors, the
//! ring-by-ring wave used for explosions and sound, and the flood-fill
//! rings used to spill liquids.
//!
//! All searches are breadth-first, so results come out ordered by
//! distance from the origin, and every tile appears at most once.

use std::collections::{BTreeSet, VecDeque};

use covert_types::Point;

use crate::tile_map::TileMap;

impl TileMap {
    /// Flood-fill the cardinal-connected region around `origin`.
    ///
    /// The origin is always part of the region (when inside the map); the
    /// search expands only into neighbors for which `predicate` holds.
    /// Results are in breadth-first order, origin first.
    pub fn get_connected(&self, origin: Point, predicate: impl Fn(Point) -> bool) -> Vec<Point> {
        if !self.contains(origin) {
            return Vec::new();
        }

        let mut visited = BTreeSet::from([origin]);
        let mut queue = VecDeque::from([origin]);
        let mut region = Vec::new();

        while let Some(current) = queue.pop_front() {
            region.push(current);
            for next in current.cardinal_neighbors() {
                if self.contains(next) && !visited.contains(&next) && predicate(next) {
                    visited.insert(next);
                    queue.push_back(next);
                }
            }
        }

        region
    }

    /// The in-bounds cardinal neighbors of `point` that satisfy `predicate`,
    /// in N, E, S, W order.
    pub fn filtered_cardinal_neighbors(
        &self,
        point: Point,
        predicate: impl Fn(Point) -> bool,
    ) -> Vec<Point> {
        point
            .cardinal_neighbors()
            .into_iter()
            .filter(|&n| self.contains(n) && predicate(n))
            .collect()
    }

    /// Propagate a wave outward from `origin`, ring by ring.
    ///
    /// Ring `k` holds the tiles first reached after `k` king-moves. The wave
    /// stops after `max_distance` rings or once its pressure (reduced by
    /// one per ring) is spent. Non-walkable tiles are reached, so doors and
    /// walls feel the wave, but only pass it on while the remaining
    /// pressure exceeds `wall_resistance`.
    pub fn wave_propagation_from(
        &self,
        origin: Point,
        max_distance: u32,
        pressure: u32,
        wall_resistance: u32,
    ) -> Vec<Vec<Point>> {
        if !self.contains(origin) {
            return Vec::new();
        }

        let mut rings = vec![vec![origin]];
        let mut visited = BTreeSet::from([origin]);
        let mut frontier = vec![origin];

        for ring in 1..=max_distance {
            if pressure.saturating_sub(ring) == 0 {
                break;
            }
            let pressure_behind = pressure.saturating_sub(ring.saturating_sub(1));

            let mut next = Vec::new();
            for &tile in &frontier {
                if !self.is_walkable(tile) && pressure_behind <= wall_resistance {
                    continue;
                }
                for neighbor in tile.all_neighbors() {
                    if self.contains(neighbor) && visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }

            if next.is_empty() {
                break;
            }
            rings.push(next.clone());
            frontier = next;
        }

        rings
    }

    /// Tiles a liquid spilled at `origin` flows into, ring by ring.
    ///
    /// Liquids flow cardinally over walkable tiles only, up to `distance`
    /// steps. Ring 0 is the origin.
    pub fn free_cells_for_distribution(&self, origin: Point, distance: u32) -> Vec<Vec<Point>> {
        if !self.contains(origin) {
            return Vec::new();
        }

        let mut rings = vec![vec![origin]];
        let mut visited = BTreeSet::from([origin]);
        let mut frontier = vec![origin];

        for _ in 0..distance {
            let mut next = Vec::new();
            for &tile in &frontier {
                for neighbor in tile.cardinal_neighbors() {
                    if self.is_walkable(neighbor) && visited.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            rings.push(next.clone());
            frontier = next;
        }

        rings
    }
}
