//! Visibility queries.
//!
//! Field-of-vision geometry is not simulated here. The perception pass
//! consumes it through the [`Vision`] trait as three black-box questions.
//! [`RadiusVision`] is a simple stand-in: square range, no occlusion, and
//! a half-plane cone in front of the actor.

use covert_agents::Actor;
use covert_types::Point;
use covert_world::TileMap;

/// Source of "can this actor see that point" answers.
pub trait Vision: core::fmt::Debug {
    /// Whether `observer` has an unobstructed line to `point`.
    fn can_see(&self, observer: &Actor, point: Point, map: &TileMap) -> bool;

    /// Whether `point` lies inside the observer's vision cone.
    fn can_see_in_vision_cone(&self, observer: &Actor, point: Point) -> bool;

    /// How far the observer can see, in tiles.
    fn vision_range(&self, observer: &Actor) -> u32;
}

/// Chebyshev-radius vision with a facing half-plane cone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiusVision {
    range: u32,
}

impl RadiusVision {
    /// Vision reaching `range` tiles.
    pub const fn new(range: u32) -> Self {
        Self { range }
    }
}

impl Vision for RadiusVision {
    fn can_see(&self, observer: &Actor, point: Point, map: &TileMap) -> bool {
        map.contains(point) && observer.position.chebyshev_distance(point) <= self.range
    }

    fn can_see_in_vision_cone(&self, observer: &Actor, point: Point) -> bool {
        let origin = observer.position;
        if origin.chebyshev_distance(point) > self.range {
            return false;
        }
        let (fx, fy) = observer.facing.delta();
        let dx = i64::from(point.x).saturating_sub(i64::from(origin.x));
        let dy = i64::from(point.y).saturating_sub(i64::from(origin.y));
        dx.saturating_mul(i64::from(fx))
            .saturating_add(dy.saturating_mul(i64::from(fy)))
            >= 0
    }

    fn vision_range(&self, _observer: &Actor) -> u32 {
        self.range
    }
}
