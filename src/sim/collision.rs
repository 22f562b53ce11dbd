//! Collision detection
//!
//! Two interchangeable strategies: axis-aligned boxes for continuous games
//! and cell equality for grid games. Both are pure and O(1) per pair.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind, EntityStore};

/// Pairwise collision test
pub trait Collide {
    fn collides(&self, other: &Self) -> bool;
}

/// Axis-aligned bounding box (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Box of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }
}

impl Collide for Aabb {
    /// Strict overlap on both axes; touching edges do not collide
    fn collides(&self, other: &Self) -> bool {
        aabb_overlap(self, other)
    }
}

impl Collide for IVec2 {
    fn collides(&self, other: &Self) -> bool {
        self == other
    }
}

#[inline]
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.min.x < b.min.x + b.size.x
        && a.min.x + a.size.x > b.min.x
        && a.min.y < b.min.y + b.size.y
        && a.min.y + a.size.y > b.min.y
}

/// Whether `cell` appears anywhere in `trail`
pub fn cell_in_trail(cell: IVec2, trail: &[IVec2]) -> bool {
    trail.iter().any(|c| c.collides(&cell))
}

/// Broad phase: every overlapping (a, b) pair between two entity kinds.
/// O(n·m); entities without a size never collide.
pub fn overlapping_pairs(
    store: &EntityStore,
    kind_a: EntityKind,
    kind_b: EntityKind,
) -> Vec<(EntityId, EntityId)> {
    let mut pairs = Vec::new();
    for a in store.of_kind(kind_a) {
        let Some(box_a) = a.aabb() else { continue };
        for b in store.of_kind(kind_b) {
            if let Some(box_b) = b.aabb()
                && box_a.collides(&box_b)
            {
                pairs.push((a.id, b.id));
            }
        }
    }
    pairs
}

/// Why a grid racer's next head position is fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crash {
    Wall,
    OwnTrail,
    OpponentTrail,
    /// Both racers entered the same cell on the same tick
    HeadOn,
}

/// Classify the next heads of two grid racers against the trails as they
/// were *before* this tick. Neither new head is part of either trail yet,
/// so evaluation order between the racers cannot matter. A head-on entry
/// overrides any trail or wall result for both racers.
pub fn resolve_duel(
    next_heads: [IVec2; 2],
    trails: [&[IVec2]; 2],
    bounds: IVec2,
) -> [Option<Crash>; 2] {
    if next_heads[0].collides(&next_heads[1]) {
        return [Some(Crash::HeadOn), Some(Crash::HeadOn)];
    }

    let classify = |me: usize| {
        let head = next_heads[me];
        let other = 1 - me;
        if head.x < 0 || head.y < 0 || head.x >= bounds.x || head.y >= bounds.y {
            Some(Crash::Wall)
        } else if cell_in_trail(head, trails[me]) {
            Some(Crash::OwnTrail)
        } else if cell_in_trail(head, trails[other]) {
            Some(Crash::OpponentTrail)
        } else {
            None
        }
    };

    [classify(0), classify(1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = Aabb::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        assert!(a.collides(&b));
        assert!(b.collides(&a));
    }

    #[test]
    fn test_aabb_touching_edges_do_not_collide() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let right = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        let below = Aabb::new(Vec2::new(0.0, 10.0), Vec2::new(10.0, 10.0));
        assert!(!a.collides(&right));
        assert!(!a.collides(&below));
    }

    #[test]
    fn test_aabb_needs_both_axes() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        // x overlaps, y does not
        let b = Aabb::new(Vec2::new(2.0, 20.0), Vec2::new(4.0, 4.0));
        assert!(!a.collides(&b));
    }

    #[test]
    fn test_centered() {
        let b = Aabb::centered(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0));
        assert_eq!(b.min, Vec2::new(8.0, 9.0));
        assert_eq!(b.center(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_grid_equality() {
        assert!(IVec2::new(3, 4).collides(&IVec2::new(3, 4)));
        assert!(!IVec2::new(3, 4).collides(&IVec2::new(4, 3)));
    }

    #[test]
    fn test_overlapping_pairs() {
        use crate::sim::entity::Spawn;

        let mut store = EntityStore::new();
        let bullet = store.spawn(
            EntityKind::Bullet,
            Spawn::at(Vec2::new(5.0, 5.0)).with_size(Vec2::new(4.0, 15.0)),
        );
        let hit = store.spawn(
            EntityKind::Enemy,
            Spawn::at(Vec2::new(0.0, 0.0)).with_size(Vec2::new(40.0, 40.0)),
        );
        store.spawn(
            EntityKind::Enemy,
            Spawn::at(Vec2::new(200.0, 0.0)).with_size(Vec2::new(40.0, 40.0)),
        );
        // No size: never collides
        store.spawn(EntityKind::Enemy, Spawn::at(Vec2::new(5.0, 5.0)));

        let pairs = overlapping_pairs(&store, EntityKind::Bullet, EntityKind::Enemy);
        assert_eq!(pairs, vec![(bullet, hit)]);
    }

    #[test]
    fn test_duel_head_on_overrides_trail() {
        let trail_a = [IVec2::new(4, 5), IVec2::new(5, 5)];
        // B's trail already contains the meeting cell
        let trail_b = [IVec2::new(6, 6), IVec2::new(7, 5)];
        let meet = IVec2::new(6, 5);
        let result = resolve_duel([meet, meet], [&trail_a[..], &trail_b[..]], IVec2::new(30, 30));
        assert_eq!(result, [Some(Crash::HeadOn), Some(Crash::HeadOn)]);
    }

    #[test]
    fn test_duel_trail_and_wall() {
        let trail_a = [IVec2::new(0, 0), IVec2::new(1, 0)];
        let trail_b = [IVec2::new(5, 5), IVec2::new(5, 6)];
        let result = resolve_duel(
            [IVec2::new(-1, 0), IVec2::new(1, 0)],
            [&trail_a[..], &trail_b[..]],
            IVec2::new(30, 30),
        );
        assert_eq!(result, [Some(Crash::Wall), Some(Crash::OpponentTrail)]);
    }

    #[test]
    fn test_duel_own_trail() {
        let trail_a = [IVec2::new(2, 2), IVec2::new(3, 2), IVec2::new(3, 3), IVec2::new(2, 3)];
        let trail_b = [IVec2::new(20, 20)];
        let result = resolve_duel(
            [IVec2::new(2, 2), IVec2::new(21, 20)],
            [&trail_a[..], &trail_b[..]],
            IVec2::new(30, 30),
        );
        assert_eq!(result, [Some(Crash::OwnTrail), None]);
    }
}
