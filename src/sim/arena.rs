//! Arena geometry
//!
//! The playable interior is derived from four boundary walls given in any
//! order: the inner edge of each wall becomes one side of the interior.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axis-aligned box in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

/// Playable interior rectangle
pub type ArenaBounds = Aabb;

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strictly positive extent on both axes
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Shrink every side by `inset`
    pub fn shrink(&self, inset: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(inset),
            max: self.max - Vec2::splat(inset),
        }
    }

    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Walls can't be turned into a usable interior
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArenaError {
    #[error("need at least 4 boundary colliders (top/bottom/left/right), found {found}")]
    TooFewColliders { found: usize },
    #[error("derived inner bounds are empty or inverted ({width} x {height}); check wall layout")]
    Degenerate { width: f32, height: f32 },
}

/// Derive the interior rectangle from the inner edges of the boundary walls.
///
/// Walls are classified by center: highest is top, lowest bottom, leftmost
/// left, rightmost right. Ties keep the first wall seen.
pub fn resolve_inner_bounds(colliders: &[Aabb]) -> Result<ArenaBounds, ArenaError> {
    if colliders.len() < 4 {
        return Err(ArenaError::TooFewColliders {
            found: colliders.len(),
        });
    }

    let first = &colliders[0];
    let (mut top, mut bottom, mut left, mut right) = (first, first, first, first);
    for c in colliders {
        let p = c.center();
        if p.y > top.center().y {
            top = c;
        }
        if p.y < bottom.center().y {
            bottom = c;
        }
        if p.x < left.center().x {
            left = c;
        }
        if p.x > right.center().x {
            right = c;
        }
    }

    let inner = Aabb::new(
        Vec2::new(left.max.x, bottom.max.y),
        Vec2::new(right.min.x, top.min.y),
    );
    if !inner.is_valid() {
        return Err(ArenaError::Degenerate {
            width: inner.width(),
            height: inner.height(),
        });
    }
    Ok(inner)
}

/// Resolved arena: walls plus the interior they enclose
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Interior rectangle (fallback square if the walls were unusable)
    pub bounds: ArenaBounds,
    /// Whether `bounds` came from the walls
    pub resolved: bool,
    /// Boundary colliders
    pub walls: Vec<Aabb>,
}

impl Arena {
    /// Resolve the interior, falling back to `fallback` with a warning
    pub fn from_colliders(walls: Vec<Aabb>, fallback: ArenaBounds) -> Self {
        match resolve_inner_bounds(&walls) {
            Ok(bounds) => {
                log::info!(
                    "Arena interior: ({:.2}, {:.2}) .. ({:.2}, {:.2})",
                    bounds.min.x,
                    bounds.min.y,
                    bounds.max.x,
                    bounds.max.y
                );
                Self {
                    bounds,
                    resolved: true,
                    walls,
                }
            }
            Err(e) => {
                log::warn!("{e}; using fallback bounds");
                Self {
                    bounds: fallback,
                    resolved: false,
                    walls,
                }
            }
        }
    }

    /// Four walls of `thickness` enclosing a `width` x `height` interior centered at the origin
    pub fn standard_walls(width: f32, height: f32, thickness: f32) -> Vec<Aabb> {
        let hw = width * 0.5;
        let hh = height * 0.5;
        let t = thickness;
        vec![
            // top
            Aabb::new(Vec2::new(-hw - t, hh), Vec2::new(hw + t, hh + t)),
            // bottom
            Aabb::new(Vec2::new(-hw - t, -hh - t), Vec2::new(hw + t, -hh)),
            // left
            Aabb::new(Vec2::new(-hw - t, -hh), Vec2::new(-hw, hh)),
            // right
            Aabb::new(Vec2::new(hw, -hh), Vec2::new(hw + t, hh)),
        ]
    }

    /// Unit normal of wall `index` pointing into the interior.
    ///
    /// Walls push along their thin axis, toward the interior center.
    pub fn wall_normal(&self, index: usize) -> Vec2 {
        let Some(wall) = self.walls.get(index) else {
            return Vec2::ZERO;
        };
        let to_center = self.bounds.center() - wall.center();
        let sign = |v: f32| if v < 0.0 { -1.0 } else { 1.0 };
        if wall.width() < wall.height() {
            Vec2::new(sign(to_center.x), 0.0)
        } else {
            Vec2::new(0.0, sign(to_center.y))
        }
    }

    /// Bounds used for the projectile exit check; `None` disables it
    pub fn despawn_bounds(&self, inset: f32) -> Option<Aabb> {
        self.resolved.then(|| self.bounds.shrink(inset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_resolve_standard_walls() {
        let walls = Arena::standard_walls(20.0, 10.0, 1.0);
        let b = resolve_inner_bounds(&walls).unwrap();
        assert_eq!(b.min, Vec2::new(-10.0, -5.0));
        assert_eq!(b.max, Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_resolve_is_order_independent() {
        let mut walls = Arena::standard_walls(8.0, 6.0, 0.5);
        let a = resolve_inner_bounds(&walls).unwrap();
        walls.reverse();
        walls.swap(0, 2);
        let b = resolve_inner_bounds(&walls).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_few_colliders() {
        let walls = Arena::standard_walls(8.0, 6.0, 0.5);
        assert_eq!(
            resolve_inner_bounds(&walls[..3]),
            Err(ArenaError::TooFewColliders { found: 3 })
        );
    }

    #[test]
    fn test_inverted_walls_are_degenerate() {
        // Left wall placed right of the right wall
        let walls = vec![
            Aabb::new(Vec2::new(-5.0, 4.0), Vec2::new(5.0, 5.0)),
            Aabb::new(Vec2::new(-5.0, -5.0), Vec2::new(5.0, -4.0)),
            Aabb::new(Vec2::new(-1.0, -4.0), Vec2::new(2.0, 4.0)),
            Aabb::new(Vec2::new(1.0, -4.0), Vec2::new(3.0, 4.0)),
        ];
        assert!(matches!(
            resolve_inner_bounds(&walls),
            Err(ArenaError::Degenerate { .. })
        ));
    }

    #[test]
    fn test_fallback_disables_despawn_bounds() {
        let fallback = Aabb::from_center(Vec2::ZERO, Vec2::splat(5.0));
        let arena = Arena::from_colliders(Vec::new(), fallback);
        assert!(!arena.resolved);
        assert_eq!(arena.bounds, fallback);
        assert!(arena.despawn_bounds(0.05).is_none());

        let arena = Arena::from_colliders(Arena::standard_walls(4.0, 4.0, 1.0), fallback);
        assert!(arena.resolved);
        assert!(arena.despawn_bounds(0.05).is_some());
    }

    #[test]
    fn test_wall_normals_face_inward() {
        let fallback = Aabb::from_center(Vec2::ZERO, Vec2::splat(5.0));
        let arena = Arena::from_colliders(Arena::standard_walls(20.0, 12.0, 1.0), fallback);
        assert_eq!(arena.wall_normal(0), Vec2::NEG_Y);
        assert_eq!(arena.wall_normal(1), Vec2::Y);
        assert_eq!(arena.wall_normal(2), Vec2::X);
        assert_eq!(arena.wall_normal(3), Vec2::NEG_X);
        assert_eq!(arena.wall_normal(4), Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_inner_bounds_positive_and_enclosed(
            cx in -50.0f32..50.0,
            cy in -50.0f32..50.0,
            w in 0.5f32..40.0,
            h in 0.5f32..40.0,
            t in 0.1f32..5.0,
            rot in 0usize..4,
        ) {
            let mut walls: Vec<Aabb> = Arena::standard_walls(w, h, t)
                .into_iter()
                .map(|b| Aabb::new(b.min + Vec2::new(cx, cy), b.max + Vec2::new(cx, cy)))
                .collect();
            walls.rotate_left(rot);

            let inner = resolve_inner_bounds(&walls).unwrap();
            prop_assert!(inner.width() > 0.0);
            prop_assert!(inner.height() > 0.0);

            let hull = walls.iter().skip(1).fold(walls[0], |acc, b| acc.union(b));
            prop_assert!(hull.contains(inner.min));
            prop_assert!(hull.contains(inner.max));
        }
    }
}
