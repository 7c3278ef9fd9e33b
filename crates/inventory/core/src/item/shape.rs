//! Relative-coordinate occupancy patterns for item templates.

use crate::common::Position;

/// The shape of an item as a set of relative grid positions.
///
/// Positions are not required to contain the origin; [`ItemShape::normalize`]
/// produces the translation with minimum x and minimum y at zero. Definition
/// order is preserved because it breaks ties in [`ItemShape::anchor`].
///
/// A single-position shape behaves as an ordinary 1x1 item. An empty shape is
/// representable (e.g. a template still being authored) but is rejected by
/// every placement path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemShape {
    positions: Vec<Position>,
}

impl ItemShape {
    /// Creates a shape from relative positions, dropping duplicates while
    /// preserving first-occurrence order.
    pub fn new(positions: impl IntoIterator<Item = Position>) -> Self {
        let mut unique: Vec<Position> = Vec::new();
        for position in positions {
            if !unique.contains(&position) {
                unique.push(position);
            }
        }
        Self { positions: unique }
    }

    /// Convenience constructor from `(x, y)` pairs.
    pub fn from_coords(coords: impl IntoIterator<Item = (i32, i32)>) -> Self {
        Self::new(coords.into_iter().map(|(x, y)| Position::new(x, y)))
    }

    /// The canonical 1x1 shape.
    pub fn single() -> Self {
        Self {
            positions: vec![Position::ORIGIN],
        }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns true if this shape can be placed at all (non-empty).
    pub fn is_placeable(&self) -> bool {
        !self.positions.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    /// Arithmetic mean of all positions. `(0.0, 0.0)` for the empty shape.
    pub fn centroid(&self) -> (f32, f32) {
        if self.positions.is_empty() {
            return (0.0, 0.0);
        }
        let count = self.positions.len() as f32;
        let (sum_x, sum_y) = self
            .positions
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sy), p| {
                (sx + p.x as f32, sy + p.y as f32)
            });
        (sum_x / count, sum_y / count)
    }

    /// The canonical representative cell of this shape: the position closest
    /// to the centroid, with ties broken by definition order (first wins).
    ///
    /// Stable across repeated calls. Returns [`Position::ORIGIN`] for the
    /// empty shape, which never reaches a grid because empty shapes are
    /// rejected before placement.
    pub fn anchor(&self) -> Position {
        let (cx, cy) = self.centroid();
        let mut best = Position::ORIGIN;
        let mut best_distance = f32::MAX;
        for &position in &self.positions {
            let dx = position.x as f32 - cx;
            let dy = position.y as f32 - cy;
            let distance = dx * dx + dy * dy;
            if distance < best_distance {
                best = position;
                best_distance = distance;
            }
        }
        best
    }

    /// Returns the translation of this shape with minimum x and minimum y at
    /// zero. Idempotent; a no-op copy if the shape is already minimal.
    pub fn normalize(&self) -> ItemShape {
        let Some(min) = self.min_corner() else {
            return self.clone();
        };
        if min == Position::ORIGIN {
            return self.clone();
        }
        ItemShape {
            positions: self.positions.iter().map(|&p| p - min).collect(),
        }
    }

    /// Component-wise minimum over all positions. None for the empty shape.
    fn min_corner(&self) -> Option<Position> {
        self.positions.iter().copied().reduce(|a, b| {
            Position::new(a.x.min(b.x), a.y.min(b.y))
        })
    }
}
