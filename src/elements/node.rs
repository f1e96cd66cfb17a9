//! Node - a point in the 2D frame

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Coordinates are rounded to 6 decimals for identity; the stored values
/// keep full precision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Node {
    pub x: f64,
    pub y: f64,
}

impl Node {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn coords(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Rounded coordinate used as the identity key
    pub fn key(&self) -> (i64, i64) {
        coordinate_key(self.x, self.y)
    }

    pub fn distance_to(&self, other: &Node) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// Round a coordinate pair to 6 decimals and map it to an integer key
pub fn coordinate_key(x: f64, y: f64) -> (i64, i64) {
    ((x * 1e6).round() as i64, (y * 1e6).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_rounds_to_6_decimals() {
        let a = Node::new(1.0000004, 2.0);
        let b = Node::new(1.0, 2.0);
        assert_eq!(a.key(), b.key());

        let c = Node::new(1.000001, 2.0);
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_distance() {
        let a = Node::new(0.0, 0.0);
        let b = Node::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }
}
