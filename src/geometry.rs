//! Fundamental planar geometric types for truss modelling.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Position in the plane.
///
/// Serialized as a two element array `[x, y]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// Distance along the global X axis.
    pub x: f64,
    /// Distance along the global Y axis.
    pub y: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Unit vector pointing from `self` toward `other`.
    ///
    /// Returns `None` when both points coincide and the direction is undefined.
    ///
    /// # Examples
    /// ```
    /// use truss_statics::point;
    ///
    /// let direction = point(0.0, 0.0).unit_vector_to(point(3.0, 4.0)).unwrap();
    /// assert!((direction.x - 0.6).abs() < 1.0e-12);
    /// assert!((direction.y - 0.8).abs() < 1.0e-12);
    /// assert!(point(1.0, 1.0).unit_vector_to(point(1.0, 1.0)).is_none());
    /// ```
    #[must_use]
    pub fn unit_vector_to(self, other: Point) -> Option<Vector2<f64>> {
        let delta = other.to_vector() - self.to_vector();
        let length = delta.norm();
        if length == 0.0 {
            return None;
        }
        Some(delta / length)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(value: Point) -> Self {
        [value.x, value.y]
    }
}

/// Planar force vector.
///
/// Used both for external loads and for solved support reactions. Serialized as
/// `[x, y]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Force {
    /// Force component acting along the global X axis.
    pub x: f64,
    /// Force component acting along the global Y axis.
    pub y: f64,
}

impl Force {
    /// Create a [`Force`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Force {
    type Output = Force;

    fn add(self, rhs: Force) -> Force {
        Force::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::iter::Sum for Force {
    fn sum<I: Iterator<Item = Force>>(iter: I) -> Force {
        iter.fold(Force::default(), |total, force| total + force)
    }
}

impl From<[f64; 2]> for Force {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Force> for [f64; 2] {
    fn from(value: Force) -> Self {
        [value.x, value.y]
    }
}

impl From<Vector2<f64>> for Force {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use truss_statics::point;
///
/// let apex = point(1.5, 3.0);
/// assert_eq!(apex.y, 3.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Convenience helper for creating [`Force`] instances.
///
/// # Examples
/// ```
/// use truss_statics::force;
///
/// let load = force(0.0, -5.0);
/// assert_eq!(load.y, -5.0);
/// ```
#[must_use]
pub const fn force(x: f64, y: f64) -> Force {
    Force::new(x, y)
}
