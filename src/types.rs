use serde::{Deserialize, Serialize};

/// A landmark position in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Euclidean distance to another point, in pixels.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn to_f32(self) -> (f32, f32) {
        (self.x as f32, self.y as f32)
    }
}

/// A landmark as reported by the face mesh model: fractions of the image
/// width and height, nominally in [0, 1]. `z` is the relative depth and is
/// carried through but never used for measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl NormalizedPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Finite and within one image size of the frame. Mesh models report
    /// slightly out-of-frame points for faces at the border; anything further
    /// out is garbage.
    pub fn is_plausible(&self) -> bool {
        let in_range = |v: f32| v.is_finite() && (-1.0..=2.0).contains(&v);
        in_range(self.x) && in_range(self.y)
    }

    /// Convert to pixel coordinates for a `width` x `height` image.
    ///
    /// Uses `floor(x * width)`, `floor(y * height)`, so a fraction of exactly
    /// 1.0 maps one past the last pixel.
    pub fn to_pixel(&self, width: u32, height: u32) -> Point {
        let x = (f64::from(self.x) * f64::from(width)).floor();
        let y = (f64::from(self.y) * f64::from(height)).floor();
        Point::new(x as i32, y as i32)
    }
}

/// The full ordered landmark collection for one detected face.
///
/// Indices follow the face mesh numbering, so `landmarks[133]` is always the
/// inner corner of the left eye.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Point> {
        self.points.get(idx).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Point;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn distance_between_extreme_points() {
        let a = Point::new(i32::MIN, 0);
        let b = Point::new(i32::MAX, 0);
        let expected = f64::from(i32::MAX) - f64::from(i32::MIN);
        assert!((a.distance(&b) - expected).abs() / expected < 1e-12);
        assert!((b.distance(&a) - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn plausible_fractions() {
        assert!(NormalizedPoint::new(0.5, 0.5).is_plausible());
        assert!(NormalizedPoint::new(-0.05, 1.02).is_plausible());
        assert!(!NormalizedPoint::new(-1e7, 0.5).is_plausible());
        assert!(!NormalizedPoint::new(0.5, f32::NAN).is_plausible());
        assert!(!NormalizedPoint::new(f32::INFINITY, 0.5).is_plausible());
    }

    #[test]
    fn normalized_to_pixel_floors() {
        let p = NormalizedPoint::new(0.5, 0.25);
        assert_eq!(p.to_pixel(640, 480), Point::new(320, 120));

        // 0.999 * 100 = 99.9 floors to 99
        let edge = NormalizedPoint::new(0.999, 0.999);
        assert_eq!(edge.to_pixel(100, 100), Point::new(99, 99));

        assert_eq!(NormalizedPoint::new(0.0, 0.0).to_pixel(10, 10), Point::zero());
    }

    #[test]
    fn landmark_set_access() {
        let set = LandmarkSet::from_points(vec![Point::new(1, 1), Point::new(2, 2)]);
        assert_eq!(set.len(), 2);
        assert_eq!(set[1], Point::new(2, 2));
        assert_eq!(set.get(1), Some(Point::new(2, 2)));
        assert_eq!(set.get(2), None);
        assert!(LandmarkSet::from_points(Vec::new()).is_empty());
    }
}
