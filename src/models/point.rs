use std::ops::{Add, Mul, Sub};

/// Image-space point in pixels; `(0, 0)` is the top-left corner of the
/// top-left pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        (*self - *other).length()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Point a fraction `t` of the way from `self` to `other`
    pub fn lerp(&self, other: &Point, t: f32) -> Point {
        *self + (*other - *self) * t
    }

    /// Z component of the cross product of two vectors
    pub fn cross(&self, other: &Point) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Move `distance` pixels toward `target`
    pub fn toward(&self, target: &Point, distance: f32) -> Point {
        let delta = *target - *self;
        let len = delta.length();
        if len <= f32::EPSILON {
            return *self;
        }
        *self + delta * (distance / len)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}
