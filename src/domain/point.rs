use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A point in the sketch plane, in model units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Identity key of a loop: its lexicographically smallest curve endpoint.
///
/// Two loops that trace the same physical boundary in two different profiles
/// reduce to the same key. Ordering is total (`f64::total_cmp` on x, then y),
/// so keys can be used in ordered maps even if a coordinate is NaN. Negative
/// zero is folded into positive zero, so `-0.0` and `0.0` are the same key.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LoopKey {
    pub x: f64,
    pub y: f64,
}

/// `-0.0 + 0.0` is `+0.0`; every other value is unchanged
fn fold_zero(v: f64) -> f64 {
    v + 0.0
}

impl LoopKey {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: fold_zero(x),
            y: fold_zero(y),
        }
    }
}

impl From<Point2> for LoopKey {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y)
    }
}

impl Ord for LoopKey {
    fn cmp(&self, other: &Self) -> Ordering {
        fold_zero(self.x)
            .total_cmp(&fold_zero(other.x))
            .then_with(|| fold_zero(self.y).total_cmp(&fold_zero(other.y)))
    }
}

impl PartialOrd for LoopKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LoopKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LoopKey {}

impl fmt::Display for LoopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_orders_by_x_then_y() {
        let a = LoopKey::new(0.0, 5.0);
        let b = LoopKey::new(1.0, -5.0);
        let c = LoopKey::new(1.0, 2.0);

        assert!(a < b);
        assert!(b < c);
        assert_eq!(a.min(c), a);
    }

    #[test]
    fn test_key_equality_is_exact() {
        assert_eq!(LoopKey::new(1.5, 2.5), LoopKey::new(1.5, 2.5));
        assert_ne!(LoopKey::new(1.5, 2.5), LoopKey::new(1.5, 2.500001));
    }

    #[test]
    fn test_negative_zero_is_the_same_key() {
        assert_eq!(LoopKey::new(-0.0, 0.0), LoopKey::new(0.0, -0.0));
        assert_eq!(LoopKey::from(Point2::new(-0.0, 1.0)), LoopKey::new(0.0, 1.0));
        assert!(LoopKey::new(-0.0, 0.0).x.is_sign_positive());
        assert_eq!(LoopKey::new(-0.0, 0.0).to_string(), "(0, 0)");

        // Built directly with a negative zero, the key still compares equal
        let raw = LoopKey { x: -0.0, y: 2.0 };
        assert_eq!(raw, LoopKey::new(0.0, 2.0));
    }

    #[test]
    fn test_key_order_is_total_with_nan() {
        let nan = LoopKey::new(f64::NAN, 0.0);
        assert_eq!(nan, nan);
        assert!(LoopKey::new(0.0, 0.0) < nan);
    }
}
