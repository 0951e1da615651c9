use super::point::Point2;

/// A single boundary curve of a loop, reduced to its two endpoints
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    pub start: Point2,
    pub end: Point2,
}

impl Curve {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    pub fn endpoints(&self) -> [Point2; 2] {
        [self.start, self.end]
    }
}

/// A closed boundary made of curves
///
/// `is_outer` is set by the kernel: the outer loop bounds the profile's region,
/// inner loops bound holes cut into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub curves: Vec<Curve>,
    pub is_outer: bool,
}

impl Loop {
    pub fn new(curves: Vec<Curve>, is_outer: bool) -> Self {
        Self { curves, is_outer }
    }

    /// Build a closed loop of straight curves through `ring`
    ///
    /// The ring is implicitly closed: the last point connects back to the first.
    pub fn from_ring(ring: &[Point2], is_outer: bool) -> Self {
        let n = ring.len();
        let curves = (0..n)
            .map(|i| Curve::new(ring[i], ring[(i + 1) % n]))
            .collect();
        Self { curves, is_outer }
    }

    /// Vertices in traversal order (the start point of every curve)
    pub fn ring(&self) -> Vec<Point2> {
        self.curves.iter().map(|c| c.start).collect()
    }

    pub fn endpoints(&self) -> impl Iterator<Item = Point2> + '_ {
        self.curves.iter().flat_map(Curve::endpoints)
    }
}

/// A planar region: one outer loop plus the inner loops of its holes
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub loops: Vec<Loop>,
}

impl Profile {
    pub fn new(loops: Vec<Loop>) -> Self {
        Self { loops }
    }

    /// Convenience constructor for a profile with one outer loop and its holes
    pub fn with_holes(outer: &[Point2], holes: &[Vec<Point2>]) -> Self {
        let mut loops = vec![Loop::from_ring(outer, true)];
        loops.extend(holes.iter().map(|h| Loop::from_ring(h, false)));
        Self { loops }
    }

    pub fn outer_loops(&self) -> impl Iterator<Item = &Loop> {
        self.loops.iter().filter(|l| l.is_outer)
    }

    pub fn inner_loops(&self) -> impl Iterator<Item = &Loop> {
        self.loops.iter().filter(|l| !l.is_outer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Vec<Point2> {
        vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ]
    }

    #[test]
    fn test_loop_from_ring_closes() {
        let l = Loop::from_ring(&square(0.0, 0.0, 1.0), true);
        assert_eq!(l.curves.len(), 4);
        assert_eq!(l.curves[3].end, Point2::new(0.0, 0.0));
        assert_eq!(l.ring(), square(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_profile_partitions_loops() {
        let profile = Profile::with_holes(&square(0.0, 0.0, 10.0), &[square(2.0, 2.0, 2.0)]);
        assert_eq!(profile.outer_loops().count(), 1);
        assert_eq!(profile.inner_loops().count(), 1);
    }
}
