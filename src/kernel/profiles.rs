//! Region extraction from a flat set of closed rings
//!
//! Mirrors how a sketch engine reports profiles: every ring bounds one region
//! (its outer loop) and the rings directly inside it are that region's inner
//! loops. A nested ring is therefore traced twice, once as an inner loop of its
//! container and once as the outer loop of its own region.

use crate::domain::{Loop, Point2, Profile};
use geo::{Area, Contains, LineString, Point, Polygon};

fn to_polygon(ring: &[Point2]) -> Polygon<f64> {
    let exterior: LineString<f64> = ring.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>().into();
    Polygon::new(exterior, vec![])
}

/// Signed area of a ring; positive when counter-clockwise
pub fn signed_area(ring: &[Point2]) -> f64 {
    to_polygon(ring).signed_area()
}

/// Copy of `ring` wound counter-clockwise (`ccw = true`) or clockwise
pub fn oriented(ring: &[Point2], ccw: bool) -> Vec<Point2> {
    let mut out = ring.to_vec();
    if (signed_area(ring) > 0.0) != ccw {
        out.reverse();
    }
    out
}

/// Index of the smallest ring strictly containing ring `i`, if any
fn direct_parent(
    i: usize,
    rings: &[Vec<Point2>],
    polygons: &[Polygon<f64>],
    areas: &[f64],
) -> Option<usize> {
    let probe = rings[i].first().map(|p| Point::new(p.x, p.y))?;
    (0..rings.len())
        .filter(|&j| j != i && areas[j] > areas[i] && polygons[j].contains(&probe))
        .min_by(|&a, &b| areas[a].total_cmp(&areas[b]))
}

/// Build one profile per ring, with the directly nested rings as inner loops
///
/// Outer loops are wound counter-clockwise and inner loops clockwise.
pub fn extract_profiles(rings: &[Vec<Point2>]) -> Vec<Profile> {
    let rings: Vec<Vec<Point2>> = rings.iter().map(|r| oriented(r, true)).collect();
    let polygons: Vec<Polygon<f64>> = rings.iter().map(|r| to_polygon(r)).collect();
    let areas: Vec<f64> = polygons.iter().map(|p| p.unsigned_area()).collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); rings.len()];
    for i in 0..rings.len() {
        if let Some(parent) = direct_parent(i, &rings, &polygons, &areas) {
            children[parent].push(i);
        }
    }

    rings
        .iter()
        .zip(&children)
        .map(|(ring, kids)| {
            let mut loops = vec![Loop::from_ring(ring, true)];
            loops.extend(
                kids.iter()
                    .map(|&c| Loop::from_ring(&oriented(&rings[c], false), false)),
            );
            Profile::new(loops)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{extreme_point, resolve, select_solid_profiles};

    fn square(x: f64, y: f64, size: f64) -> Vec<Point2> {
        vec![
            Point2::new(x, y),
            Point2::new(x + size, y),
            Point2::new(x + size, y + size),
            Point2::new(x, y + size),
        ]
    }

    #[test]
    fn test_orientation() {
        let ccw = square(0.0, 0.0, 2.0);
        assert!((signed_area(&ccw) - 4.0).abs() < 1e-12);

        let cw = oriented(&ccw, false);
        assert!(signed_area(&cw) < 0.0);
        assert_eq!(oriented(&cw, true).len(), 4);
        assert!(signed_area(&oriented(&cw, true)) > 0.0);
    }

    #[test]
    fn test_separate_rings_have_no_holes() {
        let profiles = extract_profiles(&[square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)]);
        assert_eq!(profiles.len(), 2);
        assert!(profiles.iter().all(|p| p.loops.len() == 1));
    }

    #[test]
    fn test_nested_rings_share_boundaries() {
        // Given out of order and clockwise on purpose
        let rings = vec![
            oriented(&square(10.0, 10.0, 10.0), false),
            square(0.0, 0.0, 30.0),
            square(5.0, 5.0, 20.0),
        ];
        let profiles = extract_profiles(&rings);

        assert_eq!(profiles.len(), 3);
        // Outer square: one hole (the middle one), not the innermost one
        assert_eq!(profiles[1].inner_loops().count(), 1);
        let hole = profiles[1].inner_loops().next().unwrap();
        let middle_outer = profiles[2].outer_loops().next().unwrap();
        assert_eq!(extreme_point(hole), extreme_point(middle_outer));
        assert!(signed_area(&hole.ring()) < 0.0);
    }

    #[test]
    fn test_extracted_profiles_resolve_by_parity() {
        let rings = vec![
            square(0.0, 0.0, 30.0),
            square(5.0, 5.0, 20.0),
            square(10.0, 10.0, 10.0),
            square(40.0, 0.0, 5.0),
        ];
        let profiles = extract_profiles(&rings);
        let hierarchy = resolve(&profiles).unwrap();
        let solid = select_solid_profiles(&hierarchy);

        assert_eq!(hierarchy.max_depth(), 2);
        assert_eq!(solid.len(), 3);
        assert!(!solid.contains(&&profiles[1]));
    }
}
