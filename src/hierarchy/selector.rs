use super::resolver::{LayerHierarchy, ResolvedProfile};
use crate::domain::Profile;

/// Even-odd rule: even nesting depth is solid material, odd depth is a hole
pub fn is_solid(depth: usize) -> bool {
    depth % 2 == 0
}

/// Keep the items whose depth is even, preserving input order
pub fn select_solid<T>(items: impl IntoIterator<Item = (T, usize)>) -> Vec<T> {
    items
        .into_iter()
        .filter(|&(_, depth)| is_solid(depth))
        .map(|(item, _)| item)
        .collect()
}

/// Profiles of a resolved layer that represent solid material
///
/// Odd-depth profiles are holes already cut out of their enclosing even-depth
/// profile and are not extruded on their own.
pub fn select_solid_profiles<'a>(hierarchy: &LayerHierarchy<'a>) -> Vec<&'a Profile> {
    select_solid(
        hierarchy
            .profiles()
            .iter()
            .map(|p: &ResolvedProfile<'a>| (p.profile, p.depth)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point2;
    use crate::hierarchy::resolve;

    #[test]
    fn test_is_solid() {
        assert!(is_solid(0));
        assert!(!is_solid(1));
        assert!(is_solid(2));
        assert!(!is_solid(7));
    }

    #[test]
    fn test_select_even_depths() {
        let selected = select_solid(vec![("A", 0), ("B", 1), ("C", 2), ("D", 1)]);
        assert_eq!(selected, vec!["A", "C"]);
    }

    #[test]
    fn test_select_empty() {
        let selected: Vec<&str> = select_solid(Vec::new());
        assert!(selected.is_empty());
    }

    #[test]
    fn test_select_solid_profiles_skips_holes() {
        let ring = |x: f64, size: f64| {
            vec![
                Point2::new(x, x),
                Point2::new(x + size, x),
                Point2::new(x + size, x + size),
                Point2::new(x, x + size),
            ]
        };
        let (a, b, c) = (ring(0.0, 30.0), ring(5.0, 20.0), ring(10.0, 10.0));
        let profiles = vec![
            Profile::with_holes(&b, &[c.clone()]),
            Profile::with_holes(&a, &[b.clone()]),
            Profile::with_holes(&c, &[]),
        ];

        let hierarchy = resolve(&profiles).unwrap();
        let selected = select_solid_profiles(&hierarchy);

        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|p| profiles.contains(*p)));
        assert_eq!(selected[0], &profiles[1]);
        assert_eq!(selected[1], &profiles[2]);
    }
}
