use crate::domain::Point2;
use serde::Deserialize;

/// JSON contour document: `{"loops": [[[x, y], ...], ...]}`, y pointing up
#[derive(Debug, Deserialize)]
pub struct ContourDocument {
    pub loops: Vec<Vec<[f64; 2]>>,
}

pub fn parse_json(contents: &str) -> Result<Vec<Vec<Point2>>, serde_json::Error> {
    let document: ContourDocument = serde_json::from_str(contents)?;
    Ok(document
        .loops
        .into_iter()
        .map(|ring| ring.into_iter().map(|[x, y]| Point2::new(x, y)).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_loops() {
        let json = r#"{
            "loops": [
                [[0, 0], [10, 0], [10, 10], [0, 10]],
                [[2, 2], [2, 8], [8, 8]]
            ]
        }"#;
        let rings = parse_json(json).unwrap();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][2], Point2::new(10.0, 10.0));
    }

    #[test]
    fn test_parse_json_rejects_bad_points() {
        assert!(parse_json(r#"{"loops": [[[0, 0, 1]]]}"#).is_err());
        assert!(parse_json(r#"{"rings": []}"#).is_err());
    }
}
