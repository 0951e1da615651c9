use crate::stack::RunStatus;
use serde::Serialize;

/// What happened to one layer during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSummary {
    pub index: usize,
    pub offset: f64,
    pub profiles: usize,
    pub selected: usize,
    pub max_depth: usize,
    pub extruded: bool,
}

/// Summary of a whole stack run, written as JSON on request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub layer_count: usize,
    pub thickness: f64,
    pub layers: Vec<LayerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triangles: Option<usize>,
}

impl RunReport {
    pub fn new(layer_count: usize, thickness: f64) -> Self {
        Self {
            status: RunStatus::Idle,
            layer_count,
            thickness,
            layers: Vec::new(),
            failure: None,
            triangles: None,
        }
    }

    pub fn extruded_layers(&self) -> usize {
        self.layers.iter().filter(|l| l.extruded).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json() {
        let mut report = RunReport::new(2, 0.5);
        report.status = RunStatus::Completed;
        report.layers.push(LayerSummary {
            index: 0,
            offset: 0.0,
            profiles: 3,
            selected: 2,
            max_depth: 2,
            extruded: true,
        });

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["status"], "completed");
        assert_eq!(value["layers"][0]["selected"], 2);
        assert!(value.get("failure").is_none());
        assert_eq!(report.extruded_layers(), 1);
    }
}
