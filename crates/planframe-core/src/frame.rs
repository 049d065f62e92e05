//! The planning frame and its construction from raw input.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};
use crate::normalize::normalize_frame;
use crate::problem::ProblemData;
use crate::scenario::ScenarioConfig;
use crate::state::State;
use crate::validator::validate_references;

/// A complete planning instance: master data, scenario and working state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemFrame {
    #[serde(rename = "problemData")]
    pub problem_data: ProblemData,

    #[serde(rename = "scenarioConfig")]
    pub scenario_config: ScenarioConfig,

    #[serde(default)]
    pub state: State,
}

/// Build a frame from loosely structured input.
///
/// Normalizes the historical shape variants first, then parses into the
/// typed model. Any structural mismatch is reported as [`FrameError::Schema`]
/// carrying the parser diagnostic.
pub fn construct_frame(mut raw: serde_json::Value) -> Result<ProblemFrame> {
    normalize_frame(&mut raw)?;
    serde_json::from_value(raw).map_err(|e| FrameError::schema(e.to_string()))
}

/// Read and construct a frame from a JSON file.
pub fn load_problem_frame(path: impl AsRef<Path>) -> Result<ProblemFrame> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| FrameError::Storage {
        message: format!("failed to read {}: {}", path.display(), e),
    })?;
    ProblemFrame::from_json_str(&text)
}

impl ProblemFrame {
    /// Construct a frame from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: serde_json::Value =
            serde_json::from_str(text).map_err(|e| FrameError::schema(e.to_string()))?;
        construct_frame(raw)
    }

    /// Canonical serialized form.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn problem_code(&self) -> &str {
        &self.problem_data.problem_meta.problem_code
    }

    /// Reference violations of this frame; empty when consistent.
    pub fn validate(&self) -> Vec<String> {
        validate_references(self)
    }

    /// Replace the working state, keeping master data and scenario.
    pub fn with_state(mut self, state: State) -> Self {
        self.state = state;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "problemData": {
                "problem_meta": {"problem_code": "PRB_MIN"},
                "time_buckets": [{"id": "CW01", "index": 1}]
            },
            "scenarioConfig": {"meta": {"name": "base"}}
        })
    }

    #[test]
    fn test_minimal_frame() {
        let frame = construct_frame(minimal()).unwrap();
        assert_eq!(frame.problem_code(), "PRB_MIN");
        assert!(frame.scenario_config.constraints.is_empty());
        assert!(frame.state.lots.is_empty());
        assert!(frame.validate().is_empty());
    }

    #[test]
    fn test_missing_scenario_meta_is_schema_error() {
        let mut raw = minimal();
        raw.as_object_mut().unwrap().remove("scenarioConfig");
        let err = construct_frame(raw).unwrap_err();
        match err {
            FrameError::Schema { message } => assert!(message.contains("meta")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_primitive_type_is_schema_error() {
        let mut raw = minimal();
        raw["problemData"]["time_buckets"][0]["index"] = json!("first");
        assert!(matches!(construct_frame(raw), Err(FrameError::Schema { .. })));
    }

    #[test]
    fn test_invalid_json_text() {
        assert!(matches!(
            ProblemFrame::from_json_str("{not json"),
            Err(FrameError::Schema { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_problem_frame("/nonexistent/frame.json").unwrap_err();
        assert!(matches!(err, FrameError::Storage { .. }));
    }
}
