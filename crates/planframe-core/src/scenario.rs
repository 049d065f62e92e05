//! Scenario configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMeta {
    pub name: String,
    pub description: Option<String>,
}

/// A hard or soft planning constraint toggled by the scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConstraint {
    pub code: String,
    #[serde(rename = "type")]
    pub constraint_type: String,
    #[serde(default = "default_active")]
    pub active: bool,
    pub weight: Option<f64>,
    /// `"SHIFT"` or `"WEEK"`; derived from `shift_based` for map-shaped input.
    pub time_scope: Option<String>,
    pub params: Option<serde_json::Map<String, serde_json::Value>>,
    pub shift_based: Option<bool>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub meta: ScenarioMeta,
    #[serde(default)]
    pub constraints: Vec<ScenarioConstraint>,
}
