//! Working state: the plan of lots and the inventory projection.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};
use crate::normalize;
use crate::types::{timestamp, ResourceId};

/// Resource bound to a lot. `kind` is `"machine"` or `"mold"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: ResourceId,
}

impl PlanResource {
    pub fn machine(id: impl Into<ResourceId>) -> Self {
        Self {
            kind: "machine".to_string(),
            id: id.into(),
        }
    }

    pub fn mold(code: impl Into<ResourceId>) -> Self {
        Self {
            kind: "mold".to_string(),
            id: code.into(),
        }
    }

    pub fn is_machine(&self) -> bool {
        self.kind == "machine"
    }

    pub fn is_mold(&self) -> bool {
        self.kind == "mold"
    }
}

/// A lot: one execution of a routing step for a product in a time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    pub lot_id: Option<String>,
    pub product_code: String,
    pub process_code: String,
    pub week: Option<String>,
    pub qty: f64,
    pub qty_type: Option<String>,
    #[serde(default, with = "timestamp")]
    pub setup_start_time: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp")]
    pub setup_end_time: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp")]
    pub process_start_time: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp")]
    pub process_end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub resources: Vec<PlanResource>,
}

impl PlanItem {
    /// Natural key used in diagnostics.
    pub fn label(&self) -> &str {
        self.lot_id.as_deref().unwrap_or("n/a")
    }

    /// First machine bound to the lot, as a string key; empty when none.
    pub fn machine_key(&self) -> String {
        self.resources
            .iter()
            .find(|r| r.is_machine())
            .map(|r| r.id.as_key())
            .unwrap_or_default()
    }

    pub fn molds(&self) -> impl Iterator<Item = &PlanResource> {
        self.resources.iter().filter(|r| r.is_mold())
    }
}

/// Inventory projection row for one product in one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotInventory {
    pub product_code: String,
    pub time_bucket_id: Option<String>,
    pub week: Option<String>,
    pub opening_stock: f64,
    pub production_qty: f64,
    pub demand: f64,
    pub closing_stock: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateMeta {
    pub iteration: Option<i64>,
    pub order_fulfillment_rate: Option<f64>,
    pub makespan: Option<f64>,
}

/// The mutable part of a frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    pub meta: Option<StateMeta>,
    #[serde(default)]
    pub lots: Vec<PlanItem>,
    #[serde(default)]
    pub inventory: Vec<LotInventory>,
}

impl State {
    /// Build a replacement working state.
    ///
    /// Only the `plan` to `lots` alias applies here. Inventory rows are not
    /// recognised under `lots` the way full frame construction does.
    pub fn from_value(mut raw: serde_json::Value) -> Result<Self> {
        if let Some(state) = raw.as_object_mut() {
            normalize::alias_plan(state);
        }
        serde_json::from_value(raw).map_err(|e| FrameError::schema(e.to_string()))
    }

    pub fn total_qty(&self) -> f64 {
        self.lots.iter().map(|lot| lot.qty).sum()
    }
}
