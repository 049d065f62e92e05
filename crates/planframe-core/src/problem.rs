//! Master data of a planning frame.
//!
//! Everything here is static input: products and their routings, processes,
//! machines, molds, the time bucket calendar, demand, opening stock and the
//! compatibility allow-lists. Entities cross-reference each other by code;
//! those links are checked by [`crate::validator`], not at parse time.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::ResourceId;

/// Identifies the problem instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemMeta {
    pub problem_code: String,
    pub horizon_type: Option<String>,
    pub base_shift_templates_code: Option<String>,
}

/// A planning period. Its `id` is what every `week` reference points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub id: String,
    pub index: i64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Demanded quantity in one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub week: String,
    pub qty: f64,
}

/// Demand for one product across the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderGroup {
    pub product_code: String,
    pub orders: Vec<OrderItem>,
}

/// Opening inventory of a product at a warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub product_code: String,
    pub warehouse: String,
    pub qty: f64,
}

/// Material consumed by a routing step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInput {
    pub material_code: String,
    pub qty_per_output_unit: f64,
    pub qty_unit: String,
    #[serde(default)]
    pub scrap_factor: f64,
}

/// One step of a product routing.
///
/// Inputs that name the material list `process_input` or the unit
/// `base_qty_type` are rewritten to the canonical fields before parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessStep {
    pub step_no: i64,
    pub process_code: String,
    pub name: String,
    pub output_material: String,
    pub base_qty: f64,
    pub base_qty_unit: Option<String>,
    pub yield_factor: f64,
    pub setup_time_min: f64,
    pub cycle_time_sec: f64,
    #[serde(default)]
    pub wait_time: f64,
    #[serde(default = "default_wait_unit")]
    pub wait_unit: String,
    #[serde(default)]
    pub inputs: Vec<ProcessInput>,
}

fn default_wait_unit() -> String {
    "DAY".to_string()
}

/// A product with its routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub code: String,
    pub name: String,
    pub base_unit: String,
    pub weight_per_unit_kg: Option<f64>,
    pub process_data: Vec<ProcessStep>,
}

/// A named operation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub code: String,
    pub name: String,
    pub default_params: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub constraints: Vec<serde_json::Value>,
}

/// A machine performing a single process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: ResourceId,
    pub name: String,
    pub process_code: String,
    pub shifts: Option<Vec<String>>,
    pub weekly_capacity: Option<BTreeMap<String, f64>>,
}

/// A mold (tool) used by a single process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mold {
    pub code: String,
    pub name: String,
    pub process_code: String,
    pub cavities: Option<i64>,
    pub eye: Option<i64>,
    pub supported_products: Option<Vec<String>>,
    pub supported_products_id: Option<Vec<i64>>,
    pub compatible_machines: Option<Vec<String>>,
    pub compatible_machines_id: Option<Vec<i64>>,
}

/// Physical resources.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub machine: Vec<Machine>,
    #[serde(default)]
    pub mold: Vec<Mold>,
}

/// Allowed (machine, mold, process) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineMoldPair {
    pub machine_id: ResourceId,
    pub mold_code: String,
    pub process_code: String,
}

/// Molds allowed for a product on a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMold {
    pub product_code: String,
    pub process_code: String,
    pub allowed_molds: Vec<String>,
}

/// Compatibility allow-lists. An empty list means no restriction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Compatibility {
    #[serde(default)]
    pub machine_mold_pairs: Vec<MachineMoldPair>,
    #[serde(default)]
    pub product_molds: Vec<ProductMold>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftSegment {
    pub code: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub code: String,
    pub name: Option<String>,
    pub segments: Vec<ShiftSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkCalendarEntry {
    pub date: NaiveDate,
    pub shift_templates_code: String,
    #[serde(default)]
    pub holiday: bool,
}

/// All master data of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemData {
    pub problem_meta: ProblemMeta,
    pub time_buckets: Vec<TimeBucket>,
    #[serde(default)]
    pub orders: Vec<OrderGroup>,
    #[serde(default)]
    pub stocks: Vec<StockItem>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub processes: Vec<Process>,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub shift_templates: Vec<ShiftTemplate>,
    #[serde(default)]
    pub work_calendar: Vec<WorkCalendarEntry>,
    #[serde(default)]
    pub compatibility: Compatibility,
}
