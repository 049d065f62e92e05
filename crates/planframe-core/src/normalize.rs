//! Shape normalization over raw JSON.
//!
//! Historical payloads name the same things differently: constraints as a
//! map or a list, the lot list as `lots` or `plan`, routing inputs as
//! `inputs` or `process_input`, the base unit as `base_qty_unit` or
//! `base_qty_type`. These rewrites run once, before typed parsing, so the
//! typed model only ever sees the canonical shape.

use serde_json::{Map, Value};

use crate::error::{FrameError, Result};

/// Rewrite a raw frame into its canonical shape.
pub fn normalize_frame(raw: &mut Value) -> Result<()> {
    let root = raw
        .as_object_mut()
        .ok_or_else(|| FrameError::schema("frame must be a JSON object"))?;

    let scenario = root
        .entry("scenarioConfig")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(scenario) = scenario.as_object_mut() {
        normalize_constraints(scenario);
    }

    let state = root
        .entry("state")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(state) = state.as_object_mut() {
        alias_plan_lots(state);
    }

    if let Some(products) = root
        .get_mut("problemData")
        .and_then(|data| data.get_mut("products"))
        .and_then(Value::as_array_mut)
    {
        for product in products {
            let Some(steps) = product.get_mut("process_data").and_then(Value::as_array_mut) else {
                continue;
            };
            for step in steps.iter_mut().filter_map(Value::as_object_mut) {
                alias_step_fields(step);
            }
        }
    }

    Ok(())
}

/// Turn `constraints` into a list.
///
/// A map of `code -> properties` becomes one entry per code, with `active`
/// defaulting to true and `time_scope` derived from `shift_based`. Lists pass
/// through; anything else becomes an empty list.
pub fn normalize_constraints(scenario: &mut Map<String, Value>) {
    let normalized = match scenario.get_mut("constraints").map(Value::take) {
        Some(Value::Object(by_code)) => Value::Array(
            by_code
                .into_iter()
                .filter_map(|(code, props)| constraint_entry(code, props))
                .collect(),
        ),
        Some(list @ Value::Array(_)) => list,
        _ => Value::Array(Vec::new()),
    };
    scenario.insert("constraints".to_string(), normalized);
}

fn constraint_entry(code: String, props: Value) -> Option<Value> {
    let Value::Object(props) = props else {
        return None;
    };

    let mut entry = Map::new();
    entry.insert("code".to_string(), Value::String(code));
    entry.extend(props);
    entry
        .entry("active")
        .or_insert(Value::Bool(true));

    let scope_missing = entry.get("time_scope").map_or(true, Value::is_null);
    let shift_based = entry.get("shift_based").filter(|v| !v.is_null()).map(truthy);
    if let (true, Some(shift_based)) = (scope_missing, shift_based) {
        let scope = if shift_based { "SHIFT" } else { "WEEK" };
        entry.insert("time_scope".to_string(), Value::String(scope.to_string()));
    }

    Some(Value::Object(entry))
}

/// Resolve which list holds lots and which holds inventory rows.
///
/// A non-empty `lots` list whose first row carries `opening_stock` is taken
/// to be inventory: it fills `inventory` (unless already present) and a
/// `plan` list, when given, becomes the lot list. The rest is
/// [`alias_plan`].
pub fn alias_plan_lots(state: &mut Map<String, Value>) {
    let plan = state.get("plan").filter(|v| v.is_array()).cloned();

    let lots_hold_inventory = state
        .get("lots")
        .and_then(Value::as_array)
        .and_then(|rows| rows.first())
        .and_then(Value::as_object)
        .map_or(false, |row| row.contains_key("opening_stock"));

    if lots_hold_inventory {
        if !state.contains_key("inventory") {
            let rows = state["lots"].clone();
            state.insert("inventory".to_string(), rows);
        }
        if let Some(plan) = plan {
            state.insert("lots".to_string(), plan);
        }
    }

    alias_plan(state);
}

/// Use a `plan` list as the lot list when `lots` is absent or empty, then
/// drop the `plan` key.
pub fn alias_plan(state: &mut Map<String, Value>) {
    let plan = state.get("plan").filter(|v| v.is_array()).cloned();
    let lots_empty = match state.get("lots") {
        None => true,
        Some(Value::Array(rows)) => rows.is_empty(),
        Some(_) => false,
    };
    if lots_empty {
        if let Some(plan) = plan.filter(|p| !is_empty_array(p) || !state.contains_key("lots")) {
            state.insert("lots".to_string(), plan);
        }
    }
    state.remove("plan");
}

fn alias_step_fields(step: &mut Map<String, Value>) {
    let inputs_missing = match step.get("inputs") {
        None | Some(Value::Null) => true,
        Some(Value::Array(rows)) => rows.is_empty(),
        Some(_) => false,
    };
    if let Some(alt) = step.remove("process_input") {
        if inputs_missing && !is_empty_array(&alt) && !alt.is_null() {
            step.insert("inputs".to_string(), alt);
        }
    }

    if let Some(alt) = step.remove("base_qty_type") {
        let unit_missing = step.get("base_qty_unit").map_or(true, Value::is_null);
        if unit_missing && !alt.is_null() {
            step.insert("base_qty_unit".to_string(), alt);
        }
    }
}

fn is_empty_array(value: &Value) -> bool {
    value.as_array().map_or(false, Vec::is_empty)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
