//! Frame evaluation: validation plus aggregate KPIs.

use serde::{Deserialize, Serialize};

use crate::frame::ProblemFrame;
use crate::validator::validate_references;

/// Result of a validation query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn of(frame: &ProblemFrame) -> Self {
        let errors = validate_references(frame);
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Aggregate figures over the working state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub lots_count: usize,
    pub inventory_rows: usize,
    pub total_qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub kpis: Kpis,
}

/// Validate the frame, then summarize its working state.
///
/// KPIs are reported even when the frame has violations.
pub fn evaluate_frame(frame: &ProblemFrame) -> Evaluation {
    let ValidationReport { valid, errors } = ValidationReport::of(frame);
    Evaluation {
        valid,
        errors,
        kpis: Kpis {
            lots_count: frame.state.lots.len(),
            inventory_rows: frame.state.inventory.len(),
            total_qty: frame.state.total_qty(),
        },
    }
}
