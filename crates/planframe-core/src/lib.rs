//! # Planframe Core
//!
//! Frame model and reference validation for production-planning frames.
//!
//! This crate provides the fundamental building blocks:
//! - [`ProblemFrame`] - master data, scenario configuration and working state
//! - [`construct_frame`] - normalization of historical payload shapes + typed parsing
//! - [`validate_references`] - referential and compatibility checks
//! - [`evaluate_frame`] - validation plus aggregate KPIs
//! - [`FrameError`] - error types

pub mod error;
pub mod evaluation;
pub mod frame;
pub mod normalize;
pub mod problem;
pub mod scenario;
pub mod state;
pub mod types;
pub mod validator;

// Re-exports for convenience
pub use error::{FrameError, Result};
pub use evaluation::{evaluate_frame, Evaluation, Kpis, ValidationReport};
pub use frame::{construct_frame, load_problem_frame, ProblemFrame};
pub use problem::*;
pub use scenario::{ScenarioConfig, ScenarioConstraint, ScenarioMeta};
pub use state::{LotInventory, PlanItem, PlanResource, State, StateMeta};
pub use types::ResourceId;
pub use validator::{find_violations, validate_references, Violation};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{FrameError, Result};
    pub use crate::evaluation::{evaluate_frame, Evaluation, ValidationReport};
    pub use crate::frame::{construct_frame, ProblemFrame};
    pub use crate::state::State;
    pub use crate::validator::validate_references;
}
