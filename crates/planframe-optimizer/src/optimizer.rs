//! Optimizer trait and request types.

use async_trait::async_trait;
use planframe_core::{Evaluation, FrameError, ProblemFrame, Result, State};
use serde::{Deserialize, Serialize};

/// Options for an optimization run. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    /// Named search strategy, if the optimizer offers several.
    pub strategy: Option<String>,

    /// Upper bound on search iterations.
    pub max_iterations: Option<u32>,

    /// Wall-clock limit in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl OptimizeRequest {
    /// Parse an optional JSON body; a missing or `null` body means defaults.
    pub fn from_payload(payload: Option<serde_json::Value>) -> Result<Self> {
        match payload {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(raw) => serde_json::from_value(raw).map_err(|e| FrameError::schema(e.to_string())),
        }
    }
}

/// Improved working state returned by an optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    /// The proposed working state.
    pub state: State,

    /// Evaluation of the frame carrying the proposed state.
    pub evaluation: Evaluation,

    /// Iterations actually spent.
    pub iterations: u32,
}

/// Trait for optimization engines.
///
/// The frame model does not depend on any optimizer being present; callers
/// hand a frame to whichever implementation is configured.
#[async_trait]
pub trait Optimizer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Search for a better working state for the frame.
    async fn optimize(
        &self,
        frame: &ProblemFrame,
        request: &OptimizeRequest,
    ) -> Result<OptimizationOutcome>;
}
