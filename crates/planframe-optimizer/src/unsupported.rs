//! Placeholder optimizer used until a search engine is plugged in.

use async_trait::async_trait;
use planframe_core::{FrameError, ProblemFrame, Result};
use tracing::warn;

use crate::optimizer::{OptimizationOutcome, OptimizeRequest, Optimizer};

/// Optimizer that reports the capability as unavailable.
#[derive(Debug, Clone, Default)]
pub struct UnsupportedOptimizer;

impl UnsupportedOptimizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Optimizer for UnsupportedOptimizer {
    fn name(&self) -> &str {
        "unsupported"
    }

    async fn optimize(
        &self,
        frame: &ProblemFrame,
        request: &OptimizeRequest,
    ) -> Result<OptimizationOutcome> {
        warn!(
            "Optimization requested for {} (strategy {:?}) but no optimizer is installed",
            frame.problem_code(),
            request.strategy
        );
        Err(FrameError::NotSupported {
            capability: "optimizer".to_string(),
            message: "Optimizer plug-in not implemented yet.".to_string(),
        })
    }
}
