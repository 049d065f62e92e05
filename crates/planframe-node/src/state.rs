//! Application state.

use std::sync::Arc;

use planframe_optimizer::{Optimizer, UnsupportedOptimizer};
use planframe_state::{FileFrameRepository, FrameManager};

use crate::config::NodeConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Frame registry.
    pub manager: Arc<FrameManager>,

    /// Optimizer handed frames on `/optimize`.
    pub optimizer: Arc<dyn Optimizer>,
}

impl AppState {
    pub fn new(manager: FrameManager, optimizer: Arc<dyn Optimizer>) -> Self {
        Self {
            manager: Arc::new(manager),
            optimizer,
        }
    }

    /// State over the file repository in the configured data directory.
    pub fn from_config(config: &NodeConfig) -> anyhow::Result<Self> {
        let repository = FileFrameRepository::new(&config.data_dir)?;
        Ok(Self::new(
            FrameManager::new(Arc::new(repository)),
            Arc::new(UnsupportedOptimizer::new()),
        ))
    }

    /// State over an in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(FrameManager::in_memory(), Arc::new(UnsupportedOptimizer::new()))
    }
}
