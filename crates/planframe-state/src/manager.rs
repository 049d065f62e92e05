//! Frame registry: a read-through cache in front of a durable repository.

use std::collections::HashMap;
use std::sync::Arc;

use planframe_core::{
    evaluate_frame, validate_references, Evaluation, FrameError, ProblemFrame, Result, State,
    ValidationReport,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::repository::{FrameRepository, InMemoryFrameRepository};

/// Keeps constructed frames in memory and the repository as source of truth.
pub struct FrameManager {
    /// Durable store.
    repository: Arc<dyn FrameRepository>,

    /// Frames already constructed in this process, by id.
    cache: RwLock<HashMap<String, ProblemFrame>>,

    /// Serializes writers. The cache lock is never held across repository I/O.
    writer: Mutex<()>,
}

impl FrameManager {
    /// Create a manager over the given repository.
    pub fn new(repository: Arc<dyn FrameRepository>) -> Self {
        Self {
            repository,
            cache: RwLock::new(HashMap::new()),
            writer: Mutex::new(()),
        }
    }

    /// Manager backed by an in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryFrameRepository::new()))
    }

    /// Store a new frame and return its id.
    ///
    /// The frame must pass reference validation. The id is the requested one,
    /// else the frame's problem code, else a random hex id; if it is taken, a
    /// random 8-character suffix is appended.
    pub async fn save(&self, frame: ProblemFrame, requested_id: Option<&str>) -> Result<String> {
        let errors = validate_references(&frame);
        if !errors.is_empty() {
            warn!(
                "Rejected frame {} with {} reference errors",
                frame.problem_code(),
                errors.len()
            );
            return Err(FrameError::ValidationFailed { errors });
        }

        let base_id = requested_id
            .filter(|id| !id.is_empty())
            .or_else(|| Some(frame.problem_code()).filter(|code| !code.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        // Held across the collision check so two saves cannot claim one id.
        let _writer = self.writer.lock().await;

        let mut id = base_id.clone();
        let cached = self.cache.read().await.contains_key(&id);
        if cached || self.repository.exists(&id).await? {
            let suffix = Uuid::new_v4().simple().to_string();
            id = format!("{}_{}", base_id, &suffix[..8]);
            debug!("Frame id {} taken, using {}", base_id, id);
        }

        self.repository.save(&id, &frame).await?;
        self.cache.write().await.insert(id.clone(), frame);

        info!("Stored frame {}", id);
        Ok(id)
    }

    /// Fetch a frame, loading it from the repository on a cache miss.
    pub async fn get(&self, id: &str) -> Result<Option<ProblemFrame>> {
        if let Some(frame) = self.cache.read().await.get(id) {
            return Ok(Some(frame.clone()));
        }

        let Some(loaded) = self.repository.load(id).await? else {
            return Ok(None);
        };
        debug!("Loaded frame {} from repository", id);

        // A writer may have cached a newer version while we were loading.
        let mut cache = self.cache.write().await;
        let frame = cache.entry(id.to_string()).or_insert(loaded);
        Ok(Some(frame.clone()))
    }

    async fn require(&self, id: &str) -> Result<ProblemFrame> {
        self.get(id)
            .await?
            .ok_or_else(|| FrameError::frame_not_found(id))
    }

    /// Replace the working state of a stored frame.
    ///
    /// The new state is not validated here; use [`FrameManager::validate`].
    pub async fn update_state(&self, id: &str, state: State) -> Result<ProblemFrame> {
        let _writer = self.writer.lock().await;
        let frame = self.require(id).await?.with_state(state);

        self.repository.save(id, &frame).await?;
        self.cache
            .write()
            .await
            .insert(id.to_string(), frame.clone());

        info!(
            "Updated state of frame {} ({} lots, {} inventory rows)",
            id,
            frame.state.lots.len(),
            frame.state.inventory.len()
        );
        Ok(frame)
    }

    /// Validation report for a stored frame.
    pub async fn validate(&self, id: &str) -> Result<ValidationReport> {
        let frame = self.require(id).await?;
        Ok(ValidationReport::of(&frame))
    }

    /// Evaluation (validation + KPIs) for a stored frame.
    pub async fn evaluate(&self, id: &str) -> Result<Evaluation> {
        let frame = self.require(id).await?;
        Ok(evaluate_frame(&frame))
    }

    /// Number of frames held in memory.
    pub async fn cached(&self) -> usize {
        self.cache.read().await.len()
    }
}
