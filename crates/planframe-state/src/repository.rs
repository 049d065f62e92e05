//! Durable frame repositories.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use planframe_core::{FrameError, ProblemFrame, Result};
use tokio::sync::RwLock;
use tracing::debug;

/// Trait for durable frame stores.
///
/// Frames are stored in their canonical serialized form and rebuilt through
/// normal frame construction on load.
#[async_trait]
pub trait FrameRepository: Send + Sync {
    /// Persist a frame under the given id, replacing any previous version.
    async fn save(&self, id: &str, frame: &ProblemFrame) -> Result<()>;

    /// Load a frame; `None` when nothing is stored under the id.
    async fn load(&self, id: &str) -> Result<Option<ProblemFrame>>;

    /// Check whether an id is taken.
    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.load(id).await?.is_some())
    }
}

/// Ids become file names, so they may not contain path syntax.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.starts_with('.') && !id.contains(|c: char| c == '/' || c == '\\')
}

/// Repository writing one pretty-printed `<id>.json` file per frame.
#[derive(Debug, Clone)]
pub struct FileFrameRepository {
    base_path: PathBuf,
}

impl FileFrameRepository {
    /// Open a repository rooted at `base_path`, creating the directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path).map_err(|e| FrameError::Storage {
            message: format!("failed to create {}: {}", base_path.display(), e),
        })?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }
}

#[async_trait]
impl FrameRepository for FileFrameRepository {
    async fn save(&self, id: &str, frame: &ProblemFrame) -> Result<()> {
        if !is_valid_id(id) {
            return Err(FrameError::schema(format!("invalid frame id `{}`", id)));
        }
        let path = self.path_for(id);
        let payload = frame.to_json_pretty()?;

        tokio::fs::write(&path, payload)
            .await
            .map_err(|e| FrameError::Storage {
                message: format!("failed to write {}: {}", path.display(), e),
            })?;

        debug!("Wrote frame {} to {}", id, path.display());
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<ProblemFrame>> {
        if !is_valid_id(id) {
            return Ok(None);
        }
        let path = self.path_for(id);

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(FrameError::Storage {
                    message: format!("failed to read {}: {}", path.display(), e),
                })
            }
        };

        ProblemFrame::from_json_str(&text).map(Some)
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        if !is_valid_id(id) {
            return Ok(false);
        }
        let path = self.path_for(id);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| FrameError::Storage {
                message: format!("failed to stat {}: {}", path.display(), e),
            })
    }
}

/// In-memory repository holding serialized frames.
///
/// Goes through the same serialize/construct path as the file repository.
#[derive(Debug, Default)]
pub struct InMemoryFrameRepository {
    frames: RwLock<HashMap<String, String>>,
}

impl InMemoryFrameRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FrameRepository for InMemoryFrameRepository {
    async fn save(&self, id: &str, frame: &ProblemFrame) -> Result<()> {
        let payload = frame.to_json_pretty()?;
        self.frames.write().await.insert(id.to_string(), payload);
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<ProblemFrame>> {
        let frames = self.frames.read().await;
        frames
            .get(id)
            .map(|text| ProblemFrame::from_json_str(text))
            .transpose()
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.frames.read().await.contains_key(id))
    }
}
