//! # Planframe State
//!
//! Durable frame repositories and the in-memory frame registry in front of them.

pub mod manager;
pub mod repository;

pub use manager::FrameManager;
pub use repository::{FileFrameRepository, FrameRepository, InMemoryFrameRepository};
