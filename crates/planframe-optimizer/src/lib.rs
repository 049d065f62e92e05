//! # Planframe Optimizer
//!
//! Optimization capability for planning frames. Only the interface and an
//! "unsupported" placeholder ship today.

pub mod optimizer;
pub mod unsupported;

pub use optimizer::{OptimizationOutcome, OptimizeRequest, Optimizer};
pub use unsupported::UnsupportedOptimizer;
