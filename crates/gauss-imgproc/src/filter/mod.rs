//! Filter operations
//!
//! This module provides the strip based binomial blur.

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;

/// Strip partitioning
mod partition;
pub use partition::partition_strips;

/// Strip convolution passes
mod strip;
pub use strip::*;
