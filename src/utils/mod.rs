//! Utility functions module
//!
//! This module contains process-level plumbing used by the binary.

pub mod panic_hook;
pub mod signals;

// Re-export main functions
pub use panic_hook::install_panic_hook;
pub use signals::shutdown_signal;
