//! Utility modules: build info, logging setup, persistence.

pub mod build_info;
pub mod logging;
pub mod persistence;

pub use persistence::*;
