//! Utility modules for common functionality.
//!
//! This module contains the logging configuration and the resolution of the
//! per-user cache directory shared by the store and the logs.

pub mod logger;
pub mod paths;
