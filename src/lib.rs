//! Obstacle-triggered tilt logger.
//!
//! Polls a digital obstacle sensor and an accelerometer; on every detection the
//! tilt angles are computed, printed, and appended to a JSON log that is
//! rewritten in full after each append.

pub mod config;
pub mod logger;
pub mod sampler;
pub mod sensors;
pub mod storage;
pub mod types;
pub mod utils;
