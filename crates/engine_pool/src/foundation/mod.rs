//! Foundation module - Core utilities shared by the pool types
//!
//! - Logging setup

pub mod logging;
