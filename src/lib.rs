//! TurboClean - temp and cache cleanup
//!
//! This crate provides functionality for:
//! - Measuring reclaimable space in well-known junk locations
//! - Best-effort deletion of the locations a user selects
//! - Probing a few system settings for configuration issues
//! - Listing installed programs and flagging old ones
//! - Summarizing fixed drive usage

pub mod cleaner;
pub mod cli;
pub mod commands;
pub mod config;
pub mod disk;
pub mod error;
pub mod programs;
pub mod scanner;
pub mod task;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TurboError};
