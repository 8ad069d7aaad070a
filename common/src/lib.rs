//! Shared utilities for mongo-init components
//!
//! This crate provides the ambient plumbing used by the bootstrap binary:
//! - Structured logging initialization
//! - Environment variable parsing helpers
//! - Subprocess execution for the database shell

pub mod command;
pub mod config;
pub mod logging;

pub use command::{mongosh, CommandOutput};
pub use config::{ConfigExt, MongoEnv};
pub use logging::init_logging;
