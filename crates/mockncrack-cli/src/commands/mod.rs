//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod questions;
pub mod seed;
pub mod serve;
pub mod token;
pub mod tokens;

use crate::output::OutputFormat;
use mockncrack_core::{Database, ServiceConfig};

/// Shared context for all commands
pub struct Context {
    pub db: Database,
    pub config: ServiceConfig,
    pub format: OutputFormat,
    pub quiet: bool,
}
