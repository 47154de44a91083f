//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod inspect;
mod mine;

pub use inspect::{inspect_formula, run_inspect};
pub use mine::run_mine;

// Re-export config types used by handlers
pub use crate::config::MinerConfig;
