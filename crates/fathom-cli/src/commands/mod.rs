//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Ledger analysis (report, predict, clusters, budget, health, insights)
//! - `core` - Shared utilities (config, session loading, JSON output)
//! - `invest` - Investment projection
//! - `signals` - Tier recommendation, sentiment, config display

pub mod analyze;
pub mod core;
pub mod invest;
pub mod signals;

// Re-export command functions for main.rs
pub use analyze::*;
pub use core::*;
pub use invest::*;
pub use signals::*;
