//! Tuition Payment Status Reports Library
//!
//! Rebuilds, on demand, a paid/unpaid report for every tuition and calendar
//! month by reconciling registration data against the payment service.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::collaborators;
pub use modules::reports;
