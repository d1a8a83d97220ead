pub mod controllers;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::configure;
pub use error::ReportError;
pub use models::{RebuildSummary, Report, ReportBucket, TuitionMonthReport};
pub use repositories::{InMemoryReportRepository, MySqlReportRepository, ReportRepository, StoreError};
pub use services::{ReconciliationService, RefreshPolicy, ReportService};
