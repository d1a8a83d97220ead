pub mod reconciliation_service;
pub mod refresh_policy;
pub mod report_service;

pub use reconciliation_service::ReconciliationService;
pub use refresh_policy::RefreshPolicy;
pub use report_service::ReportService;
