pub mod memory_repository;
pub mod report_repository;

pub use memory_repository::InMemoryReportRepository;
pub use report_repository::{MySqlReportRepository, ReportRepository, StoreError};
