pub mod report;

pub use report::{RebuildSummary, Report, ReportBucket, TuitionMonthReport};
