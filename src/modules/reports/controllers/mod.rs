mod report_controller;

pub use report_controller::{
    configure, get_report_by_tuition_month, refresh_reports, ReportDto, ReportRequest,
    ReportResponse, ResponseWrapper,
};
