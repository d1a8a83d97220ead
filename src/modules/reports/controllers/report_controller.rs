use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::core::{is_valid_month, AppError, Month, Result};
use crate::modules::reports::models::{RebuildSummary, Report, TuitionMonthReport};
use crate::modules::reports::services::ReportService;

const DISPLAY_MESSAGE: &str = "Successfully returned the report";

/// Path parameters of the report lookup endpoint
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub tuition_id: String,
    pub month: String,
}

impl ReportRequest {
    /// Check required fields and the month token before the core is called
    pub fn validate(&self) -> Result<Month> {
        if self.tuition_id.trim().is_empty() {
            return Err(AppError::validation("Missing required fields"));
        }
        if !is_valid_month(&self.month) {
            return Err(AppError::InvalidMonth(self.month.clone()));
        }
        self.month.parse()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
}

/// Success envelope shared by all report endpoints
#[derive(Debug, Serialize)]
pub struct ResponseWrapper<T> {
    pub status: ResponseStatus,
    pub message: String,
    pub data: T,
    pub display_message: String,
}

impl<T: Serialize> ResponseWrapper<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data,
            display_message: DISPLAY_MESSAGE.to_string(),
        }
    }
}

/// Single report row as exposed over HTTP
#[derive(Debug, Serialize)]
pub struct ReportDto {
    pub id: Option<String>,
    pub tuition_id: String,
    pub month: Month,
    pub student_id: String,
    pub is_paid: bool,
    pub updated_at: String,
}

impl From<Report> for ReportDto {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            tuition_id: report.tuition_id,
            month: report.month,
            student_id: report.student_id,
            is_paid: report.is_paid,
            updated_at: report.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub paid_report: ReportDto,
    pub unpaid_report: ReportDto,
    pub paid_student_ids: Vec<String>,
    pub unpaid_student_ids: Vec<String>,
}

impl From<TuitionMonthReport> for ReportResponse {
    fn from(report: TuitionMonthReport) -> Self {
        Self {
            paid_report: report.paid_report.into(),
            unpaid_report: report.unpaid_report.into(),
            paid_student_ids: report.paid_student_ids,
            unpaid_student_ids: report.unpaid_student_ids,
        }
    }
}

/// GET /api/v1/report/get/{tuition_id}/{month}
///
/// Rebuilds reports per the refresh policy, then returns the paid and unpaid
/// reports of the tuition-month.
pub async fn get_report_by_tuition_month(
    service: web::Data<Arc<ReportService>>,
    path: web::Path<ReportRequest>,
) -> Result<HttpResponse> {
    let request = path.into_inner();
    let month = request.validate().map_err(|e| {
        error!(error = %e, "Rejected report request");
        e
    })?;

    let report = service
        .get_tuition_month_report(&request.tuition_id, month)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                tuition_id = %request.tuition_id,
                month = %month,
                "Getting report by tuition id and month failed"
            );
            AppError::from(e)
        })?;

    debug!(tuition_id = %request.tuition_id, month = %month, "Successfully returned report");
    Ok(HttpResponse::Ok().json(ResponseWrapper::success(
        "Successfully returned the report",
        ReportResponse::from(report),
    )))
}

/// POST /api/v1/report/refresh
pub async fn refresh_reports(service: web::Data<Arc<ReportService>>) -> Result<HttpResponse> {
    let summary: RebuildSummary = service.refresh().await?;
    Ok(HttpResponse::Ok().json(ResponseWrapper::success(
        "Successfully refreshed reports",
        summary,
    )))
}

/// Configure routes for reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/report")
            .route(
                "/get/{tuition_id}/{month}",
                web::get().to(get_report_by_tuition_month),
            )
            .route("/refresh", web::post().to(refresh_reports)),
    );
}
