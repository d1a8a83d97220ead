//! Contract tests for the report API
//!
//! Drives GET /api/v1/report/get/{tuition_id}/{month} and POST /api/v1/report/refresh
//! through the real handlers, with scripted collaborators behind the service.
//! Checks status codes, envelope fields and error bodies.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{test, web, App};
use helpers::*;
use serde_json::Value;
use tuition_reports::core::Month;
use tuition_reports::modules::reports::{self, RefreshPolicy};

fn paid_in_march() -> Harness {
    Harness::new(
        FaultyStore::new(),
        ScriptedRegistration::new(vec![tuition("T1", &["S1", "S2"])]),
        ScriptedPayments::new().paid("T1", Month::March, &["S1"]),
    )
}

macro_rules! report_app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($harness.report_service(RefreshPolicy::EveryRead)))
                .configure(reports::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_get_report_success_envelope() {
    let harness = paid_in_march();
    let app = report_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/v1/report/get/T1/MARCH")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["display_message"], "Successfully returned the report");

    let data = &body["data"];
    assert_eq!(data["paid_report"]["tuition_id"], "T1");
    assert_eq!(data["paid_report"]["month"], "MARCH");
    assert_eq!(data["paid_report"]["student_id"], "S1");
    assert_eq!(data["paid_report"]["is_paid"], true);
    assert!(data["paid_report"]["id"].is_string());
    assert!(data["paid_report"]["updated_at"].is_string());
    assert_eq!(data["unpaid_report"]["student_id"], "S2");
    assert_eq!(data["unpaid_report"]["is_paid"], false);
    assert_eq!(data["paid_student_ids"], serde_json::json!(["S1"]));
    assert_eq!(data["unpaid_student_ids"], serde_json::json!(["S2"]));
}

#[actix_web::test]
async fn test_invalid_month_is_rejected_before_rebuild() {
    let harness = paid_in_march();
    let app = report_app!(harness);

    for month in ["March", "SMARCH", "march"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/report/get/T1/{}", month))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], 400);
        assert_eq!(body["error"]["error_code"], 4002);
    }

    assert_eq!(harness.registration.calls(), 0);
    assert_eq!(harness.store.delete_calls(), 0);
}

#[actix_web::test]
async fn test_blank_month_is_invalid_month() {
    let harness = paid_in_march();
    let app = report_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/v1/report/get/T1/%20%20")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["error_code"], 4002);
    assert_eq!(harness.registration.calls(), 0);
}

#[actix_web::test]
async fn test_blank_tuition_id_is_validation_error() {
    let harness = paid_in_march();
    let app = report_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/v1/report/get/%20/MARCH")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["error_code"], 4000);
    assert_eq!(harness.registration.calls(), 0);
}

#[actix_web::test]
async fn test_missing_bucket_is_not_found() {
    // nobody paid, so the paid bucket is empty
    let harness = Harness::single_student();
    let app = report_app!(harness);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/report/get/{}/JUNE", TUITION_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["error_code"], 4001);
}

#[actix_web::test]
async fn test_registration_failure_is_internal_error() {
    let harness = Harness::new(
        FaultyStore::new(),
        ScriptedRegistration::failing(500),
        ScriptedPayments::new(),
    );
    let app = report_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/v1/report/get/T1/MARCH")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["error_code"], 5002);
    assert_eq!(body["error"]["message"], "500 Failed to get tuition list");
    assert!(body["error"]["details"].is_string());
}

#[actix_web::test]
async fn test_store_failure_is_internal_error() {
    let harness = Harness::new(
        FaultyStore::failing_save_at(1),
        ScriptedRegistration::new(vec![tuition("T1", &["S1"])]),
        ScriptedPayments::new().paid("T1", Month::March, &["S1"]),
    );
    let app = report_app!(harness);

    let req = test::TestRequest::get()
        .uri("/api/v1/report/get/T1/MARCH")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["error_code"], 5000);
    assert_eq!(body["error"]["message"], "Error creating paid report list");
}

#[actix_web::test]
async fn test_refresh_returns_summary() {
    let harness = paid_in_march();
    let app = report_app!(harness);

    let req = test::TestRequest::post()
        .uri("/api/v1/report/refresh")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["data"]["generation"], 1);
    assert_eq!(body["data"]["tuitions"], 1);
    assert_eq!(body["data"]["paid_reports"], 1);
    assert_eq!(body["data"]["unpaid_reports"], 23);
    assert_eq!(body["data"]["save_calls"], 96);
}
