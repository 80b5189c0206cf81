//! HTTP API tests over the in-memory store

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use core_kernel::FixedClock;
use domain_ledger::{
    DispatchConfig, InMemoryBlobStore, InMemoryTransactionStore, LedgerService, ReportDispatcher,
};
use interface_api::{create_router, AppState};
use test_utils::TemporalFixtures;

struct TestApp {
    server: TestServer,
    service: Arc<LedgerService>,
    blobs: InMemoryBlobStore,
}

/// Every transaction created through this app occurs at 2025-11-03T10:00:00Z
fn test_app() -> TestApp {
    let blobs = InMemoryBlobStore::new();
    let dispatcher = ReportDispatcher::new(Arc::new(blobs.clone()), DispatchConfig::new("reports"));
    let service = Arc::new(
        LedgerService::new(Arc::new(InMemoryTransactionStore::new()), dispatcher)
            .with_clock(Arc::new(FixedClock(TemporalFixtures::payday()))),
    );
    let server = TestServer::new(create_router(AppState::new(Arc::clone(&service)))).unwrap();
    TestApp { server, service, blobs }
}

async fn create(app: &TestApp, body: Value) -> Value {
    let response = app.server.post("/api/v1/transactions").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

async fn seed_canonical_month(app: &TestApp) {
    create(app, json!({"type": "income", "category": "salary", "amount_cents": 500000})).await;
    create(app, json!({"type": "expense", "category": "rent", "amount_cents": 150000})).await;
}

fn assert_error(body: &Value, kind: &str) {
    assert_eq!(body["error"], kind, "unexpected body {}", body);
    assert!(body["message"].is_string(), "missing message in {}", body);
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = app.server.get("/health").await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "healthy");
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_readiness_reports_store() {
        let app = test_app();
        let response = app.server.get("/health/ready").await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["status"], "ready");
        assert_eq!(body["store"]["adapter_id"], "memory-transaction-store");
    }
}

mod transactions {
    use super::*;

    #[tokio::test]
    async fn test_create_returns_created_transaction() {
        let app = test_app();
        let body = create(
            &app,
            json!({"type": "income", "category": " salary ", "amount_cents": 500000, "description": "Nov"}),
        )
        .await;

        assert_eq!(body["type"], "income");
        assert_eq!(body["category"], "salary");
        assert_eq!(body["amount_cents"], 500000);
        assert_eq!(body["description"], "Nov");
        assert_eq!(body["occurred_at"], "2025-11-03T10:00:00Z");
        assert!(body["id"].is_string());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let app = test_app();

        for body in [
            json!({"type": "transfer", "category": "x", "amount_cents": 1}),
            json!({"type": "income", "category": "x", "amount_cents": 0}),
            json!({"type": "expense", "category": "x", "amount_cents": -5}),
            json!({"type": "income", "category": "   ", "amount_cents": 1}),
            json!({"type": "income", "category": "x"}),
        ] {
            let response = app.server.post("/api/v1/transactions").json(&body).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            assert_error(&response.json::<Value>(), "bad_request");
        }

        let listed = app
            .service
            .list_by_period(TemporalFixtures::november_start(), TemporalFixtures::december_start())
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_list_by_day_range() {
        let app = test_app();
        seed_canonical_month(&app).await;

        let response = app
            .server
            .get("/api/v1/transactions")
            .add_query_param("from", "2025-11-01")
            .add_query_param("to", "2025-11-30")
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Value>>().len(), 2);
    }

    #[tokio::test]
    async fn test_list_includes_whole_last_day() {
        let app = test_app();
        seed_canonical_month(&app).await;

        let response = app
            .server
            .get("/api/v1/transactions")
            .add_query_param("from", "2025-11-03")
            .add_query_param("to", "2025-11-03")
            .await;

        assert_eq!(response.json::<Vec<Value>>().len(), 2);
    }

    #[tokio::test]
    async fn test_list_interprets_days_in_time_zone() {
        let app = test_app();
        seed_canonical_month(&app).await;

        // 10:00 UTC on Nov 3 is 19:00 Nov 3 in Tokyo but 00:00 Nov 4 at UTC+14
        let tokyo = app
            .server
            .get("/api/v1/transactions")
            .add_query_param("from", "2025-11-03")
            .add_query_param("to", "2025-11-03")
            .add_query_param("tz", "Asia/Tokyo")
            .await;
        assert_eq!(tokyo.json::<Vec<Value>>().len(), 2);

        let kiritimati = app
            .server
            .get("/api/v1/transactions")
            .add_query_param("from", "2025-11-03")
            .add_query_param("to", "2025-11-03")
            .add_query_param("tz", "Pacific/Kiritimati")
            .await;
        assert!(kiritimati.json::<Vec<Value>>().is_empty());
    }

    #[tokio::test]
    async fn test_list_accepts_day_starting_in_dst_gap() {
        let app = test_app();

        // Midnight did not exist in Sao Paulo on 2018-11-04
        let response = app
            .server
            .get("/api/v1/transactions")
            .add_query_param("from", "2018-11-04")
            .add_query_param("to", "2018-11-04")
            .add_query_param("tz", "America/Sao_Paulo")
            .await;

        response.assert_status_ok();
        assert!(response.json::<Vec<Value>>().is_empty());
    }

    #[tokio::test]
    async fn test_list_rejects_bad_queries() {
        let app = test_app();

        let cases: [&[(&str, &str)]; 4] = [
            &[("from", "2025-11-01")],
            &[("from", "2025-11-30"), ("to", "2025-11-01")],
            &[("from", "01/11/2025"), ("to", "2025-11-30")],
            &[("from", "2025-11-01"), ("to", "2025-11-30"), ("tz", "Mars/Olympus")],
        ];

        for params in cases {
            let mut request = app.server.get("/api/v1/transactions");
            for (key, value) in params {
                request = request.add_query_param(key, value);
            }
            let response = request.await;
            response.assert_status(StatusCode::BAD_REQUEST);
            assert_error(&response.json::<Value>(), "bad_request");
        }
    }

    #[tokio::test]
    async fn test_delete() {
        let app = test_app();
        let created = create(&app, json!({"type": "income", "category": "salary", "amount_cents": 1})).await;
        let id = created["id"].as_str().unwrap().to_string();

        app.server
            .delete(&format!("/api/v1/transactions/{}", id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let again = app.server.delete(&format!("/api/v1/transactions/{}", id)).await;
        again.assert_status(StatusCode::NOT_FOUND);
        assert_error(&again.json::<Value>(), "not_found");
    }

    #[tokio::test]
    async fn test_delete_accepts_prefixed_id() {
        let app = test_app();
        let created = create(&app, json!({"type": "expense", "category": "food", "amount_cents": 1})).await;
        let id = created["id"].as_str().unwrap();

        app.server
            .delete(&format!("/api/v1/transactions/TXN-{}", id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_delete_rejects_malformed_id() {
        let app = test_app();
        let response = app.server.delete("/api/v1/transactions/not-a-uuid").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_error(&response.json::<Value>(), "bad_request");
    }
}

mod monthly {
    use super::*;

    #[tokio::test]
    async fn test_summary() {
        let app = test_app();
        seed_canonical_month(&app).await;

        let response = app
            .server
            .get("/api/v1/summary/monthly")
            .add_query_param("year", 2025)
            .add_query_param("month", 11)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["income_cents"], 500000);
        assert_eq!(body["expense_cents"], 150000);
        assert_eq!(body["net_cents"], 350000);
        assert_eq!(body["count_transactions"], 2);
        assert_eq!(body["first_tx"], "2025-11-03T10:00:00Z");
    }

    #[tokio::test]
    async fn test_empty_month_omits_dates() {
        let app = test_app();

        let response = app
            .server
            .get("/api/v1/summary/monthly")
            .add_query_param("year", 2024)
            .add_query_param("month", 2)
            .await;

        let body = response.json::<Value>();
        assert_eq!(body["count_transactions"], 0);
        assert_eq!(body["net_cents"], 0);
        assert!(body.get("first_tx").is_none());
        assert!(body.get("last_tx").is_none());
    }

    #[tokio::test]
    async fn test_summary_rejects_bad_month() {
        let app = test_app();

        for (year, month) in [("2025", "13"), ("2025", "0"), ("abc", "11")] {
            let response = app
                .server
                .get("/api/v1/summary/monthly")
                .add_query_param("year", year)
                .add_query_param("month", month)
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
        }

        let missing = app.server.get("/api/v1/reports/monthly").add_query_param("year", 2025).await;
        missing.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_report_is_returned_and_uploaded() {
        let app = test_app();
        seed_canonical_month(&app).await;

        let response = app
            .server
            .get("/api/v1/reports/monthly")
            .add_query_param("year", 2025)
            .add_query_param("month", 11)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["income_cents"], 500000);
        assert_eq!(body["report_key"], "report-2025-11.txt");
        assert_eq!(body["report_location"], "reports/report-2025-11.txt");
        assert_eq!(body["dispatch"], "scheduled");

        let text = body["report_text"].as_str().unwrap();
        assert!(text.contains("MONTHLY FINANCIAL REPORT - November/2025"));
        assert!(text.contains("Net Balance:    $ 3500.00"));

        app.service.dispatcher().drain().await;
        let stored = app.blobs.get("reports", "report-2025-11.txt").await.unwrap();
        assert_eq!(stored.text(), Some(text));
    }
}

mod bootstrapped {
    use super::*;
    use interface_api::{bootstrap::build_service, config::ApiConfig};

    #[tokio::test]
    async fn test_report_lands_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = ApiConfig {
            blob_root: dir.path().display().to_string(),
            report_bucket: "monthly".to_string(),
            ..ApiConfig::default()
        };
        let service = Arc::new(build_service(&config).await.unwrap());
        let server = TestServer::new(create_router(AppState::new(Arc::clone(&service)))).unwrap();

        server
            .post("/api/v1/transactions")
            .json(&json!({"type": "expense", "category": "rent", "amount_cents": 150000}))
            .await
            .assert_status(StatusCode::CREATED);

        let now = chrono::Utc::now();
        let response = server
            .get("/api/v1/reports/monthly")
            .add_query_param("year", chrono::Datelike::year(&now))
            .add_query_param("month", chrono::Datelike::month(&now))
            .await;
        response.assert_status_ok();
        let body = response.json::<Value>();

        assert!(service.dispatcher().shutdown(config.shutdown_grace()).await);

        let key = body["report_key"].as_str().unwrap();
        let written = std::fs::read_to_string(dir.path().join("monthly").join(key)).unwrap();
        assert_eq!(written, body["report_text"].as_str().unwrap());
        assert!(written.contains("Status: NEGATIVE"));
    }
}
