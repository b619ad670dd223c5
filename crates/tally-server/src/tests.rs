use super::*;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tally_core::storage::{MemoryTable, SqliteStore};
use tally_core::{
    CommittedIds, Decimal, Department, Item, MirrorTable, NewSalary, NewSale, Sale, SaleItem,
    Salary, SalaryItem, TallyError,
};
use tower::ServiceExt;

struct FailingTable;

#[async_trait]
impl MirrorTable for FailingTable {
    fn name(&self) -> &str {
        "failing"
    }

    async fn put(&self, _key: &str, _item: &Item) -> tally_core::Result<()> {
        Err(TallyError::Storage("table unavailable".to_string()))
    }

    async fn scan(&self, _limit: usize) -> tally_core::Result<Vec<Item>> {
        Err(TallyError::Storage("table unavailable".to_string()))
    }
}

/// Relational store that errors on every read, or panics when `panics` is set
struct BrokenRecords {
    panics: bool,
}

impl BrokenRecords {
    fn fail<T>(&self) -> tally_core::Result<T> {
        if self.panics {
            panic!("record store exploded");
        }
        Err(TallyError::Storage("connection refused".to_string()))
    }
}

#[async_trait]
impl RecordStore for BrokenRecords {
    async fn ping(&self) -> tally_core::Result<()> {
        self.fail()
    }

    async fn ensure_schema(&self) -> tally_core::Result<()> {
        self.fail()
    }

    async fn insert_pair(
        &self,
        _sale: &NewSale,
        _salary: &NewSalary,
    ) -> tally_core::Result<CommittedIds> {
        self.fail()
    }

    async fn get_sale(&self, _id: i64) -> tally_core::Result<Option<Sale>> {
        self.fail()
    }

    async fn get_salary(&self, _id: i64) -> tally_core::Result<Option<Salary>> {
        self.fail()
    }

    async fn recent_sales(&self, _limit: u32) -> tally_core::Result<Vec<Sale>> {
        self.fail()
    }

    async fn recent_salaries(&self, _limit: u32) -> tally_core::Result<Vec<Salary>> {
        self.fail()
    }
}

async fn sqlite_records() -> Arc<dyn RecordStore> {
    let store = SqliteStore::connect("sqlite::memory:", 1).await.unwrap();
    store.ensure_schema().await.unwrap();
    Arc::new(store)
}

fn memory_mirror() -> Mirror {
    Mirror::new(
        Arc::new(MemoryTable::new("sales-mirror")),
        Arc::new(MemoryTable::new("salaries-mirror")),
    )
}

fn pair(n: i32) -> (NewSale, NewSalary) {
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    (
        NewSale {
            product_name: "Monitor 4K".to_string(),
            quantity: n % 10 + 1,
            total_amount: 1500000.5,
            sale_time: at,
        },
        NewSalary {
            employee_name: format!("Budi Santoso {}", n),
            department: Department::Engineering,
            salary_amount: 7500000.25,
            payment_time: at,
        },
    )
}

fn sale_item(id: i64) -> SaleItem {
    SaleItem {
        sale_id: id,
        product_name: "Laptop Pro".to_string(),
        quantity: 2,
        total_amount: Decimal::from_cents(1234567),
        sale_time: "2024-06-01T12:00:00.000000Z".to_string(),
    }
}

fn salary_item(id: i64) -> SalaryItem {
    SalaryItem {
        salary_id: id,
        employee_name: "Siti Rahayu".to_string(),
        department: "HR".to_string(),
        salary_amount: Decimal::from_cents(650000000),
        payment_time: "2024-06-01T12:00:00.000000Z".to_string(),
    }
}

async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri).await
}

async fn send(app: Router, method: Method, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ORIGIN, "http://dashboard.local")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn assert_json_with_cors(response: &Response) {
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_summary_is_capped_per_table() {
    let mirror = memory_mirror();
    for id in 1..=15 {
        mirror.put_sale(&sale_item(id)).await.unwrap();
    }
    for id in 1..=3 {
        mirror.put_salary(&salary_item(id)).await.unwrap();
    }

    let app = app(AppState {
        records: sqlite_records().await,
        mirror,
    });
    let response = get(app, "/summary").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_json_with_cors(&response);

    let body = json_body(response).await;
    assert_eq!(body["recent_sales"].as_array().unwrap().len(), 10);
    assert_eq!(body["recent_salaries"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_summary_renders_numbers() {
    let mirror = memory_mirror();
    mirror.put_sale(&sale_item(7)).await.unwrap();
    mirror.put_salary(&salary_item(4)).await.unwrap();

    let app = app(AppState {
        records: sqlite_records().await,
        mirror,
    });
    let body = json_body(get(app, "/summary").await).await;

    let sale = &body["recent_sales"][0];
    assert_eq!(sale["sale_id"], 7);
    assert_eq!(sale["quantity"], 2);
    assert_eq!(sale["total_amount"].as_f64(), Some(12345.67));
    assert_eq!(sale["sale_time"], "2024-06-01T12:00:00.000000Z");

    let salary = &body["recent_salaries"][0];
    assert_eq!(salary["salary_id"], 4);
    assert_eq!(salary["department"], "HR");
    assert_eq!(salary["salary_amount"].as_f64(), Some(6500000.0));
}

#[tokio::test]
async fn test_summary_skips_malformed_items() {
    let sales = Arc::new(MemoryTable::new("sales-mirror"));
    sales
        .put("9", &Item::new().with_str("product_name", "Webcam HD"))
        .await
        .unwrap();
    let mirror = Mirror::new(sales, Arc::new(MemoryTable::new("salaries-mirror")));
    mirror.put_sale(&sale_item(1)).await.unwrap();

    let app = app(AppState {
        records: sqlite_records().await,
        mirror,
    });
    let response = get(app, "/summary").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let sales = body["recent_sales"].as_array().unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0]["sale_id"], 1);
}

#[tokio::test]
async fn test_summary_store_failure() {
    let app = app(AppState {
        records: sqlite_records().await,
        mirror: Mirror::new(
            Arc::new(MemoryTable::new("sales-mirror")),
            Arc::new(FailingTable),
        ),
    });
    let response = get(app, "/summary").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_json_with_cors(&response);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "Failed to fetch summary data." })
    );
}

#[tokio::test]
async fn test_report_is_bounded_and_newest_first() {
    let records = sqlite_records().await;
    for n in 0..105 {
        let (sale, salary) = pair(n);
        records.insert_pair(&sale, &salary).await.unwrap();
    }

    let app = app(AppState {
        records,
        mirror: memory_mirror(),
    });

    let response = get(app.clone(), "/report/sales").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_json_with_cors(&response);

    let body = json_body(response).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 100);
    assert_eq!(rows[0]["id"], 105);
    assert_eq!(rows[99]["id"], 6);
    assert_eq!(rows[0]["product_name"], "Monitor 4K");
    assert_eq!(rows[0]["total_amount"].as_f64(), Some(1500000.5));

    let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert!(ids.windows(2).all(|w| w[0] > w[1]));

    let body = json_body(get(app, "/report/salaries").await).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 100);
    assert_eq!(rows[0]["id"], 105);
    assert_eq!(rows[0]["department"], "Engineering");
    assert_eq!(rows[0]["salary_amount"].as_f64(), Some(7500000.25));
}

#[tokio::test]
async fn test_report_empty_tables() {
    let app = app(AppState {
        records: sqlite_records().await,
        mirror: memory_mirror(),
    });
    let response = get(app, "/report/salaries").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn test_report_unknown_kind() {
    let app = app(AppState {
        records: sqlite_records().await,
        mirror: memory_mirror(),
    });
    let response = get(app, "/report/foo").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_json_with_cors(&response);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "Invalid report type." })
    );
}

#[tokio::test]
async fn test_report_store_failure() {
    let app = app(AppState {
        records: Arc::new(BrokenRecords { panics: false }),
        mirror: memory_mirror(),
    });
    let response = get(app, "/report/sales").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "Failed to fetch detailed report." })
    );
}

#[tokio::test]
async fn test_handler_panic_becomes_json_error() {
    let app = app(AppState {
        records: Arc::new(BrokenRecords { panics: true }),
        mirror: memory_mirror(),
    });
    let response = get(app, "/report/salaries").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_json_with_cors(&response);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({ "error": "Internal server error." })
    );
}

#[tokio::test]
async fn test_unknown_path_lists_endpoints() {
    let app = app(AppState {
        records: sqlite_records().await,
        mirror: memory_mirror(),
    });

    for uri in ["/nonexistent", "/", "/report", "/report/sales/extra"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        assert_json_with_cors(&response);

        let body = json_body(response).await;
        assert_eq!(
            body["endpoints"],
            serde_json::json!(["/summary", "/report/sales", "/report/salaries"])
        );
        assert!(body["message"].as_str().unwrap().starts_with("Endpoint not found"));
    }
}

#[tokio::test]
async fn test_routes_answer_json_for_any_method() {
    let mirror = memory_mirror();
    mirror.put_sale(&sale_item(3)).await.unwrap();
    let app = app(AppState {
        records: sqlite_records().await,
        mirror,
    });

    for method in [Method::POST, Method::DELETE, Method::PUT] {
        let response = send(app.clone(), method.clone(), "/summary").await;
        assert_eq!(response.status(), StatusCode::OK, "{}", method);
        assert_json_with_cors(&response);
        let body = json_body(response).await;
        assert_eq!(body["recent_sales"][0]["sale_id"], 3);
    }

    let response = send(app.clone(), Method::POST, "/report/sales").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_json_with_cors(&response);
    assert_eq!(json_body(response).await, serde_json::json!([]));

    let response = send(app, Method::DELETE, "/report/foo").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_json_with_cors(&response);
}
