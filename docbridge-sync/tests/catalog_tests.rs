use docbridge_sync::{Catalog, CatalogConfig, HttpCatalog, SyncError, WriteBack};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> HttpCatalog {
    HttpCatalog::new(CatalogConfig {
        base_url: server.uri(),
        username: "sync-bot".to_string(),
        password: "hunter2".to_string(),
        timeout_secs: 10,
    })
}

// ── login ────────────────────────────────────────────────────────

#[tokio::test]
async fn login_posts_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"username": "sync-bot", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).login().await.unwrap();
}

#[tokio::test]
async fn login_failure_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client(&server).login().await.unwrap_err();
    assert!(matches!(err, SyncError::Status { status: 401, .. }));
}

#[tokio::test]
async fn ensure_login_skips_when_session_is_valid() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    client(&server).ensure_login().await.unwrap();
}

#[tokio::test]
async fn ensure_login_reauthenticates_on_401() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).ensure_login().await.unwrap();
}

// ── entity listing ───────────────────────────────────────────────

#[tokio::test]
async fn fetch_entities_parses_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("includeUnpublished", "true"))
        .and(query_param("sort", "creationDate"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [{
                "_id": "64f1c2d3a4b5c6d7e8f90a1b",
                "title": "Report",
                "documents": [],
                "attachments": [{"filename": "169doc.pdf", "originalname": "doc.pdf"}],
                "metadata": {"summary": [{"value": "text"}]},
                "editDate": 100,
                "template": "tpl-report"
            }]
        })))
        .mount(&server)
        .await;

    let records = client(&server).fetch_entities().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Report");
    assert_eq!(records[0].template.as_str(), "tpl-report");
}

#[tokio::test]
async fn fetch_entities_failure_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server).fetch_entities().await.unwrap_err();
    assert!(matches!(err, SyncError::Status { status: 500, .. }));
}

// ── template listing ─────────────────────────────────────────────

#[tokio::test]
async fn fetch_templates_maps_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rows": [
                {"_id": "tpl-report", "name": "Report", "properties": [
                    {"name": "summary", "type": "text"}
                ]},
                {"_id": "tpl-photo", "name": "Photo", "properties": []}
            ]
        })))
        .mount(&server)
        .await;

    let templates = client(&server).fetch_templates().await.unwrap();
    assert_eq!(templates.len(), 2);
    let id = docbridge_types::TemplateId::parse("tpl-report").unwrap();
    assert!(templates[&id].has("summary"));
}

// ── write-back ───────────────────────────────────────────────────

fn sample_record() -> docbridge_model::CatalogRecord {
    serde_json::from_value(json!({
        "_id": "64f1c2d3a4b5c6d7e8f90a1b",
        "title": "Report",
        "documents": [],
        "attachments": [{"filename": "169doc.pdf", "originalname": "doc.pdf"}],
        "metadata": {"sha256cid": [{"value": "bafybeigdyrzt5s"}]},
        "editDate": 100,
        "template": "tpl-report"
    }))
    .unwrap()
}

#[tokio::test]
async fn write_back_posts_the_record_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/entities"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server).write_back(&sample_record()).await.unwrap();
    assert_eq!(outcome, WriteBack::Accepted);
}

#[tokio::test]
async fn write_back_422_means_unsupported_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/entities"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let outcome = client(&server).write_back(&sample_record()).await.unwrap();
    assert_eq!(outcome, WriteBack::UnsupportedField);
}

#[tokio::test]
async fn write_back_other_failure_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/entities"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server).write_back(&sample_record()).await.unwrap_err();
    assert!(matches!(err, SyncError::Status { status: 500, .. }));
}
