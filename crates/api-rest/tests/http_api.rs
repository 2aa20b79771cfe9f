use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use clinica_core::{
    ClinicService, Collection, CoreConfig, MemoryServer, ViewPath, DEFAULT_COUCH_URL,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_cfg() -> Arc<CoreConfig> {
    Arc::new(CoreConfig::new(DEFAULT_COUCH_URL).expect("default URL should be valid"))
}

async fn connected_router() -> (Router, MemoryServer) {
    let server = MemoryServer::with_clinic_databases();
    let collections = server.connect().await.expect("memory databases exist");
    let service = ClinicService::new(test_cfg(), Some(collections));
    (api_rest::router(service), server)
}

fn degraded_router() -> Router {
    api_rest::router(ClinicService::new(test_cfg(), None))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("GET request")
}

fn post_raw(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("POST request")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should answer");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).expect("body should be JSON");
    (status, json)
}

#[tokio::test]
async fn empty_collections_list_as_empty_arrays() {
    let (router, _server) = connected_router().await;

    for uri in ["/api/pacienti", "/api/doctori", "/api/istoric", "/api/imagini"] {
        let (status, body) = send(&router, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn created_patient_is_listed_with_kind_tag() {
    let (router, _server) = connected_router().await;

    let (status, created) = send(
        &router,
        post_json("/api/pacienti", json!({"nume_complet": "Ana Pop"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["mesaj"], "Pacient adăugat");
    let id = created["id"].as_str().expect("id should be a string");
    assert!(!id.is_empty());

    let (status, listed) = send(&router, get("/api/pacienti")).await;
    assert_eq!(status, StatusCode::OK);
    let patients = listed.as_array().expect("listing is an array");
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0]["_id"], id);
    assert_eq!(patients[0]["nume_complet"], "Ana Pop");
    assert_eq!(patients[0]["tip_document"], "pacient");
}

#[tokio::test]
async fn caller_supplied_kind_is_overwritten() {
    let (router, _server) = connected_router().await;

    let (status, _) = send(
        &router,
        post_json(
            "/api/pacienti",
            json!({"nume_complet": "Ion Popescu", "tip_document": "doctor", "telefon": "0722"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, listed) = send(&router, get("/api/pacienti")).await;
    assert_eq!(listed[0]["tip_document"], "pacient");
    assert_eq!(listed[0]["telefon"], "0722");
}

#[tokio::test]
async fn incomplete_patients_are_rejected_without_writing() {
    let (router, server) = connected_router().await;
    let expected = json!({"eroare": "Date incomplete. Numele este necesar."});

    let bodies = [
        "{}".to_string(),
        json!({"nume": "Ana"}).to_string(),
        "[]".to_string(),
        "not json".to_string(),
        String::new(),
    ];
    for body in bodies {
        let (status, response) = send(&router, post_raw("/api/pacienti", body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(response, expected, "body {body:?}");
    }

    let patients = server.database(Collection::Patients).unwrap();
    assert_eq!(patients.document_count(), 0);
}

#[tokio::test]
async fn design_documents_never_appear_in_listings() {
    let (router, server) = connected_router().await;
    let history = server.database(Collection::History).unwrap();
    history.define_sum_view(
        &ViewPath::new("analiza_financiara", "analiza_financiara"),
        "id_doctor",
        "cost",
    );
    history
        .insert(
            json!({"id_doctor": "d1", "cost": 120, "tratament": "detartraj"})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .unwrap();

    let (status, listed) = send(&router, get("/api/istoric")).await;
    assert_eq!(status, StatusCode::OK);
    let rows = listed.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows
        .iter()
        .all(|r| !r["_id"].as_str().unwrap().starts_with("_design/")));
}

#[tokio::test]
async fn revenue_report_comes_from_the_grouped_view() {
    let (router, server) = connected_router().await;
    let history = server.database(Collection::History).unwrap();
    history.define_sum_view(
        &ViewPath::new("analiza_financiara", "analiza_financiara"),
        "id_doctor",
        "cost",
    );
    for (doctor, cost) in [("d2", json!(300)), ("d1", json!(99.5)), ("d2", json!(200))] {
        let doc = json!({"id_doctor": doctor, "cost": cost});
        history.insert(doc.as_object().cloned().unwrap()).unwrap();
    }

    let (status, report) = send(&router, get("/api/analiza/venit_doctori")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        report,
        json!([
            {"id_doctor": "d1", "venit_total": 99.5},
            {"id_doctor": "d2", "venit_total": 500.0},
        ])
    );
}

#[tokio::test]
async fn missing_view_names_the_expected_path() {
    let (router, _server) = connected_router().await;

    let (status, body) = send(&router, get("/api/analiza/venit_doctori")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["eroare"].as_str().expect("error envelope");
    assert!(message.contains("'analiza_financiara/analiza_financiara'"));
    assert!(message.contains("tratament_istoric"));
}

#[tokio::test]
async fn store_failure_during_listing_is_a_server_error() {
    let (router, server) = connected_router().await;
    server
        .database(Collection::Doctors)
        .unwrap()
        .fail_with("connection reset");

    let (status, body) = send(&router, get("/api/doctori")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["eroare"].as_str().unwrap();
    assert!(message.starts_with("Eroare la preluarea doctorilor din CouchDB: "));
    assert!(message.contains("connection reset"));
}

#[tokio::test]
async fn degraded_store_answers_500_naming_the_database() {
    let router = degraded_router();

    let cases = [
        (get("/api/pacienti"), "pacienti"),
        (get("/api/doctori"), "doctori"),
        (get("/api/istoric"), "tratament_istoric"),
        (get("/api/imagini"), "imagini_medicale"),
        (get("/api/analiza/venit_doctori"), "tratament_istoric"),
        (
            post_json("/api/pacienti", json!({"nume_complet": "Ana Pop"})),
            "pacienti",
        ),
        (post_json("/api/pacienti", json!({})), "pacienti"),
    ];
    for (request, database) in cases {
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"eroare": format!("Conexiunea la baza de date {database} a eșuat")})
        );
    }

    let (status, health) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["store"], "degraded");
}

#[tokio::test]
async fn cross_origin_requests_are_allowed_from_any_origin() {
    let (router, _server) = connected_router().await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/doctori")
        .header(header::ORIGIN, "http://localhost:8080")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn health_reports_connected_store() {
    let (router, _server) = connected_router().await;

    let (status, health) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["ok"], true);
    assert_eq!(health["store"], "connected");
}
