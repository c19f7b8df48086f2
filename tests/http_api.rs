//! End-to-end resource API tests on the in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use hrms::{resource_app, Backend, ServiceKind};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn app(kind: ServiceKind) -> Router {
    match resource_app(kind, &Backend::Memory, 1024 * 1024).await {
        Ok(router) => router,
        Err(err) => panic!("failed to build app: {err}"),
    }
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|err| panic!("body is not JSON ({err}): {:?}", self.body))
    }
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: Body, headers: &[(&str, &str)]) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
        builder = builder.header(*k, *v);
    }
    let request = builder
        .body(body)
        .unwrap_or_else(|err| panic!("failed to build request: {err}"));
    let response = match app.clone().oneshot(request).await {
        Ok(response) => response,
        Err(err) => panic!("router request failed: {err}"),
    };
    let status = response.status();
    let headers = response.headers().clone();
    let body = match to_bytes(response.into_body(), 1024 * 1024).await {
        Ok(bytes) => bytes.to_vec(),
        Err(err) => panic!("failed to read response body: {err}"),
    };
    Reply { status, headers, body }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Reply {
    match body {
        Some(v) => {
            send_raw(
                app,
                method,
                uri,
                Body::from(v.to_string()),
                &[("content-type", "application/json")],
            )
            .await
        }
        None => send_raw(app, method, uri, Body::empty(), &[]).await,
    }
}

#[tokio::test]
async fn employee_lifecycle_scenario() {
    let app = app(ServiceKind::Employee).await;

    let r = send(
        &app,
        Method::POST,
        "/employees",
        Some(json!({"name":"Ana","designation":"Eng","department":"R&D","salary":90000})),
    )
    .await;
    assert_eq!(r.status, StatusCode::CREATED);
    assert_eq!(
        r.json(),
        json!({"id":1,"name":"Ana","designation":"Eng","department":"R&D","salary":90000.0})
    );

    let r = send(&app, Method::PUT, "/employees/1", Some(json!({"salary":95000}))).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(
        r.json(),
        json!({"id":1,"name":"Ana","designation":"Eng","department":"R&D","salary":95000.0})
    );

    let r = send(&app, Method::DELETE, "/employees/1", None).await;
    assert_eq!(r.status, StatusCode::NO_CONTENT);
    assert!(r.body.is_empty());

    let r = send(&app, Method::GET, "/employees/1", None).await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
    let err = r.json();
    assert_eq!(err["error"]["code"], "not_found");
    assert_eq!(err["error"]["message"], "Employee with id 1 not found");
}

#[tokio::test]
async fn list_starts_empty_and_keeps_insertion_order() {
    let app = app(ServiceKind::Payroll).await;
    let r = send(&app, Method::GET, "/payroll", None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json(), json!([]));

    for net in [100.0, 200.0] {
        let r = send(&app, Method::POST, "/payroll", Some(json!({"employeeId":1,"netSalary":net}))).await;
        assert_eq!(r.status, StatusCode::CREATED);
    }
    let list = send(&app, Method::GET, "/payroll", None).await.json();
    let ids: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(list[1]["netSalary"], 200.0);
}

#[tokio::test]
async fn client_id_is_ignored_on_create_and_update() {
    let app = app(ServiceKind::Employee).await;
    let r = send(&app, Method::POST, "/employees", Some(json!({"id":42,"name":"Ana"}))).await;
    assert_eq!(r.json()["id"], 1);

    let r = send(&app, Method::PUT, "/employees/1", Some(json!({"id":9,"department":"Ops"}))).await;
    assert_eq!(r.json()["id"], 1);
    assert_eq!(send(&app, Method::GET, "/employees/9", None).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_rows_are_not_created_by_update_or_delete() {
    let app = app(ServiceKind::Employee).await;
    for _ in 0..2 {
        let r = send(&app, Method::PUT, "/employees/3", Some(json!({"name":"Ghost"}))).await;
        assert_eq!(r.status, StatusCode::NOT_FOUND);
        let r = send(&app, Method::DELETE, "/employees/3", None).await;
        assert_eq!(r.status, StatusCode::NOT_FOUND);
    }
    assert_eq!(send(&app, Method::GET, "/employees", None).await.json(), json!([]));
}

#[tokio::test]
async fn patch_and_put_share_merge_semantics() {
    let app = app(ServiceKind::Attendance).await;
    let r = send(
        &app,
        Method::POST,
        "/attendance",
        Some(json!({"employeeId":7,"date":"2024-03-01","checkInTime":"09:00"})),
    )
    .await;
    assert_eq!(r.status, StatusCode::CREATED);
    assert_eq!(r.json()["checkInTime"], "09:00:00");
    assert_eq!(r.json()["checkOutTime"], Value::Null);

    let r = send(&app, Method::PATCH, "/attendance/1", Some(json!({"checkOutTime":"17:00"}))).await;
    assert_eq!(r.status, StatusCode::OK);
    let r = send(&app, Method::PUT, "/attendance/1", Some(json!({"checkInTime":null,"date":"2024-03-02"}))).await;
    assert_eq!(
        r.json(),
        json!({
            "id": 1,
            "employeeId": 7,
            "date": "2024-03-02",
            "checkInTime": "09:00:00",
            "checkOutTime": "17:00:00"
        })
    );
}

#[tokio::test]
async fn user_password_never_leaves_the_service() {
    let app = app(ServiceKind::User).await;
    let r = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"name":"Ana","email":"ana@example.com","role":"ADMIN","password":"hunter2"})),
    )
    .await;
    assert_eq!(r.status, StatusCode::CREATED);
    let body = String::from_utf8(r.body.clone()).unwrap();
    assert!(!body.contains("hunter2"));
    assert!(!body.contains("password"));

    let r = send(&app, Method::PUT, "/users/1", Some(json!({"password":"changed"}))).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json(), json!({"id":1,"name":"Ana","email":"ana@example.com","role":"ADMIN"}));
}

#[tokio::test]
async fn bad_requests_get_json_errors() {
    let app = app(ServiceKind::Employee).await;

    let r = send(&app, Method::GET, "/employees/abc", None).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.json()["error"]["code"], "bad_request");

    let r = send(&app, Method::POST, "/employees", Some(json!([{"name":"Ana"}]))).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);

    let r = send(&app, Method::POST, "/employees", Some(json!({"salary":"lots"}))).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);

    let r = send_raw(
        &app,
        Method::POST,
        "/employees",
        Body::from("{not json"),
        &[("content-type", "application/json")],
    )
    .await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.json()["error"]["code"], "bad_request");

    assert_eq!(send(&app, Method::GET, "/employees", None).await.json(), json!([]));
}

#[tokio::test]
async fn all_role_serves_every_resource_with_cors() {
    let app = app(ServiceKind::All).await;
    for path in ["/employees", "/attendance", "/payroll", "/users"] {
        let r = send_raw(&app, Method::GET, path, Body::empty(), &[("origin", "https://a.example")]).await;
        assert_eq!(r.status, StatusCode::OK, "{}", path);
        let origins: Vec<_> = r.headers.get_all(header::ACCESS_CONTROL_ALLOW_ORIGIN).iter().collect();
        assert_eq!(origins, vec!["https://a.example"], "{}", path);
    }

    let r = send_raw(&app, Method::OPTIONS, "/employees/1", Body::empty(), &[("origin", "https://a.example")]).await;
    assert_eq!(r.status, StatusCode::OK);
    assert!(r.body.is_empty());
    assert_eq!(r.headers[header::ACCESS_CONTROL_MAX_AGE], "3600");
}

#[tokio::test]
async fn single_resource_role_has_no_cors_and_no_other_resources() {
    let app = app(ServiceKind::Employee).await;
    let r = send_raw(&app, Method::GET, "/employees", Body::empty(), &[("origin", "https://a.example")]).await;
    assert_eq!(r.status, StatusCode::OK);
    assert!(r.headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

    let r = send(&app, Method::GET, "/users", None).await;
    assert_eq!(r.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn operational_routes_and_request_ids() {
    let app = app(ServiceKind::User).await;
    let r = send(&app, Method::GET, "/health", None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json(), json!({"status":"ok"}));
    assert!(r.headers.contains_key("x-request-id"));

    let r = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json(), json!({"status":"ok"}));

    let r = send(&app, Method::GET, "/version", None).await;
    assert_eq!(r.json()["name"], "hrms");

    let r = send(&app, Method::GET, "/info", None).await;
    assert_eq!(r.json()["service"], "user");
    assert_eq!(r.json()["resources"], json!(["/users"]));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = match resource_app(ServiceKind::Employee, &Backend::Memory, 16).await {
        Ok(router) => router,
        Err(err) => panic!("failed to build app: {err}"),
    };
    let r = send(
        &app,
        Method::POST,
        "/employees",
        Some(json!({"name":"a name that is longer than sixteen bytes"})),
    )
    .await;
    assert_eq!(r.status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn oversized_body_with_content_length_gets_json_error() {
    let app = match resource_app(ServiceKind::Employee, &Backend::Memory, 16).await {
        Ok(router) => router,
        Err(err) => panic!("failed to build app: {err}"),
    };
    let body = json!({"name":"a name that is longer than sixteen bytes"}).to_string();
    let length = body.len().to_string();
    let r = send_raw(
        &app,
        Method::POST,
        "/employees",
        Body::from(body),
        &[("content-type", "application/json"), ("content-length", length.as_str())],
    )
    .await;
    assert_eq!(r.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(r.headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(r.json()["error"]["code"], "payload_too_large");
    assert_eq!(send(&app, Method::GET, "/employees", None).await.json(), json!([]));
}
