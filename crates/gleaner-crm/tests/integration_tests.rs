//! Integration tests for the CRM bridge
//!
//! Each test starts an in-process webhook on a free local port.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use gleaner_crm::{CrmClient, CrmError};
use gleaner_domain::{CrmStatus, ExtractedData, FieldType, ResponseSchema, Schema, SchemaField};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

type Received = Arc<Mutex<Vec<Value>>>;

#[derive(Clone)]
struct Webhook {
    accounts: (StatusCode, String),
    submit_status: StatusCode,
    received: Received,
}

async fn list_accounts(State(hook): State<Webhook>) -> (StatusCode, String) {
    hook.accounts.clone()
}

async fn submit(State(hook): State<Webhook>, Json(body): Json<Value>) -> StatusCode {
    hook.received.lock().unwrap().push(body);
    hook.submit_status
}

async fn spawn_webhook(
    accounts: (StatusCode, &str),
    submit_status: StatusCode,
) -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let hook = Webhook {
        accounts: (accounts.0, accounts.1.to_string()),
        submit_status,
        received: received.clone(),
    };

    let app = Router::new()
        .route("/webhook/accounts", get(list_accounts).post(submit))
        .with_state(hook);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/webhook/accounts", addr), received)
}

fn sample_data() -> ExtractedData {
    let mut schema = Schema::new();
    schema.push(SchemaField::new("nr_umowy", FieldType::Number, ""));
    schema.push(SchemaField::new("data_umowy", FieldType::Date, ""));
    let contract = ResponseSchema::build(&schema).unwrap();

    contract
        .interpret(&json!({
            "nr_umowy": {"value": 1234, "source": "contract.pdf"},
            "data_umowy": {"value": null, "source": null}
        }))
        .unwrap()
}

#[tokio::test]
async fn test_fetch_accounts() {
    let (url, _) = spawn_webhook(
        (StatusCode::OK, r#"[{"id": "a1", "name": "Acme"}, {"id": 7, "name": "Globex"}]"#),
        StatusCode::OK,
    )
    .await;

    let accounts = CrmClient::new(url).fetch_accounts().await;
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].name, "Acme");
    assert_eq!(accounts[1].id, "7");
}

#[tokio::test]
async fn test_fetch_accounts_skips_malformed_entries() {
    let (url, _) = spawn_webhook(
        (StatusCode::OK, r#"[{"id": "a1", "name": "Acme"}, {"label": "broken"}, 5]"#),
        StatusCode::OK,
    )
    .await;

    let accounts = CrmClient::new(url).try_fetch_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, "a1");
}

#[tokio::test]
async fn test_fetch_accounts_non_array_is_empty() {
    let (url, _) = spawn_webhook((StatusCode::OK, r#"{"accounts": []}"#), StatusCode::OK).await;
    let client = CrmClient::new(url);

    assert!(matches!(
        client.try_fetch_accounts().await,
        Err(CrmError::InvalidResponse(_))
    ));
    assert!(client.fetch_accounts().await.is_empty());
}

#[tokio::test]
async fn test_fetch_accounts_http_error_is_empty() {
    let (url, _) = spawn_webhook((StatusCode::INTERNAL_SERVER_ERROR, "oops"), StatusCode::OK).await;
    let client = CrmClient::new(url);

    assert!(matches!(
        client.try_fetch_accounts().await,
        Err(CrmError::Status { status: 500 })
    ));
    assert!(client.fetch_accounts().await.is_empty());
}

#[tokio::test]
async fn test_fetch_accounts_unreachable_is_empty() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = CrmClient::new(format!("http://{}/webhook/accounts", addr));
    assert!(client.fetch_accounts().await.is_empty());
}

#[tokio::test]
async fn test_send_result_payload() {
    let (url, received) = spawn_webhook((StatusCode::OK, "[]"), StatusCode::OK).await;

    CrmClient::new(url)
        .send_result("a1", &sample_data())
        .await
        .unwrap();

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "account_id": "a1",
            "data": {
                "nr_umowy": {"value": 1234, "source": "contract.pdf"},
                "data_umowy": {"value": null, "source": null}
            }
        })
    );
}

#[tokio::test]
async fn test_send_status_mapping() {
    let (ok_url, _) = spawn_webhook((StatusCode::OK, "[]"), StatusCode::CREATED).await;
    assert_eq!(
        CrmClient::new(ok_url).send("a1", &sample_data()).await,
        CrmStatus::Success
    );

    let (bad_url, received) = spawn_webhook((StatusCode::OK, "[]"), StatusCode::BAD_GATEWAY).await;
    let client = CrmClient::new(bad_url);
    assert!(matches!(
        client.send_result("a1", &sample_data()).await,
        Err(CrmError::Status { status: 502 })
    ));
    assert_eq!(client.send("a1", &sample_data()).await, CrmStatus::Error);

    // One request per call, no retries
    assert_eq!(received.lock().unwrap().len(), 2);
}
