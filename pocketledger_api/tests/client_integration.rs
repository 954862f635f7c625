use pocketledger_api::types::{AccountType, CreateAccount, LoginRequest, UpdateBudget};
use pocketledger_api::{AccountQuery, Client, Error, Query, TransferQuery};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn list_accounts_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("accounts.json");

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client
        .list_accounts(&AccountQuery::default().with_limit(10))
        .await;
    assert!(result.is_ok());

    let resp = result.unwrap();
    assert_eq!(resp.data.len(), 2);
    assert_eq!(resp.data[0].name, "Everyday Checking");
}

#[tokio::test]
async fn session_token_is_sent_as_cookie() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("transfers.json");

    Mock::given(method("GET"))
        .and(path("/transfers"))
        .and(header("cookie", "session=tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        Client::with_base_url(&mock_server.uri()).with_session_token(Some("tok-123".to_string()));
    let resp = client.list_transfers(&TransferQuery::default()).await.unwrap();
    assert_eq!(resp.data.len(), 1);
}

#[tokio::test]
async fn unauthorized_status_is_preserved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"Unauthorized"}"#))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client
        .list_accounts(&AccountQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn server_error_is_http_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client
        .list_accounts(&AccountQuery::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        Error::HttpStatus {
            status: 500,
            body: "Internal Server Error".to_string()
        }
    );
}

#[tokio::test]
async fn malformed_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let err = client
        .list_accounts(&AccountQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let client = Client::with_base_url("http://127.0.0.1:1");
    let err = client
        .list_accounts(&AccountQuery::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn create_account_posts_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts"))
        .and(body_json(serde_json::json!({
            "name": "Wallet",
            "type": "cash",
            "balance": 2500,
            "currency": "EUR"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "acc-9",
            "name": "Wallet",
            "type": "cash",
            "balance": 2500,
            "currency": "EUR",
            "description": null,
            "createdAt": "2024-04-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let account = client
        .create_account(&CreateAccount {
            name: "Wallet".to_string(),
            account_type: AccountType::Cash,
            balance: 2500,
            currency: "EUR".to_string(),
            description: None,
        })
        .await
        .unwrap();
    assert_eq!(account.id, "acc-9");
}

#[tokio::test]
async fn update_budget_sends_only_changed_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/budgets/bud-1"))
        .and(body_json(serde_json::json!({ "amount": 50000 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "bud-1",
            "category": { "id": "cat-1", "name": "Groceries" },
            "month": "2024-03",
            "amount": 50000,
            "spent": 31250
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let budget = client
        .update_budget(
            "bud-1",
            &UpdateBudget {
                amount: Some(50000),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(budget.amount, 50000);
}

#[tokio::test]
async fn remove_transfer_accepts_empty_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/transfers/tr-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    assert!(client.remove_transfer("tr-1").await.is_ok());
}

#[tokio::test]
async fn login_returns_access_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "accessToken": "abc" })),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let resp = client
        .login(&LoginRequest {
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(resp.access_token, "abc");
}
