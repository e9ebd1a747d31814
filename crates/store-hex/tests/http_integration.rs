use serde::Deserialize;
use serde_json::{json, Value};
use store_hex::inbound::http::{AppState, HttpServer, HttpServerConfig};
use store_repo::build_repo;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[derive(Deserialize, Debug)]
struct UserBody {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
}

/// Starts a server over a fresh in-memory store and returns its base URL.
async fn spawn_server() -> (String, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let repo = build_repo(None).await.expect("build repo");
    let server = HttpServer::new(AppState::new(repo), HttpServerConfig::on_port(port.to_string()))
        .await
        .unwrap();

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });

    // Give the server a moment to start.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    (format!("http://127.0.0.1:{}", port), handle)
}

#[tokio::test]
async fn user_crud_over_http() {
    let (addr, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/users", addr))
        .json(&json!({
            "first_name": "Anna",
            "last_name": "Ivanova",
            "email": "a@b.com",
            "password": "x"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let raw: Value = res.json().await.unwrap();
    assert!(raw.get("password").is_none());
    let created: UserBody = serde_json::from_value(raw).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.first_name, "Anna");
    assert_eq!(created.last_name, "Ivanova");
    assert_eq!(created.email, "a@b.com");

    let fetched: UserBody = client
        .get(format!("{}/users/{}", addr, created.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched.email, "a@b.com");

    let res = client
        .put(format!("{}/users/{}", addr, created.id))
        .json(&json!({
            "first_name": "Olga",
            "last_name": "Petrova",
            "email": "olga@b.com",
            "password": "y"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    let updated: UserBody = res.json().await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.first_name, "Olga");
    assert_eq!(updated.last_name, "Petrova");
    assert_eq!(updated.email, "olga@b.com");

    let res = client
        .delete(format!("{}/users/{}", addr, created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());

    let res = client
        .get(format!("{}/users/{}", addr, created.id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    let list: Vec<Value> = client
        .get(format!("{}/users", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());

    // stop server task
    handle.abort();
}

#[tokio::test]
async fn validation_and_not_found_paths() {
    let (addr, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/users", addr))
        .json(&json!({
            "first_name": "Anna",
            "last_name": "Ivanova",
            "email": "not-an-email",
            "password": "x"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid email format");

    let res = client
        .post(format!("{}/products", addr))
        .json(&json!({ "name": "Widget", "description": "A widget" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);

    let res = client
        .post(format!("{}/products", addr))
        .json(&json!({ "name": "Widget", "description": "A widget", "price": "cheap" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);

    let res = client
        .post(format!("{}/products", addr))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);

    let users: Vec<Value> = client
        .get(format!("{}/users", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(users.is_empty());

    for path in ["users", "products", "orders"] {
        let res = client
            .get(format!("{}/{}/404", addr, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

        let res = client
            .delete(format!("{}/{}/404", addr, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

        let res = client
            .get(format!("{}/{}/abc", addr, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    let res = client
        .put(format!("{}/products/404", addr))
        .json(&json!({ "name": "Widget", "description": "A widget", "price": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    handle.abort();
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let (addr, handle) = spawn_server().await;
    let client = reqwest::Client::new();
    let body = json!({
        "first_name": "Anna",
        "last_name": "Ivanova",
        "email": "a@b.com",
        "password": "x"
    });

    let first = client
        .post(format!("{}/users", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), reqwest::StatusCode::CREATED);

    let second = client
        .post(format!("{}/users", addr))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), reqwest::StatusCode::CONFLICT);
    let err: Value = second.json().await.unwrap();
    assert!(err["error"].as_str().unwrap().contains("a@b.com"));

    handle.abort();
}

#[tokio::test]
async fn order_with_unknown_product_is_rejected() {
    let (addr, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let user: UserBody = client
        .post(format!("{}/users", addr))
        .json(&json!({
            "first_name": "Anna",
            "last_name": "Ivanova",
            "email": "a@b.com",
            "password": "x"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let res = client
        .post(format!("{}/orders", addr))
        .json(&json!({ "user_id": user.id, "product_id": 999, "status": "pending" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error"], "product 999 does not exist");

    let orders: Vec<Value> = client
        .get(format!("{}/orders", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(orders.is_empty());

    let product: Value = client
        .post(format!("{}/products", addr))
        .json(&json!({ "name": "Widget", "description": "A widget", "price": 2.5 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let res = client
        .post(format!("{}/orders", addr))
        .json(&json!({ "user_id": user.id, "product_id": product["id"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let order: Value = res.json().await.unwrap();
    assert_eq!(order["status"], "pending");
    assert!(order["order_date"].as_str().is_some());

    let res = client
        .delete(format!("{}/products/{}", addr, product["id"]))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::CONFLICT);

    handle.abort();
}

#[tokio::test]
async fn order_update_to_unknown_product_is_rejected() {
    let (addr, handle) = spawn_server().await;
    let client = reqwest::Client::new();

    let user: UserBody = client
        .post(format!("{}/users", addr))
        .json(&json!({
            "first_name": "Anna",
            "last_name": "Ivanova",
            "email": "a@b.com",
            "password": "x"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let product: Value = client
        .post(format!("{}/products", addr))
        .json(&json!({ "name": "Widget", "description": "A widget", "price": 2.5 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let order: Value = client
        .post(format!("{}/orders", addr))
        .json(&json!({ "user_id": user.id, "product_id": product["id"], "status": "shipped" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let res = client
        .put(format!("{}/orders/{}", addr, order["id"]))
        .json(&json!({ "user_id": user.id, "product_id": 999, "status": "pending" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error"], "product 999 does not exist");

    let stored: Value = client
        .get(format!("{}/orders/{}", addr, order["id"]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored, order);

    handle.abort();
}

#[tokio::test]
async fn health_endpoint() {
    let (addr, handle) = spawn_server().await;
    let body: Value = reqwest::get(format!("{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    handle.abort();
}
