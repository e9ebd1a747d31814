///  To run :
///  cargo r --example client_example
use reqwest::StatusCode;
use store_client::StoreClient;
use store_hex::inbound::http::{AppState, HttpServer, HttpServerConfig};
use store_repo::build_repo;
use store_types::domain::order::OrderInput;
use store_types::domain::product::ProductInput;
use store_types::domain::user::UserInput;
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    // Use a temp file-backed SQLite DB so multiple connections see the same data.
    let tmp = tempdir()?;
    let db_path = tmp.path().join("store.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let repo = build_repo(Some(&db_url)).await?;
    let server = HttpServer::new(
        AppState::new(repo),
        HttpServerConfig::on_port(port.to_string()),
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = StoreClient::new(&addr)?;
    let user = client
        .create_user(&UserInput::new("Anna", "Ivanova", "a@b.com", "x"))
        .await?;
    println!("Created user id={}", user.id);

    let product = client
        .create_product(&ProductInput::new("Widget", "A small widget", 4.99))
        .await?;
    println!("Created product id={}", product.id);

    let order = client
        .create_order(&OrderInput::new(user.id, product.id))
        .await?;
    println!("Created order id={} status={}", order.id, order.status);

    let updated = client
        .update_order(
            order.id,
            &OrderInput::new(user.id, product.id).with_status("shipped"),
        )
        .await?;
    println!("Updated order status={}", updated.status);

    // An order for a product that does not exist is refused.
    match client.create_order(&OrderInput::new(user.id, 999)).await {
        Ok(o) => println!("Unexpectedly created order {}", o.id),
        Err(err) => {
            let status = err.downcast_ref::<reqwest::Error>().and_then(|e| e.status());
            assert_eq!(status, Some(StatusCode::UNPROCESSABLE_ENTITY));
            println!("Order for product 999 rejected: {status:?}");
        }
    }

    client.delete_order(order.id).await?;
    client.delete_product(product.id).await?;
    client.delete_user(user.id).await?;
    println!("Remaining users: {}", client.list_users().await?.len());

    handle.abort();
    Ok(())
}
