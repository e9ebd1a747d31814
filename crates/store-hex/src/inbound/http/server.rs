use axum::{routing::get, serve, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::{orders, products, users};
use crate::application::order_service::OrderService;
use crate::application::product_service::ProductService;
use crate::application::user_service::UserService;
use store_types::ports::StoreRepository;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: String,
}

impl HttpServerConfig {
    /// Listens on every interface.
    pub fn on_port(port: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: port.into(),
        }
    }
}

/// The three entity services, sharing one repository.
pub struct AppState<R: StoreRepository> {
    pub users: Arc<UserService<R>>,
    pub products: Arc<ProductService<R>>,
    pub orders: Arc<OrderService<R>>,
}

impl<R: StoreRepository> AppState<R> {
    pub fn new(repo: R) -> Self {
        let repo = Arc::new(repo);
        Self {
            users: Arc::new(UserService::new(repo.clone())),
            products: Arc::new(ProductService::new(repo.clone())),
            orders: Arc::new(OrderService::new(repo)),
        }
    }
}

impl<R: StoreRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            products: self.products.clone(),
            orders: self.orders.clone(),
        }
    }
}

#[derive(Clone)]
pub struct HttpServer<R>
where
    R: StoreRepository,
{
    pub state: AppState<R>,
    pub config: HttpServerConfig,
}

impl<R> HttpServer<R>
where
    R: StoreRepository,
{
    pub async fn new(state: AppState<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self { state, config })
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        Router::new()
            .route("/health", get(health))
            .route(
                "/users",
                get(users::list_users::<R>).post(users::create_user::<R>),
            )
            .route(
                "/users/{id}",
                get(users::get_user::<R>)
                    .put(users::update_user::<R>)
                    .delete(users::delete_user::<R>),
            )
            .route(
                "/products",
                get(products::list_products::<R>).post(products::create_product::<R>),
            )
            .route(
                "/products/{id}",
                get(products::get_product::<R>)
                    .put(products::update_product::<R>)
                    .delete(products::delete_product::<R>),
            )
            .route(
                "/orders",
                get(orders::list_orders::<R>).post(orders::create_order::<R>),
            )
            .route(
                "/orders/{id}",
                get(orders::get_order::<R>)
                    .put(orders::update_order::<R>)
                    .delete(orders::delete_order::<R>),
            )
            .layer(trace_layer)
            .with_state(self.state.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}
