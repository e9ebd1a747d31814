use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use store_types::domain::order::{Order, OrderInput};
use store_types::domain::product::{Product, ProductInput};
use store_types::domain::user::{User, UserInput};

#[derive(Clone)]
pub struct StoreClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

/// Typed client for the store API. Non-2xx responses come back as errors
/// wrapping the [`reqwest::Error`], so callers can inspect the status.
#[derive(Clone)]
pub struct StoreClient {
    base: Url,
    client: reqwest::Client,
}

impl StoreClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<StoreClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(StoreClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        tracing::debug!(path, "GET");
        let res = self
            .client
            .get(self.url(path)?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        tracing::debug!(path, "POST");
        let res = self
            .client
            .post(self.url(path)?)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        tracing::debug!(path, "PUT");
        let res = self
            .client
            .put(self.url(path)?)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    async fn delete(&self, path: &str) -> anyhow::Result<()> {
        tracing::debug!(path, "DELETE");
        self.client
            .delete(self.url(path)?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    pub async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        self.get_json("users").await
    }

    pub async fn get_user(&self, id: i64) -> anyhow::Result<User> {
        self.get_json(&format!("users/{id}")).await
    }

    pub async fn create_user(&self, req: &UserInput) -> anyhow::Result<User> {
        self.post_json("users", req).await
    }

    pub async fn update_user(&self, id: i64, req: &UserInput) -> anyhow::Result<User> {
        self.put_json(&format!("users/{id}"), req).await
    }

    pub async fn delete_user(&self, id: i64) -> anyhow::Result<()> {
        self.delete(&format!("users/{id}")).await
    }

    pub async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        self.get_json("products").await
    }

    pub async fn get_product(&self, id: i64) -> anyhow::Result<Product> {
        self.get_json(&format!("products/{id}")).await
    }

    pub async fn create_product(&self, req: &ProductInput) -> anyhow::Result<Product> {
        self.post_json("products", req).await
    }

    pub async fn update_product(&self, id: i64, req: &ProductInput) -> anyhow::Result<Product> {
        self.put_json(&format!("products/{id}"), req).await
    }

    pub async fn delete_product(&self, id: i64) -> anyhow::Result<()> {
        self.delete(&format!("products/{id}")).await
    }

    pub async fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        self.get_json("orders").await
    }

    pub async fn get_order(&self, id: i64) -> anyhow::Result<Order> {
        self.get_json(&format!("orders/{id}")).await
    }

    pub async fn create_order(&self, req: &OrderInput) -> anyhow::Result<Order> {
        self.post_json("orders", req).await
    }

    pub async fn update_order(&self, id: i64, req: &OrderInput) -> anyhow::Result<Order> {
        self.put_json(&format!("orders/{id}"), req).await
    }

    pub async fn delete_order(&self, id: i64) -> anyhow::Result<()> {
        self.delete(&format!("orders/{id}")).await
    }
}

impl StoreClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<StoreClient> {
        if let Some(client) = self.client {
            return Ok(StoreClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(StoreClient {
            base: self.base,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn sample_user() -> User {
        User {
            id: 1,
            first_name: "Anna".into(),
            last_name: "Ivanova".into(),
            email: "a@b.com".into(),
        }
    }

    #[tokio::test]
    async fn create_and_get_user() {
        let server = MockServer::start();
        let user = sample_user();
        let input = UserInput::new("Anna", "Ivanova", "a@b.com", "x");

        let create_mock = server.mock(|when, then| {
            when.method(POST).path("/users").json_body_obj(&input);
            then.status(201).json_body_obj(&user);
        });

        let get_mock = server.mock(|when, then| {
            when.method(GET).path("/users/1");
            then.status(200).json_body_obj(&user);
        });

        let client = StoreClient::new(&server.base_url()).unwrap();
        let created = client.create_user(&input).await.unwrap();
        assert_eq!(created, user);

        let fetched = client.get_user(1).await.unwrap();
        assert_eq!(fetched.email, "a@b.com");

        create_mock.assert();
        get_mock.assert();
    }

    #[tokio::test]
    async fn list_update_delete_orders() {
        let server = MockServer::start();
        let order = Order {
            id: 3,
            user_id: 1,
            product_id: 2,
            order_date: chrono::Utc::now(),
            status: "pending".into(),
        };

        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/orders");
            then.status(200).json_body_obj(&vec![order.clone()]);
        });

        let update_mock = server.mock(|when, then| {
            when.method(httpmock::Method::PUT)
                .path("/orders/3")
                .json_body(serde_json::json!({
                    "user_id": 1,
                    "product_id": 2,
                    "status": "shipped"
                }));
            let mut updated = order.clone();
            updated.status = "shipped".into();
            then.status(200).json_body_obj(&updated);
        });

        let delete_mock = server.mock(|when, then| {
            when.method(DELETE).path("/orders/3");
            then.status(204);
        });

        let client = StoreClient::new(&server.base_url()).unwrap();
        let listed = client.list_orders().await.unwrap();
        assert_eq!(listed, vec![order.clone()]);

        let updated = client
            .update_order(3, &OrderInput::new(1, 2).with_status("shipped"))
            .await
            .unwrap();
        assert_eq!(updated.status, "shipped");
        assert_eq!(updated.order_date, order.order_date);

        client.delete_order(3).await.unwrap();

        list_mock.assert();
        update_mock.assert();
        delete_mock.assert();
    }

    #[tokio::test]
    async fn error_status_surfaces_as_reqwest_error() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/products/9");
            then.status(404)
                .json_body(serde_json::json!({ "error": "product 9" }));
        });

        let client = StoreClient::builder(&server.base_url())
            .unwrap()
            .with_timeout(Duration::from_secs(5))
            .with_header("x-request-source", "tests")
            .unwrap()
            .build()
            .unwrap();
        let err = client.get_product(9).await.unwrap_err();
        let status = err
            .downcast_ref::<reqwest::Error>()
            .and_then(|e| e.status());
        assert_eq!(status, Some(reqwest::StatusCode::NOT_FOUND));
        mock.assert();
    }
}
