#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use chrono::{DateTime, Utc};
use store_types::domain::order::{Order, OrderData};
use store_types::domain::product::{Product, ProductData};
use store_types::domain::user::{User, UserData};
use store_types::ports::{OrderRepository, ProductRepository, RepoError, UserRepository};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://store.db";

/// The backend picked at start-up from the enabled features and the
/// configured database URL.
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo),
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    /// With a URL and the `sqlite` feature, opens SQLite and creates the
    /// schema. Without a URL the in-memory store is used when `memory` is
    /// enabled, otherwise SQLite at [`DEFAULT_DATABASE_URL`].
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        #[cfg(feature = "sqlite")]
        {
            if let Some(url) = database_url {
                tracing::info!(url, "using sqlite store");
                return Ok(Self::Sqlite(sqlite::SqliteRepo::new(url).await?));
            }
        }

        #[cfg(feature = "memory")]
        {
            if database_url.is_some() {
                tracing::warn!("sqlite feature disabled, ignoring DATABASE_URL");
            }
            tracing::info!("using in-memory store");
            Ok(Self::Memory(memory::InMemoryRepo::new()))
        }

        #[cfg(not(feature = "memory"))]
        {
            let url = database_url.unwrap_or(DEFAULT_DATABASE_URL);
            tracing::info!(url, "using sqlite store");
            Ok(Self::Sqlite(sqlite::SqliteRepo::new(url).await?))
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $repo:ident => $call:expr) => {
        match $self {
            #[cfg(feature = "memory")]
            Repo::Memory($repo) => $call.await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite($repo) => $call.await,
        }
    };
}

#[async_trait::async_trait]
impl UserRepository for Repo {
    async fn create_user(&self, user: UserData) -> Result<User, RepoError> {
        dispatch!(self, r => r.create_user(user))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        dispatch!(self, r => r.get_user(id))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        dispatch!(self, r => r.list_users())
    }

    async fn update_user(&self, id: i64, user: UserData) -> Result<Option<User>, RepoError> {
        dispatch!(self, r => r.update_user(id, user))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, RepoError> {
        dispatch!(self, r => r.delete_user(id))
    }

    async fn user_password_hash(&self, id: i64) -> Result<Option<String>, RepoError> {
        dispatch!(self, r => r.user_password_hash(id))
    }
}

#[async_trait::async_trait]
impl ProductRepository for Repo {
    async fn create_product(&self, product: ProductData) -> Result<Product, RepoError> {
        dispatch!(self, r => r.create_product(product))
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, RepoError> {
        dispatch!(self, r => r.get_product(id))
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepoError> {
        dispatch!(self, r => r.list_products())
    }

    async fn update_product(
        &self,
        id: i64,
        product: ProductData,
    ) -> Result<Option<Product>, RepoError> {
        dispatch!(self, r => r.update_product(id, product))
    }

    async fn delete_product(&self, id: i64) -> Result<bool, RepoError> {
        dispatch!(self, r => r.delete_product(id))
    }
}

#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create_order(
        &self,
        order: OrderData,
        order_date: DateTime<Utc>,
    ) -> Result<Order, RepoError> {
        dispatch!(self, r => r.create_order(order, order_date))
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, RepoError> {
        dispatch!(self, r => r.get_order(id))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepoError> {
        dispatch!(self, r => r.list_orders())
    }

    async fn update_order(&self, id: i64, order: OrderData) -> Result<Option<Order>, RepoError> {
        dispatch!(self, r => r.update_order(id, order))
    }

    async fn delete_order(&self, id: i64) -> Result<bool, RepoError> {
        dispatch!(self, r => r.delete_order(id))
    }
}
