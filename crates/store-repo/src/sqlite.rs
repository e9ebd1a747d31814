use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use store_types::domain::order::{Order, OrderData};
use store_types::domain::product::{Product, ProductData};
use store_types::domain::user::{User, UserData};
use store_types::ports::{OrderRepository, ProductRepository, RepoError, UserRepository};

pub struct SqliteRepo {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct DbUser {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
}

impl From<DbUser> for User {
    fn from(r: DbUser) -> Self {
        User {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
        }
    }
}

#[derive(FromRow)]
struct DbProduct {
    id: i64,
    name: String,
    description: String,
    price: f64,
}

impl From<DbProduct> for Product {
    fn from(r: DbProduct) -> Self {
        Product {
            id: r.id,
            name: r.name,
            description: r.description,
            price: r.price,
        }
    }
}

#[derive(FromRow)]
struct DbOrder {
    id: i64,
    user_id: i64,
    product_id: i64,
    order_date: String,
    status: String,
}

impl DbOrder {
    fn into_order(self) -> Result<Order, RepoError> {
        let order_date = DateTime::parse_from_rfc3339(&self.order_date)
            .map_err(|e| RepoError::DbError(e.to_string()))?
            .with_timezone(&Utc);
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            product_id: self.product_id,
            order_date,
            status: self.status,
        })
    }
}

/// Unique and foreign-key failures become `Conflict`; anything else is a
/// plain storage error.
fn db_err(e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() || db.is_foreign_key_violation() {
            return RepoError::Conflict(db.message().to_string());
        }
    }
    RepoError::DbError(e.to_string())
}

const SELECT_USER: &str = "SELECT id, first_name, last_name, email FROM users";
const SELECT_PRODUCT: &str = "SELECT id, name, description, price FROM products";
const SELECT_ORDER: &str = "SELECT id, user_id, product_id, order_date, status FROM orders";

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let in_memory = database_url.contains(":memory:");

        // Ensure on-disk SQLite target directory exists.
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if !in_memory {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` opens its own empty database, so
        // an in-memory store must live on exactly one connection.
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePool::connect_with(options).await?
        };

        let repo = Self { pool };
        repo.ensure_schema().await?;
        Ok(repo)
    }

    /// Creates the three tables when they are missing. Safe to call again.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        let ddl = include_str!("../migrations/0001_create_store.sql");
        self.pool.execute(ddl).await?;
        tracing::debug!("store schema ready");
        Ok(())
    }

    /// A pooled connection for one read. It goes back to the pool when the
    /// guard is dropped.
    async fn open_session(&self) -> Result<PoolConnection<Sqlite>, RepoError> {
        self.pool.acquire().await.map_err(db_err)
    }

    /// A transaction for one write. Dropping it without `commit` rolls back.
    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, RepoError> {
        self.pool.begin().await.map_err(db_err)
    }
}

#[async_trait]
impl UserRepository for SqliteRepo {
    async fn create_user(&self, user: UserData) -> Result<User, RepoError> {
        let mut tx = self.begin().await?;
        let res = sqlx::query(
            "INSERT INTO users (first_name, last_name, email, password) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(user.into_user(res.last_insert_rowid()))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        let mut conn = self.open_session().await?;
        let row: Option<DbUser> = sqlx::query_as(&format!("{SELECT_USER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_err)?;
        Ok(row.map(User::from))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let mut conn = self.open_session().await?;
        let rows: Vec<DbUser> = sqlx::query_as(&format!("{SELECT_USER} ORDER BY id"))
            .fetch_all(&mut *conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update_user(&self, id: i64, user: UserData) -> Result<Option<User>, RepoError> {
        let mut tx = self.begin().await?;
        let updated = sqlx::query(
            "UPDATE users SET first_name = ?, last_name = ?, email = ?, password = ? WHERE id = ?",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        tx.commit().await.map_err(db_err)?;
        Ok(Some(user.into_user(id)))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, RepoError> {
        let mut tx = self.begin().await?;
        let res = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(res.rows_affected() > 0)
    }

    async fn user_password_hash(&self, id: i64) -> Result<Option<String>, RepoError> {
        let mut conn = self.open_session().await?;
        sqlx::query_scalar("SELECT password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl ProductRepository for SqliteRepo {
    async fn create_product(&self, product: ProductData) -> Result<Product, RepoError> {
        let mut tx = self.begin().await?;
        let res = sqlx::query("INSERT INTO products (name, description, price) VALUES (?, ?, ?)")
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(product.into_product(res.last_insert_rowid()))
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, RepoError> {
        let mut conn = self.open_session().await?;
        let row: Option<DbProduct> = sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_err)?;
        Ok(row.map(Product::from))
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepoError> {
        let mut conn = self.open_session().await?;
        let rows: Vec<DbProduct> = sqlx::query_as(&format!("{SELECT_PRODUCT} ORDER BY id"))
            .fetch_all(&mut *conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn update_product(
        &self,
        id: i64,
        product: ProductData,
    ) -> Result<Option<Product>, RepoError> {
        let mut tx = self.begin().await?;
        let updated =
            sqlx::query("UPDATE products SET name = ?, description = ?, price = ? WHERE id = ?")
                .bind(&product.name)
                .bind(&product.description)
                .bind(product.price)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        tx.commit().await.map_err(db_err)?;
        Ok(Some(product.into_product(id)))
    }

    async fn delete_product(&self, id: i64) -> Result<bool, RepoError> {
        let mut tx = self.begin().await?;
        let res = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl OrderRepository for SqliteRepo {
    async fn create_order(
        &self,
        order: OrderData,
        order_date: DateTime<Utc>,
    ) -> Result<Order, RepoError> {
        let mut tx = self.begin().await?;
        let res = sqlx::query(
            "INSERT INTO orders (user_id, product_id, order_date, status) VALUES (?, ?, ?, ?)",
        )
        .bind(order.user_id)
        .bind(order.product_id)
        .bind(order_date.to_rfc3339())
        .bind(&order.status)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(order.into_order(res.last_insert_rowid(), order_date))
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, RepoError> {
        let mut conn = self.open_session().await?;
        let row: Option<DbOrder> = sqlx::query_as(&format!("{SELECT_ORDER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(db_err)?;
        row.map(|r| r.into_order()).transpose()
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepoError> {
        let mut conn = self.open_session().await?;
        let rows: Vec<DbOrder> = sqlx::query_as(&format!("{SELECT_ORDER} ORDER BY id"))
            .fetch_all(&mut *conn)
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(|r| r.into_order())
            .collect::<Result<Vec<_>, _>>()
    }

    async fn update_order(&self, id: i64, order: OrderData) -> Result<Option<Order>, RepoError> {
        let mut tx = self.begin().await?;
        let updated =
            sqlx::query("UPDATE orders SET user_id = ?, product_id = ?, status = ? WHERE id = ?")
                .bind(order.user_id)
                .bind(order.product_id)
                .bind(&order.status)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        let row: DbOrder = sqlx::query_as(&format!("{SELECT_ORDER} WHERE id = ?"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        row.into_order().map(Some)
    }

    async fn delete_order(&self, id: i64) -> Result<bool, RepoError> {
        let mut tx = self.begin().await?;
        let res = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(res.rows_affected() > 0)
    }
}
