use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use store_types::domain::order::{Order, OrderData};
use store_types::domain::product::{Product, ProductData};
use store_types::domain::user::{User, UserData};
use store_types::ports::{OrderRepository, ProductRepository, RepoError, UserRepository};

#[derive(Default)]
struct Sequences {
    users: AtomicI64,
    products: AtomicI64,
    orders: AtomicI64,
}

fn next_id(seq: &AtomicI64) -> i64 {
    seq.fetch_add(1, Ordering::SeqCst) + 1
}

/// DashMap-backed store. Enforces the same unique-email and reference rules
/// as the SQLite schema so both adapters answer alike.
#[derive(Clone, Default)]
pub struct InMemoryRepo {
    users: Arc<DashMap<i64, UserData>>,
    emails: Arc<DashMap<String, i64>>,
    products: Arc<DashMap<i64, ProductData>>,
    orders: Arc<DashMap<i64, Order>>,
    seq: Arc<Sequences>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_email(&self, email: &str, id: i64) -> Result<(), RepoError> {
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(e) if *e.get() != id => Err(RepoError::Conflict(format!(
                "email {email} already exists"
            ))),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(e) => {
                e.insert(id);
                Ok(())
            }
        }
    }

    fn check_references(&self, order: &OrderData) -> Result<(), RepoError> {
        if !self.users.contains_key(&order.user_id) {
            return Err(RepoError::Conflict(format!(
                "user {} does not exist",
                order.user_id
            )));
        }
        if !self.products.contains_key(&order.product_id) {
            return Err(RepoError::Conflict(format!(
                "product {} does not exist",
                order.product_id
            )));
        }
        Ok(())
    }
}

fn sorted<T>(mut rows: Vec<T>, id: impl Fn(&T) -> i64) -> Vec<T> {
    rows.sort_by_key(|r| id(r));
    rows
}

#[async_trait]
impl UserRepository for InMemoryRepo {
    async fn create_user(&self, user: UserData) -> Result<User, RepoError> {
        let id = next_id(&self.seq.users);
        self.claim_email(&user.email, id)?;
        self.users.insert(id, user.clone());
        Ok(user.into_user(id))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.users.get(&id).map(|r| r.clone().into_user(id)))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let rows: Vec<User> = self
            .users
            .iter()
            .map(|kv| kv.value().clone().into_user(*kv.key()))
            .collect();
        Ok(sorted(rows, |u| u.id))
    }

    async fn update_user(&self, id: i64, user: UserData) -> Result<Option<User>, RepoError> {
        // Row guard stays held until the write lands.
        let Some(mut row) = self.users.get_mut(&id) else {
            return Ok(None);
        };
        self.claim_email(&user.email, id)?;
        if row.email != user.email {
            self.emails.remove(&row.email);
        }
        *row = user.clone();
        Ok(Some(user.into_user(id)))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, RepoError> {
        if self.orders.iter().any(|o| o.user_id == id) {
            return Err(RepoError::Conflict(format!(
                "user {id} is referenced by orders"
            )));
        }
        match self.users.remove(&id) {
            Some((_, user)) => {
                self.emails.remove(&user.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn user_password_hash(&self, id: i64) -> Result<Option<String>, RepoError> {
        Ok(self.users.get(&id).map(|r| r.password_hash.clone()))
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepo {
    async fn create_product(&self, product: ProductData) -> Result<Product, RepoError> {
        let id = next_id(&self.seq.products);
        self.products.insert(id, product.clone());
        Ok(product.into_product(id))
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, RepoError> {
        Ok(self.products.get(&id).map(|r| r.clone().into_product(id)))
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepoError> {
        let rows: Vec<Product> = self
            .products
            .iter()
            .map(|kv| kv.value().clone().into_product(*kv.key()))
            .collect();
        Ok(sorted(rows, |p| p.id))
    }

    async fn update_product(
        &self,
        id: i64,
        product: ProductData,
    ) -> Result<Option<Product>, RepoError> {
        if let Some(mut v) = self.products.get_mut(&id) {
            *v = product.clone();
            return Ok(Some(product.into_product(id)));
        }
        Ok(None)
    }

    async fn delete_product(&self, id: i64) -> Result<bool, RepoError> {
        if self.orders.iter().any(|o| o.product_id == id) {
            return Err(RepoError::Conflict(format!(
                "product {id} is referenced by orders"
            )));
        }
        Ok(self.products.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn create_order(
        &self,
        order: OrderData,
        order_date: DateTime<Utc>,
    ) -> Result<Order, RepoError> {
        self.check_references(&order)?;
        let id = next_id(&self.seq.orders);
        let order = order.into_order(id, order_date);
        self.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, RepoError> {
        Ok(self.orders.get(&id).map(|r| r.clone()))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepoError> {
        let rows: Vec<Order> = self.orders.iter().map(|kv| kv.value().clone()).collect();
        Ok(sorted(rows, |o| o.id))
    }

    async fn update_order(&self, id: i64, order: OrderData) -> Result<Option<Order>, RepoError> {
        if !self.orders.contains_key(&id) {
            return Ok(None);
        }
        self.check_references(&order)?;
        if let Some(mut v) = self.orders.get_mut(&id) {
            let updated = order.into_order(id, v.order_date);
            *v = updated.clone();
            return Ok(Some(updated));
        }
        Ok(None)
    }

    async fn delete_order(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.orders.remove(&id).is_some())
    }
}
