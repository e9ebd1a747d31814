use async_trait::async_trait;

use super::RepoError;
use crate::domain::user::{User, UserData};

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn create_user(&self, user: UserData) -> Result<User, RepoError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, RepoError>;
    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
    /// Overwrites every column. `None` when no row has `id`.
    async fn update_user(&self, id: i64, user: UserData) -> Result<Option<User>, RepoError>;
    async fn delete_user(&self, id: i64) -> Result<bool, RepoError>;
    async fn user_password_hash(&self, id: i64) -> Result<Option<String>, RepoError>;
}
