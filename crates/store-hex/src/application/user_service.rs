use std::sync::Arc;

use super::conflict;
use super::password::PasswordHasher;
use crate::errors::AppError;
use store_types::domain::user::{User, UserData, UserInput};
use store_types::ports::UserRepository;

pub struct UserService<R: UserRepository> {
    repo: Arc<R>,
    hasher: PasswordHasher,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            hasher: PasswordHasher::default(),
        }
    }

    /// Validates the payload and hashes the password. Nothing touches the
    /// repository before this succeeds.
    async fn prepare(&self, input: UserInput) -> Result<UserData, AppError> {
        let user = input.validate()?;
        let hasher = self.hasher.clone();
        let password = user.password.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(anyhow::Error::from)??;
        Ok(user.with_password_hash(hash))
    }

    pub async fn create_user(&self, input: UserInput) -> Result<User, AppError> {
        let data = self.prepare(input).await?;
        let email = data.email.clone();
        let user = self
            .repo
            .create_user(data)
            .await
            .map_err(|e| conflict(e, || format!("email {email} is already registered")))?;
        tracing::info!(user_id = user.id, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Result<User, AppError> {
        match self.repo.get_user(id).await? {
            Some(u) => Ok(u),
            None => Err(AppError::NotFound(format!("user {}", id))),
        }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.repo.list_users().await?)
    }

    pub async fn update_user(&self, id: i64, input: UserInput) -> Result<User, AppError> {
        let data = self.prepare(input).await?;
        let email = data.email.clone();
        match self
            .repo
            .update_user(id, data)
            .await
            .map_err(|e| conflict(e, || format!("email {email} is already registered")))?
        {
            Some(u) => {
                tracing::info!(user_id = id, "user updated");
                Ok(u)
            }
            None => Err(AppError::NotFound(format!("user {}", id))),
        }
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let deleted = self
            .repo
            .delete_user(id)
            .await
            .map_err(|e| conflict(e, || format!("user {id} is referenced by existing orders")))?;
        if deleted {
            tracing::info!(user_id = id, "user deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(format!("user {}", id)))
        }
    }

    /// Checks `password` against the stored hash of user `id`.
    pub async fn verify_password(&self, id: i64, password: &str) -> Result<bool, AppError> {
        let hash = self
            .repo
            .user_password_hash(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))?;
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let ok = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(anyhow::Error::from)??;
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store_repo::memory::InMemoryRepo;

    fn service() -> UserService<InMemoryRepo> {
        UserService::new(Arc::new(InMemoryRepo::new()))
    }

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let svc = service();
        let created = svc
            .create_user(UserInput::new("Anna", "Ivanova", "a@b.com", "x"))
            .await
            .unwrap();
        let got = svc.get_user(created.id).await.unwrap();
        assert_eq!(got, created);
        assert_eq!(got.first_name, "Anna");
        assert_eq!(got.last_name, "Ivanova");
        assert_eq!(got.email, "a@b.com");
        assert!(svc.verify_password(created.id, "x").await.unwrap());
    }

    #[tokio::test]
    async fn update_replaces_every_field_including_password() {
        let svc = service();
        let created = svc
            .create_user(UserInput::new("Anna", "Ivanova", "a@b.com", "x"))
            .await
            .unwrap();
        let updated = svc
            .update_user(
                created.id,
                UserInput::new("Olga", "Petrova", "olga@b.com", "secret"),
            )
            .await
            .unwrap();
        assert_eq!(svc.get_user(created.id).await.unwrap(), updated);
        assert_eq!(updated.first_name, "Olga");
        assert!(svc.verify_password(created.id, "secret").await.unwrap());
        assert!(!svc.verify_password(created.id, "x").await.unwrap());
    }

    #[tokio::test]
    async fn invalid_email_never_reaches_the_store() {
        let svc = service();
        let res = svc
            .create_user(UserInput::new("Anna", "Ivanova", "not-an-email", "x"))
            .await;
        assert!(matches!(res, Err(AppError::Validation(_))));
        assert!(svc.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let svc = service();
        svc.create_user(UserInput::new("Anna", "Ivanova", "a@b.com", "x"))
            .await
            .unwrap();
        let dup = svc
            .create_user(UserInput::new("Other", "Person", "a@b.com", "y"))
            .await;
        assert!(matches!(dup, Err(AppError::Conflict(_))));
        assert_eq!(svc.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_creates_hash_every_password() {
        let svc = Arc::new(service());
        let mut handles = Vec::new();
        for i in 0..8 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move {
                svc.create_user(UserInput::new(
                    "Anna",
                    "Ivanova",
                    &format!("a{i}@b.com"),
                    &format!("pw{i}"),
                ))
                .await
            }));
        }
        for (i, h) in handles.into_iter().enumerate() {
            let user = h.await.unwrap().unwrap();
            assert!(svc.verify_password(user.id, &format!("pw{i}")).await.unwrap());
        }
        assert_eq!(svc.list_users().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn not_found_paths() {
        let svc = service();
        assert!(matches!(svc.get_user(9).await, Err(AppError::NotFound(_))));
        let upd = svc
            .update_user(9, UserInput::new("A", "B", "a@b.com", "x"))
            .await;
        assert!(matches!(upd, Err(AppError::NotFound(_))));
        assert!(matches!(svc.delete_user(9).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            svc.verify_password(9, "x").await,
            Err(AppError::NotFound(_))
        ));
        assert!(svc.list_users().await.unwrap().is_empty());
    }
}
