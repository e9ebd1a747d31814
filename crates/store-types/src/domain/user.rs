use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationResult, MAX_NAME_LEN, MAX_PASSWORD_LEN};

/// A stored user as exposed over the API. The password hash never leaves
/// the repository through this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Write payload for create and full-replace update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// A validated user payload. `password` is still plain text here; it is
/// hashed before it becomes [`UserData`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Column values handed to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserInput {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    pub fn validate(self) -> ValidationResult<NewUser> {
        Ok(NewUser {
            first_name: validation::required_text("first_name", self.first_name, MAX_NAME_LEN)?,
            last_name: validation::required_text("last_name", self.last_name, MAX_NAME_LEN)?,
            email: validation::email(self.email)?,
            password: validation::required_text("password", self.password, MAX_PASSWORD_LEN)?,
        })
    }
}

impl NewUser {
    pub fn with_password_hash(self, password_hash: String) -> UserData {
        UserData {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash,
        }
    }
}

impl UserData {
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        }
    }
}
