use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::holding::UserId;

/// A registered user. `password_hash` is an Argon2id PHC string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    /// Normalized: trimmed and lowercased.
    pub email: String,
    pub password_hash: String,
    pub date_created: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash,
            date_created: Utc::now(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            date_created: self.date_created,
        }
    }
}

/// Public view of a user, without credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub date_created: DateTime<Utc>,
}

/// Profile edit request. Setting `new_password` requires `current_password`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}
