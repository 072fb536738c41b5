//! User — the thin envelope that owns log points and insights.
//!
//! Credentials and session handling live outside this system; a user here
//! is just an id for foreign-key-style lookups plus display metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub name:       String,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::LogStore::add_user`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub name:  String,
  pub email: String,
}
