use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Legacy login row. `username` holds the profile email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Credential {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}
