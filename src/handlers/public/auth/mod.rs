// handlers/public/auth/mod.rs - Public authentication handlers

use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Profile, Role};

pub mod login; // POST /api/auth/login - authenticate and get JWT
pub mod register; // POST /api/auth/register - create account and get JWT

pub use login::post as login_post;
pub use register::post as register_post;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Body returned by both login and register
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}

impl AuthResponse {
    pub fn new(token: String, profile: &Profile) -> Self {
        Self {
            token,
            user: UserSummary {
                id: profile.id,
                email: profile.email.clone(),
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
                role: profile.role,
            },
        }
    }
}
