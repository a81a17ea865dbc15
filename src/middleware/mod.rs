pub mod auth;
pub mod role;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use role::require_admin;
