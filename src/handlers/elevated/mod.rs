// handlers/elevated/mod.rs - Elevated handlers (admin role required)
//
// Mounted behind both `jwt_auth_middleware` and `require_admin`. The role
// gate runs before any body is read, so non-admins get 403 regardless of
// payload.
//
// Route Prefix: /api/*
// Middleware: jwt_auth_middleware + require_admin

pub mod departments;
pub mod employees;
pub mod profiles;
pub mod reports;
pub mod tasks;
