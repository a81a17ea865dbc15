// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition endpoints. Everything under this tier is reachable
// without a bearer token.
//
// Route Prefix: /api/auth/*
// Middleware: none

pub mod auth;
