//! # HTTP Middleware
//!
//! Layers applied to every request, outermost first: request logging, viewer
//! resolution, then the per-destination gate on protected routes.

pub mod auth;
pub mod gate;
pub mod request_log;
