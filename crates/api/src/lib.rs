//! HTTP surface: routing, sessions, page rendering.

pub mod app;
pub mod context;
pub mod middleware;
