//! REST API module for the deck service
//!
//! Provides the HTTP endpoints for idea management, chat history, the
//! classification agent, and profile analysis. Uses axum for routing
//! and schemars for OpenAPI documentation generation.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routing;
pub mod services;
pub mod startup;
pub mod types;
