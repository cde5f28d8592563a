//! HTTP gateway for the Burrow URL alias service.
//!
//! Wires the shortener service, an [`auth::Authorizer`], configuration,
//! logging and process lifecycle into an axum server.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod server;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use state::AppState;
