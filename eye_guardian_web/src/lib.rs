mod classify;
mod html;
mod routes;
mod server;
mod telemetry;

pub mod app;
pub mod config;

pub use app::start_app;
pub use server::{router, SharedState};
pub use telemetry::Metrics;
