pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod schemas;
pub mod server;
pub mod service;

pub use error::{AppError, AppResult};
