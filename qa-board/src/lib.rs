pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod routes;
pub mod validation;

pub use api::AppState;
pub use database::Database;
pub use error::{AppError, AppResult};
