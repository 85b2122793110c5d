use crate::{db::Database, state::AppState};
use axum::Router;

pub mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
pub mod services;

pub use repo_types::User;
pub use services::UserService;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}

/// Declares the user tables in the gateway's schema registry.
pub fn register_tables(db: &Database) {
    db.register(User::table());
}
