//! Twitter API service
//!
//! A small HTTP service managing users and their tweets, each kept in its
//! own record store.

pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod settings;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
