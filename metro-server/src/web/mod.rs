//! Web layer for the metro route finder.
//!
//! Provides JSON endpoints for managing lines and stations and for finding
//! routes.

mod dto;
mod error;
mod routes;
mod state;

pub use dto::*;
pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
