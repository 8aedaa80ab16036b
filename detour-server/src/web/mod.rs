//! Web layer for the detour engine.
//!
//! Provides JSON endpoints for deviation computation and station discovery.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, MapsEngine};
