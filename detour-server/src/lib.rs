//! Route deviation server.
//!
//! A web application that answers: "how far out of my way is this stop,
//! and which stations along my route are cheapest to pass through?"

pub mod cache;
pub mod domain;
pub mod engine;
pub mod maps;
pub mod web;
