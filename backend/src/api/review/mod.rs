//! Module for place reviews and ratings.

pub mod handlers;
pub mod routes;
