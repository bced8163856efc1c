//! Module for the crowd verification API.
//!
//! Submitting a vote and reading one's own vote require authentication;
//! aggregated stats and the active policy are public.

pub mod handlers;
pub mod routes;
