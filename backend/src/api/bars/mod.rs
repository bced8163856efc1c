//! Module for filtering and badging bar search results.
//!
//! Clients send the places they got from the places provider, already joined
//! with per-place verification stats, and receive the filtered list with a
//! "verified" badge on each entry, computed with the server's policy.

pub mod handlers;
pub mod routes;
