//! Module for core business logic services.
//!
//! This module encapsulates the services behind the HTTP handlers: recording
//! votes, aggregating them into per-place tallies, classifying places as
//! verified, and managing reviews. Each service holds a `Database` handle and
//! is cheap to clone into request handlers.

pub mod aggregator;
pub mod classification;
pub mod reviews;
pub mod verification;
