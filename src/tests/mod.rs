//! # Pipeline Tests
//!
//! End-to-end runs of [`crate::app::App`] against a `mockito` server standing
//! in for the geocoding service.
