//! # IO Module
//!
//! Interfaces between the domain and the outside world: the REST API served
//! to the dashboard and the HTTP client for the AI advisory service.

pub mod genkit;
pub mod rest;

pub use genkit::GenkitClient;
