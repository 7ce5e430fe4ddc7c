//! # Travel Admin
//!
//! The back office for the travel site, built on `resource-framework`. This library
//! exposes the application's modules for the binary and for integration testing.

pub mod config;
pub mod lifecycle;
pub mod model;
