//! Volunteer and donation service library.
//!
//! Exposes the router, storage backends, and configuration so the binary,
//! the CLI, and the integration tests share one implementation.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
