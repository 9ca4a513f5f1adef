//! Core types for the Voluntarios service.
//!
//! This module provides type-safe wrappers for the identities stored in the
//! volunteer and donation tables.

pub mod id;

pub use id::*;
