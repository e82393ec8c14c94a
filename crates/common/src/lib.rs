//! Shared utilities for the fleetgate workspace.
//!
//! Keep cross-crate types, helpers, and error handling primitives here to avoid duplication.

#![warn(missing_docs)]

/// Shared API DTOs for cross-crate use.
pub mod api;
