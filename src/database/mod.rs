/*!
 * Database module for persistent completion state.
 *
 * This module provides SQLite-based persistence for:
 * - The vocabulary card corpus
 * - The completion index of (card, language) translation records
 * - Best-effort enrichment records (example sentences)
 */

// Allow dead code - database types are for library consumers
#![allow(dead_code)]

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::DatabaseConnection;
pub use repository::Repository;
