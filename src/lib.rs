//! # Mobsys - organizational record-keeping backend
//!
//! REST facade over a relational schema of contacts, addresses, persons,
//! companies, products, protocols and attachments.
//!
//! Mobsys provides:
//! - Typed entity definitions for the eight record tables
//! - SQLite-backed record store with per-call transactional writes
//! - Best-effort reference resolution, including the polymorphic
//!   contact reference (person or company, selected by a stored tag)
//! - JSON entity endpoints for products, contacts and attachments

pub mod api;
pub mod config;
pub mod entity;
pub mod resolver;
pub mod storage;

// Re-exports for convenient access
pub use entity::{
    Address, Attachment, Company, Contact, ContactRef, Medium, Person, Product, Protocol,
};
pub use resolver::ReferenceResolver;
pub use storage::RecordStore;

/// Result type alias for Mobsys operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Mobsys operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
