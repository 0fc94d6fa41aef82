//! Tenant-partitioned transactional document store for Kitabu.
//!
//! This crate realizes the document-store boundary the core depends
//! on: per-tenant collections of versioned documents, point reads,
//! equality/range scans, and atomic multi-document transactions with
//! optimistic conflict detection and bounded retry. Two concurrent
//! writers to the same document serialize correctly; lost updates are
//! impossible because every commit validates the versions it read.

pub mod documents;
pub mod store;
pub mod tx;

pub use store::DocumentStore;
pub use tx::{Collection, StoreError, Tx};
