//! # NameLink Store
//!
//! Durable storage of resolved number/name records.
//!
//! This crate provides the storage backends behind the lookaside cache:
//!
//! - **Memory**: Fast in-memory storage for development and testing
//! - **Turso** (feature `turso`): libSQL-backed storage for production
//!
//! Both back the same [`RecordStore`] trait, so the lookup pipeline never
//! knows which one it is talking to.
//!
//! ## Example
//!
//! ```rust,ignore
//! use namelink_store::{MemoryStore, RecordStore};
//!
//! let store = MemoryStore::new();
//! let record = store.upsert(&mobile, "JOHN DOE").await?;
//! assert_eq!(store.get(&mobile).await?, Some(record));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;
#[cfg(feature = "turso")]
mod turso;

pub use memory::MemoryStore;
#[cfg(feature = "turso")]
pub use turso::TursoStore;

// Re-export the trait from core
pub use namelink_core::traits::RecordStore;
