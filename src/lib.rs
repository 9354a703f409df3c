//! # Sorrel
//!
//! Secondary indexing and queries over an ordered key-value store.
//!
//! Sorrel maintains sorted indexes for the declared fields of a record
//! type on top of a store exposing Redis-shaped primitives (hashes, sorted
//! sets, atomic counters) and answers equality searches, range scans,
//! multi-field intersections, and prefix token search — all without
//! materializing an index in memory.
//!
//! ## Features
//!
//! - Declarative, immutable schemas: sortable and text-searchable fields
//! - Order-preserving base-27 scoring of strings and numbers
//! - Lazy, randomly-indexable collections over live indexes
//! - Pluggable store backends behind the [`Store`] trait
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use sorrel::{Engine, MemoryStore, Order, Schema};
//!
//! # fn main() -> sorrel::Result<()> {
//! let schema = Schema::builder("person")
//!     .sortable_field("name")
//!     .sortable_field("age")
//!     .build();
//! let engine = Engine::new(Arc::new(MemoryStore::new()), schema);
//!
//! let alice = engine.create()?;
//! alice.set("name", "alice")?;
//! alice.set("age", 30)?;
//!
//! let by_age = engine.sort_by("age", Order::Asc)?;
//! assert_eq!(by_age.count()?, 1);
//! assert!(engine.find_by("age", 30)?.is_some());
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod engine;
mod error;
pub mod keys;
pub mod record;
pub mod schema;
pub mod score;
pub mod store;
mod value;

// Re-exports for the public API
pub use collection::{Collection, Iter, Order};
pub use engine::Engine;
pub use error::{Result, SorrelError};
pub use record::Record;
pub use schema::{CREATED_AT, FieldSpec, Schema, SchemaBuilder};
pub use store::memory::MemoryStore;
pub use store::{Limit, Store};
pub use value::Value;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
