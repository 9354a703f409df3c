//! Store abstraction: the ordered key-value primitives the engine consumes.
//!
//! The engine is written against the [`Store`] trait rather than a concrete
//! client. Each method is assumed to be atomic on its own; the engine never
//! relies on cross-command transactions, so a field write that touches
//! the hash and one or two indexes is a sequence of independent atomic
//! commands. Calls block until the store responds; cancellation and
//! timeouts belong to the backend.
//!
//! [`memory::MemoryStore`] implements the full contract in-process with
//! Redis semantics and backs the test suite. A network-backed
//! implementation plugs in at the same seam.

pub mod memory;

use std::ops::Bound;

use crate::error::Result;

/// Pagination for score-range queries: skip `offset` matches, return at
/// most `count`.
#[derive(Debug, Clone, Copy)]
pub struct Limit {
    pub offset: u64,
    pub count: u64,
}

impl Limit {
    pub fn first(count: u64) -> Self {
        Limit { offset: 0, count }
    }
}

/// The key-value primitives the engine is built on.
///
/// Sorted sets order members by score, breaking ties by member string
/// (lexicographic). Rank windows follow Redis semantics: `start..=stop`
/// inclusive, negative ranks count from the end, out-of-range windows
/// clamp to the set.
pub trait Store: Send + Sync {
    /// Atomically increment the counter at `key`, returning the new value.
    fn incr(&self, key: &str) -> Result<u64>;

    /// Set one field of the hash at `key`.
    fn hset(&self, key: &str, field: &str, value: &str) -> Result<()>;

    /// Read one field of the hash at `key`.
    fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// Delete one field of the hash at `key`.
    fn hdel(&self, key: &str, field: &str) -> Result<()>;

    /// Insert or update a member's score in the sorted set at `key`.
    fn zadd(&self, key: &str, score: f64, member: &str) -> Result<()>;

    /// Remove a member from the sorted set at `key`.
    fn zrem(&self, key: &str, member: &str) -> Result<()>;

    /// A member's current score, if present.
    fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>>;

    /// Cardinality of the sorted set at `key`. Constant-time; never
    /// implemented by enumeration.
    fn zcard(&self, key: &str) -> Result<u64>;

    /// Members with rank in `start..=stop`, ascending by score.
    fn zrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>>;

    /// Members with rank in `start..=stop` over the descending order.
    fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>>;

    /// Members whose score falls within the given bounds, ascending,
    /// optionally paginated.
    fn zrange_by_score(
        &self,
        key: &str,
        min: Bound<f64>,
        max: Bound<f64>,
        limit: Option<Limit>,
    ) -> Result<Vec<String>>;

    /// Delete whole keys, of any kind.
    fn del(&self, keys: &[String]) -> Result<()>;
}
