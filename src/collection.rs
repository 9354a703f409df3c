//! Lazy collections over sorted indexes.
//!
//! A [`Collection`] is a view over one ordered index in a chosen
//! direction. It owns no elements: every access translates into a rank
//! window on the backing index, so the collection reflects the index's
//! live state at each query rather than a snapshot. Concurrent mutation
//! during iteration may therefore be observed.

use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::Arc;

use crate::engine::EngineInner;
use crate::error::{Result, SorrelError};
use crate::record::Record;

/// Iteration order over an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

impl FromStr for Order {
    type Err = SorrelError;

    /// Parse `"asc"` or `"desc"`; anything else is an
    /// [`SorrelError::UnknownOrderOption`].
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            other => Err(SorrelError::unknown_order(other)),
        }
    }
}

/// How many elements one iterator window fetches.
const ITER_BATCH: usize = 64;

/// A lazy, randomly-indexable view over one sorted index.
///
/// Indexing mirrors array-slice semantics: single ranks (negative counts
/// from the end), half-open and inclusive rank ranges, and offset/limit
/// pages. Elements hydrate into [`Record`] handles.
pub struct Collection {
    inner: Arc<EngineInner>,
    key: String,
    order: Order,
}

impl Collection {
    pub(crate) fn new(inner: Arc<EngineInner>, key: String, order: Order) -> Self {
        Collection { inner, key, order }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Cardinality of the backing index, via the store's constant-time
    /// primitive.
    pub fn count(&self) -> Result<u64> {
        self.inner.store.zcard(&self.key)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.count()? == 0)
    }

    /// One rank window in this collection's order, hydrated.
    fn fetch(&self, start: i64, stop: i64) -> Result<Vec<Record>> {
        let ids = match self.order {
            Order::Asc => self.inner.store.zrange(&self.key, start, stop)?,
            Order::Desc => self.inner.store.zrevrange(&self.key, start, stop)?,
        };
        Ok(self.inner.hydrate(ids))
    }

    /// The element at rank `i`; negative ranks count from the end.
    pub fn get(&self, i: i64) -> Result<Option<Record>> {
        Ok(self.fetch(i, i)?.into_iter().next())
    }

    /// Elements with rank in the half-open window `start..end`.
    pub fn range(&self, start: i64, end: i64) -> Result<Vec<Record>> {
        // end == 0 would wrap to "through the last element" below.
        if end == 0 {
            return Ok(Vec::new());
        }
        self.fetch(start, end - 1)
    }

    /// Elements with rank in the inclusive window `start..=stop`.
    pub fn range_inclusive(&self, start: i64, stop: i64) -> Result<Vec<Record>> {
        self.fetch(start, stop)
    }

    /// At most `limit` elements starting at rank `offset`.
    ///
    /// Windows reaching past `i64::MAX` clamp rather than wrap.
    pub fn page(&self, offset: u64, limit: u64) -> Result<Vec<Record>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let start = offset.min(i64::MAX as u64) as i64;
        let stop = offset
            .saturating_add(limit)
            .saturating_sub(1)
            .min(i64::MAX as u64) as i64;
        self.fetch(start, stop)
    }

    /// The front element.
    pub fn first(&self) -> Result<Option<Record>> {
        self.get(0)
    }

    /// The back element.
    pub fn last(&self) -> Result<Option<Record>> {
        self.get(-1)
    }

    /// The first `n` elements.
    pub fn first_n(&self, n: u64) -> Result<Vec<Record>> {
        self.page(0, n)
    }

    /// The last `n` elements, still in this collection's order.
    pub fn last_n(&self, n: u64) -> Result<Vec<Record>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        self.fetch(-(n.min(i64::MAX as u64) as i64), -1)
    }

    /// Iterate in order, fetching windows lazily.
    ///
    /// Each element is fetched once per traversal. The sequence is live:
    /// elements inserted or removed behind the cursor during iteration may
    /// shift later windows.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            collection: self,
            rank: 0,
            buffer: VecDeque::new(),
            done: false,
        }
    }
}

/// Batched iterator over a [`Collection`].
pub struct Iter<'a> {
    collection: &'a Collection,
    rank: i64,
    buffer: VecDeque<Record>,
    done: bool,
}

impl Iterator for Iter<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.done {
            let stop = self.rank + ITER_BATCH as i64 - 1;
            match self.collection.range_inclusive(self.rank, stop) {
                Ok(batch) => {
                    if batch.len() < ITER_BATCH {
                        self.done = true;
                    }
                    self.rank += batch.len() as i64;
                    self.buffer.extend(batch);
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = Result<Record>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
