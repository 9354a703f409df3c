//! Query operations: equality search, multi-field intersection, and
//! prefix or exact term matching.
//!
//! Equality is by score, not by raw value: two values scoring identically
//! (near-identical long strings, for instance) are indistinguishable to
//! `search_by`. This is the accepted approximation the base-27 embedding
//! trades for single-command range queries.

use std::collections::HashSet;
use std::ops::Bound;

use log::debug;

use crate::engine::{Engine, tokenize};
use crate::error::{Result, SorrelError};
use crate::keys;
use crate::record::Record;
use crate::score;
use crate::store::Limit;
use crate::value::Value;

impl Engine {
    /// Records whose `field` scores equal `value`'s score, in store rank
    /// order, honoring an optional result-count limit.
    pub fn search_by(
        &self,
        field: &str,
        value: impl Into<Value>,
        limit: Option<u64>,
    ) -> Result<Vec<Record>> {
        let value = value.into();
        if !self.inner.schema.is_sortable(field) {
            return Err(SorrelError::field_not_sortable(field));
        }
        if limit == Some(0) {
            return Ok(Vec::new());
        }
        let target = score::score(&value)?;
        let key = keys::sort_index(self.inner.schema.name(), field);
        let ids = self.inner.store.zrange_by_score(
            &key,
            Bound::Included(target),
            Bound::Included(target),
            limit.map(Limit::first),
        )?;
        debug!("search_by {field}: {} match(es)", ids.len());
        Ok(self.inner.hydrate(ids))
    }

    /// The first record whose `field` matches `value`, if any.
    pub fn find_by(&self, field: &str, value: impl Into<Value>) -> Result<Option<Record>> {
        Ok(self.search_by(field, value, Some(1))?.into_iter().next())
    }

    /// Records matching every predicate.
    ///
    /// A single predicate delegates to [`Engine::search_by`] and keeps its
    /// rank order. Several predicates intersect the per-field
    /// score-equality id sets (set semantics); the result order is
    /// unspecified.
    pub fn search(&self, predicates: &[(&str, Value)]) -> Result<Vec<Record>> {
        match predicates {
            [] => Ok(Vec::new()),
            [(field, value)] => self.search_by(field, value.clone(), None),
            _ => {
                for (field, _) in predicates {
                    if !self.inner.schema.is_sortable(field) {
                        return Err(SorrelError::field_not_sortable(*field));
                    }
                }
                let mut live: Option<HashSet<String>> = None;
                for (field, value) in predicates {
                    let target = score::score(value)?;
                    let key = keys::sort_index(self.inner.schema.name(), field);
                    let ids: HashSet<String> = self
                        .inner
                        .store
                        .zrange_by_score(
                            &key,
                            Bound::Included(target),
                            Bound::Included(target),
                            None,
                        )?
                        .into_iter()
                        .collect();
                    live = Some(match live {
                        None => ids,
                        Some(prev) => prev.intersection(&ids).cloned().collect(),
                    });
                    if live.as_ref().is_some_and(HashSet::is_empty) {
                        break;
                    }
                }
                let ids: Vec<String> = live.unwrap_or_default().into_iter().collect();
                Ok(self.inner.hydrate(ids))
            }
        }
    }

    /// Distinct indexed tokens of `field` that start with `prefix`
    /// (case-folded), in token score order.
    ///
    /// The empty prefix matches every token. A returned token may have no
    /// live records left if all of them were destroyed; `match_exact` on it
    /// then returns nothing.
    pub fn matches_prefix(&self, field: &str, prefix: &str) -> Result<Vec<String>> {
        if !self.inner.schema.is_text_searchable(field) {
            return Err(SorrelError::field_not_text_searchable(field));
        }
        let prefix = prefix.to_lowercase();
        let (lo, hi) = score::prefix_window(&prefix);
        let key = keys::terms_index(self.inner.schema.name(), field);
        self.inner
            .store
            .zrange_by_score(&key, Bound::Included(lo), Bound::Excluded(hi), None)
    }

    /// Records whose `field` contains exactly `token`, in creation order,
    /// honoring an optional result-count limit.
    pub fn match_exact(
        &self,
        field: &str,
        token: &str,
        limit: Option<u64>,
    ) -> Result<Vec<Record>> {
        if !self.inner.schema.is_text_searchable(field) {
            return Err(SorrelError::field_not_text_searchable(field));
        }
        let tokens = tokenize(token);
        let [token] = tokens.as_slice() else {
            return Err(SorrelError::invalid_argument(
                "token must be a single word",
            ));
        };
        if limit == Some(0) {
            return Ok(Vec::new());
        }
        let key = keys::term_index(self.inner.schema.name(), field, token);
        let stop = limit.map_or(-1, |n| n.saturating_sub(1).min(i64::MAX as u64) as i64);
        let ids = self.inner.store.zrange(&key, 0, stop)?;
        Ok(self.inner.hydrate(ids))
    }
}
