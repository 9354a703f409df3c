//! The engine facade: record lifecycle and index maintenance for one
//! record type.
//!
//! An [`Engine`] binds a [`Store`] handle to one [`Schema`]. It allocates
//! ids, registers records in the primary index, maintains sort and term
//! indexes on every field write, and answers queries (see
//! [`search`](self::search)). Several engines, one per record type, may
//! share a store; key naming namespaces them by type name.
//!
//! The store is the sole source of atomicity. A field write is a sequence
//! of independent atomic commands (hash write, then index upserts), not one
//! transaction; concurrent writers to the same field may leave the hash and
//! an index transiently divergent, and readers must tolerate that.

pub mod search;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use log::debug;

use crate::collection::{Collection, Order};
use crate::error::{Result, SorrelError};
use crate::keys;
use crate::record::Record;
use crate::schema::{CREATED_AT, Schema};
use crate::score;
use crate::store::Store;
use crate::value::Value;

/// Engine over one record type.
///
/// Cheap to clone; all methods take `&self` and are safe to call
/// concurrently.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

pub(crate) struct EngineInner {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) schema: Schema,
}

impl Engine {
    pub fn new(store: Arc<dyn Store>, schema: Schema) -> Self {
        debug!("engine opened for record type '{}'", schema.name());
        Engine {
            inner: Arc::new(EngineInner { store, schema }),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    /// Allocate a fresh id and register it in the primary index with the
    /// current time as its score.
    pub fn create(&self) -> Result<Record> {
        let type_name = self.inner.schema.name();
        let id = self.inner.store.incr(&keys::next_id(type_name))?;
        self.inner.register(id)?;
        debug!("created {type_name}:{id}");
        Ok(Record::new(id, self.inner.clone()))
    }

    /// Register a caller-chosen id.
    ///
    /// Fails with [`SorrelError::DuplicateId`] when the id is already live.
    /// The id counter is not advanced, so explicit ids should stay outside
    /// the allocator's range.
    pub fn create_with_id(&self, id: u64) -> Result<Record> {
        let type_name = self.inner.schema.name();
        let primary = keys::primary_index(type_name);
        if self.inner.store.zscore(&primary, &id.to_string())?.is_some() {
            return Err(SorrelError::DuplicateId(id));
        }
        self.inner.register(id)?;
        debug!("created {type_name}:{id} (explicit id)");
        Ok(Record::new(id, self.inner.clone()))
    }

    /// A handle for `id`, if it is live in the primary index.
    ///
    /// Field hydration happens lazily on first access.
    pub fn find(&self, id: u64) -> Result<Option<Record>> {
        let primary = keys::primary_index(self.inner.schema.name());
        Ok(self
            .inner
            .store
            .zscore(&primary, &id.to_string())?
            .map(|_| Record::new(id, self.inner.clone())))
    }

    /// Number of live records.
    pub fn count(&self) -> Result<u64> {
        self.inner
            .store
            .zcard(&keys::primary_index(self.inner.schema.name()))
    }

    /// All records, ordered by creation time.
    pub fn all(&self, order: Order) -> Collection {
        let key = keys::primary_index(self.inner.schema.name());
        Collection::new(self.inner.clone(), key, order)
    }

    /// Records ordered by a sortable field.
    pub fn sort_by(&self, field: &str, order: Order) -> Result<Collection> {
        if !self.inner.schema.is_sortable(field) {
            return Err(SorrelError::field_not_sortable(field));
        }
        let key = keys::sort_index(self.inner.schema.name(), field);
        Ok(Collection::new(self.inner.clone(), key, order))
    }

    /// Destroy every record of the type and delete every index key and the
    /// id counter, resetting the type's storage footprint.
    pub fn destroy_all(&self) -> Result<()> {
        let inner = &self.inner;
        let type_name = inner.schema.name();
        let primary = keys::primary_index(type_name);

        for member in inner.store.zrange(&primary, 0, -1)? {
            if let Ok(id) = member.parse::<u64>() {
                inner.destroy_id(id)?;
            }
        }

        let mut doomed: Vec<String> = Vec::new();
        for field in inner.schema.sortable_fields() {
            doomed.push(keys::sort_index(type_name, &field.name));
        }
        for field in inner.schema.text_fields() {
            let terms_key = keys::terms_index(type_name, &field.name);
            for token in inner.store.zrange(&terms_key, 0, -1)? {
                doomed.push(keys::term_index(type_name, &field.name, &token));
            }
            doomed.push(terms_key);
        }
        doomed.push(keys::next_id(type_name));
        doomed.push(primary);
        inner.store.del(&doomed)?;
        debug!("destroyed all records of type '{type_name}'");
        Ok(())
    }
}

impl EngineInner {
    /// Add `id` to the primary index, scored by the current time in epoch
    /// milliseconds.
    fn register(&self, id: u64) -> Result<()> {
        let primary = keys::primary_index(self.schema.name());
        let now = Utc::now().timestamp_millis() as f64;
        self.store.zadd(&primary, now, &id.to_string())
    }

    pub(crate) fn created_at(&self, id: u64) -> Result<DateTime<Utc>> {
        let type_name = self.schema.name();
        let primary = keys::primary_index(type_name);
        let score = self
            .store
            .zscore(&primary, &id.to_string())?
            .ok_or_else(|| {
                SorrelError::invalid_argument(format!("record {type_name}:{id} is not live"))
            })?;
        Utc.timestamp_millis_opt(score as i64)
            .single()
            .ok_or_else(|| {
                SorrelError::invalid_argument(format!(
                    "record {type_name}:{id} has an out-of-range creation score"
                ))
            })
    }

    /// The index-maintaining write path behind [`Record::set`].
    ///
    /// Writes the hash entry, then upserts the sort-index score and, for
    /// text-searchable fields, every token's term-index entries. Steps are
    /// applied unconditionally (no dirty-checking) and are idempotent with
    /// respect to final index state. A failure after the hash write
    /// surfaces as [`SorrelError::IndexWriteFailed`] without rolling back
    /// earlier steps. Writing a text-searchable field on an id that is no
    /// longer in the primary index fails rather than indexing terms for a
    /// dead record.
    pub(crate) fn write_field(&self, id: u64, field: &str, value: &Value) -> Result<()> {
        if field == CREATED_AT {
            return Err(SorrelError::invalid_argument(
                "field 'created_at' is maintained by the engine",
            ));
        }
        let type_name = self.schema.name();
        let member = id.to_string();

        self.store
            .hset(&keys::record_hash(type_name, id), field, &value.encode())?;

        if self.schema.is_sortable(field) {
            let score = score::score(value)?;
            self.store
                .zadd(&keys::sort_index(type_name, field), score, &member)
                .map_err(|e| SorrelError::index_write(format!("sort index for '{field}': {e}")))?;
        }

        if self.schema.is_text_searchable(field) {
            let Value::Str(text) = value else {
                return Err(SorrelError::unscorable(value.kind()));
            };
            // Term entries are scored by creation time; a missing primary
            // entry means the record was destroyed out from under this
            // handle, and indexing would plant entries for a dead id.
            let created = self
                .store
                .zscore(&keys::primary_index(type_name), &member)?
                .ok_or_else(|| {
                    SorrelError::invalid_argument(format!(
                        "record {type_name}:{id} is not live"
                    ))
                })?;
            let terms_key = keys::terms_index(type_name, field);
            for token in tokenize(text) {
                self.store
                    .zadd(&keys::term_index(type_name, field, &token), created, &member)
                    .map_err(|e| {
                        SorrelError::index_write(format!("term index for '{token}': {e}"))
                    })?;
                self.store
                    .zadd(&terms_key, score::string_score(&token), &token)
                    .map_err(|e| {
                        SorrelError::index_write(format!("terms index for '{field}': {e}"))
                    })?;
            }
        }
        Ok(())
    }

    /// Cascading per-record deletion: primary entry, hash, sort-index
    /// entries, and term-index entries for every token currently in the
    /// hash. A token whose per-token set empties stays listed in the terms
    /// index until [`Engine::destroy_all`].
    pub(crate) fn destroy_id(&self, id: u64) -> Result<()> {
        let type_name = self.schema.name();
        let member = id.to_string();
        let hash_key = keys::record_hash(type_name, id);

        for field in self.schema.sortable_fields() {
            self.store
                .zrem(&keys::sort_index(type_name, &field.name), &member)?;
        }
        for field in self.schema.text_fields() {
            if let Some(raw) = self.store.hget(&hash_key, &field.name)? {
                if let Value::Str(text) = Value::decode(&raw) {
                    for token in tokenize(&text) {
                        self.store
                            .zrem(&keys::term_index(type_name, &field.name, &token), &member)?;
                    }
                }
            }
        }
        self.store.zrem(&keys::primary_index(type_name), &member)?;
        self.store.del(std::slice::from_ref(&hash_key))?;
        debug!("destroyed {type_name}:{id}");
        Ok(())
    }

    /// Turn index members back into record handles. Members that are not
    /// numeric ids (foreign writes) are skipped.
    pub(crate) fn hydrate(self: &Arc<Self>, members: Vec<String>) -> Vec<Record> {
        members
            .iter()
            .filter_map(|m| m.parse::<u64>().ok())
            .map(|id| Record::new(id, self.clone()))
            .collect()
    }
}

/// Lower-cased whitespace tokens of a text value.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_and_folds() {
        assert_eq!(tokenize("Hello  Brave\tWorld"), ["hello", "brave", "world"]);
        assert!(tokenize("   ").is_empty());
    }
}
