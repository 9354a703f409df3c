//! Record handles.
//!
//! A [`Record`] is a lightweight handle to one live record: its id plus
//! shared engine internals. Field values hydrate lazily on first access
//! and stay cached in the handle until [`Record::refresh`]; a successful
//! [`Record::set`] also updates the cache. The cache is per-handle, so two
//! handles to the same id observe each other's writes only through the
//! store.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::engine::EngineInner;
use crate::error::Result;
use crate::keys;
use crate::value::Value;

pub struct Record {
    id: u64,
    inner: Arc<EngineInner>,
    cache: Mutex<HashMap<String, Value>>,
}

impl Record {
    pub(crate) fn new(id: u64, inner: Arc<EngineInner>) -> Self {
        Record {
            id,
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The record's store-unique id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Read a field, through the handle's cache.
    ///
    /// The first read of each field fetches from the store; later reads
    /// return the cached value until [`Record::refresh`].
    pub fn get(&self, field: &str) -> Result<Option<Value>> {
        if let Some(value) = self.cache.lock().get(field) {
            return Ok(Some(value.clone()));
        }
        let key = keys::record_hash(self.inner.schema.name(), self.id);
        match self.inner.store.hget(&key, field)? {
            Some(raw) => {
                let value = Value::decode(&raw);
                self.cache
                    .lock()
                    .insert(field.to_string(), value.clone());
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Write a field and maintain its indexes.
    ///
    /// The cached value is only updated once the hash write and every index
    /// write have succeeded; after a partial failure the next [`Record::get`]
    /// re-fetches from the store.
    pub fn set(&self, field: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.inner.write_field(self.id, field, &value)?;
        self.cache.lock().insert(field.to_string(), value);
        Ok(())
    }

    /// Drop every cached field value; subsequent reads re-fetch.
    pub fn refresh(&self) {
        self.cache.lock().clear();
    }

    /// When this record was created, from its primary-index score.
    pub fn created_at(&self) -> Result<DateTime<Utc>> {
        self.inner.created_at(self.id)
    }

    /// Remove this record: its primary-index entry, its hash, and every
    /// sort- and term-index entry it owns.
    pub fn destroy(self) -> Result<()> {
        self.inner.destroy_id(self.id)
    }
}

impl Clone for Record {
    /// Clones share the engine internals but start with an empty cache.
    fn clone(&self) -> Self {
        Record::new(self.id, self.inner.clone())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record<{}:{}>", self.inner.schema.name(), self.id)
    }
}
