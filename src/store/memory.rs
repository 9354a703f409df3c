//! In-memory store backend.
//!
//! Implements the full [`Store`] contract in-process: hashes, atomic
//! counters, and sorted sets with Redis rank and tie-break semantics
//! (score order, ties broken by member string). Used by the test suite and
//! for embedded deployments that do not need persistence.

use std::collections::BTreeSet;
use std::ops::Bound;

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::error::Result;
use crate::store::{Limit, Store};

/// f64 ordered by `total_cmp`, so scores can key a BTreeSet.
#[derive(Debug, Clone, Copy)]
struct Score(f64);

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Default)]
struct SortedSet {
    by_rank: BTreeSet<(Score, String)>,
    scores: AHashMap<String, f64>,
}

impl SortedSet {
    fn insert(&mut self, member: &str, score: f64) {
        if let Some(old) = self.scores.insert(member.to_string(), score) {
            self.by_rank.remove(&(Score(old), member.to_string()));
        }
        self.by_rank.insert((Score(score), member.to_string()));
    }

    fn remove(&mut self, member: &str) {
        if let Some(old) = self.scores.remove(member) {
            self.by_rank.remove(&(Score(old), member.to_string()));
        }
    }

    fn len(&self) -> usize {
        self.by_rank.len()
    }
}

/// Translate a possibly-negative Redis rank window into `start..=stop`
/// positions, clamped to the set; `None` when the window is empty.
fn rank_window(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let n = len as i64;
    let mut a = if start < 0 { n + start } else { start };
    let mut b = if stop < 0 { n + stop } else { stop };
    a = a.max(0);
    b = b.min(n - 1);
    if n == 0 || a > b || a >= n {
        return None;
    }
    Some((a as usize, b as usize))
}

/// In-memory [`Store`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    hashes: RwLock<AHashMap<String, AHashMap<String, String>>>,
    zsets: RwLock<AHashMap<String, SortedSet>>,
    counters: RwLock<AHashMap<String, u64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn incr(&self, key: &str) -> Result<u64> {
        let mut counters = self.counters.write();
        let value = counters.entry(key.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        self.hashes
            .write()
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        Ok(self
            .hashes
            .read()
            .get(key)
            .and_then(|hash| hash.get(field))
            .cloned())
    }

    fn hdel(&self, key: &str, field: &str) -> Result<()> {
        let mut hashes = self.hashes.write();
        if let Some(hash) = hashes.get_mut(key) {
            hash.remove(field);
            // Empty containers do not exist, as in Redis.
            if hash.is_empty() {
                hashes.remove(key);
            }
        }
        Ok(())
    }

    fn zadd(&self, key: &str, score: f64, member: &str) -> Result<()> {
        self.zsets
            .write()
            .entry(key.to_string())
            .or_default()
            .insert(member, score);
        Ok(())
    }

    fn zrem(&self, key: &str, member: &str) -> Result<()> {
        let mut zsets = self.zsets.write();
        if let Some(set) = zsets.get_mut(key) {
            set.remove(member);
            if set.len() == 0 {
                zsets.remove(key);
            }
        }
        Ok(())
    }

    fn zscore(&self, key: &str, member: &str) -> Result<Option<f64>> {
        Ok(self
            .zsets
            .read()
            .get(key)
            .and_then(|set| set.scores.get(member))
            .copied())
    }

    fn zcard(&self, key: &str) -> Result<u64> {
        Ok(self.zsets.read().get(key).map_or(0, |set| set.len() as u64))
    }

    fn zrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let zsets = self.zsets.read();
        let Some(set) = zsets.get(key) else {
            return Ok(Vec::new());
        };
        let Some((a, b)) = rank_window(set.len(), start, stop) else {
            return Ok(Vec::new());
        };
        Ok(set
            .by_rank
            .iter()
            .skip(a)
            .take(b - a + 1)
            .map(|(_, member)| member.clone())
            .collect())
    }

    fn zrevrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let zsets = self.zsets.read();
        let Some(set) = zsets.get(key) else {
            return Ok(Vec::new());
        };
        let Some((a, b)) = rank_window(set.len(), start, stop) else {
            return Ok(Vec::new());
        };
        Ok(set
            .by_rank
            .iter()
            .rev()
            .skip(a)
            .take(b - a + 1)
            .map(|(_, member)| member.clone())
            .collect())
    }

    fn zrange_by_score(
        &self,
        key: &str,
        min: Bound<f64>,
        max: Bound<f64>,
        limit: Option<Limit>,
    ) -> Result<Vec<String>> {
        let zsets = self.zsets.read();
        let Some(set) = zsets.get(key) else {
            return Ok(Vec::new());
        };

        // Seek to the first candidate score; the empty member string sorts
        // before every real member of that score.
        let lower = match min {
            Bound::Included(m) | Bound::Excluded(m) => {
                Bound::Included((Score(m), String::new()))
            }
            Bound::Unbounded => Bound::Unbounded,
        };

        let mut out = Vec::new();
        let mut skipped = 0u64;
        for (Score(s), member) in set.by_rank.range((lower, Bound::Unbounded)) {
            if let Bound::Excluded(m) = min {
                if s.total_cmp(&m).is_eq() {
                    continue;
                }
            }
            match max {
                Bound::Included(m) if *s > m => break,
                Bound::Excluded(m) if *s >= m => break,
                _ => {}
            }
            if let Some(limit) = limit {
                if skipped < limit.offset {
                    skipped += 1;
                    continue;
                }
                if out.len() as u64 >= limit.count {
                    break;
                }
            }
            out.push(member.clone());
        }
        Ok(out)
    }

    fn del(&self, keys: &[String]) -> Result<()> {
        let mut hashes = self.hashes.write();
        let mut zsets = self.zsets.write();
        let mut counters = self.counters.write();
        for key in keys {
            hashes.remove(key);
            zsets.remove(key);
            counters.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(f64, &str)]) -> MemoryStore {
        let store = MemoryStore::new();
        for (score, member) in entries {
            store.zadd("z", *score, member).unwrap();
        }
        store
    }

    #[test]
    fn test_incr_is_monotonic() {
        let store = MemoryStore::new();
        assert_eq!(store.incr("c").unwrap(), 1);
        assert_eq!(store.incr("c").unwrap(), 2);
        assert_eq!(store.incr("other").unwrap(), 1);
    }

    #[test]
    fn test_zadd_updates_rank_in_place() {
        let store = store_with(&[(1.0, "a"), (2.0, "b")]);
        store.zadd("z", 3.0, "a").unwrap();
        assert_eq!(store.zrange("z", 0, -1).unwrap(), ["b", "a"]);
        assert_eq!(store.zcard("z").unwrap(), 2);
    }

    #[test]
    fn test_zrange_negative_and_clamped_windows() {
        let store = store_with(&[(1.0, "a"), (2.0, "b"), (3.0, "c")]);
        assert_eq!(store.zrange("z", 0, -1).unwrap(), ["a", "b", "c"]);
        assert_eq!(store.zrange("z", -2, -1).unwrap(), ["b", "c"]);
        assert_eq!(store.zrange("z", 1, 100).unwrap(), ["b", "c"]);
        assert!(store.zrange("z", 5, 9).unwrap().is_empty());
        assert!(store.zrange("z", 2, 1).unwrap().is_empty());
        assert!(store.zrange("missing", 0, -1).unwrap().is_empty());
    }

    #[test]
    fn test_zrevrange_reverses() {
        let store = store_with(&[(1.0, "a"), (2.0, "b"), (3.0, "c")]);
        assert_eq!(store.zrevrange("z", 0, -1).unwrap(), ["c", "b", "a"]);
        assert_eq!(store.zrevrange("z", 0, 0).unwrap(), ["c"]);
    }

    #[test]
    fn test_score_ties_break_by_member() {
        let store = store_with(&[(1.0, "b"), (1.0, "a"), (1.0, "c")]);
        assert_eq!(store.zrange("z", 0, -1).unwrap(), ["a", "b", "c"]);
    }

    #[test]
    fn test_zrange_by_score_bounds() {
        let store = store_with(&[(1.0, "a"), (2.0, "b"), (2.0, "bb"), (3.0, "c")]);
        let all = store
            .zrange_by_score("z", Bound::Unbounded, Bound::Unbounded, None)
            .unwrap();
        assert_eq!(all, ["a", "b", "bb", "c"]);

        let eq = store
            .zrange_by_score("z", Bound::Included(2.0), Bound::Included(2.0), None)
            .unwrap();
        assert_eq!(eq, ["b", "bb"]);

        let half_open = store
            .zrange_by_score("z", Bound::Included(1.0), Bound::Excluded(3.0), None)
            .unwrap();
        assert_eq!(half_open, ["a", "b", "bb"]);

        let above = store
            .zrange_by_score("z", Bound::Excluded(2.0), Bound::Unbounded, None)
            .unwrap();
        assert_eq!(above, ["c"]);
    }

    #[test]
    fn test_zrange_by_score_limit() {
        let store = store_with(&[(1.0, "a"), (2.0, "b"), (3.0, "c"), (4.0, "d")]);
        let page = store
            .zrange_by_score(
                "z",
                Bound::Unbounded,
                Bound::Unbounded,
                Some(Limit {
                    offset: 1,
                    count: 2,
                }),
            )
            .unwrap();
        assert_eq!(page, ["b", "c"]);
    }

    #[test]
    fn test_empty_containers_disappear() {
        let store = MemoryStore::new();
        store.zadd("z", 1.0, "a").unwrap();
        store.zrem("z", "a").unwrap();
        assert_eq!(store.zcard("z").unwrap(), 0);

        store.hset("h", "f", "v").unwrap();
        store.hdel("h", "f").unwrap();
        assert_eq!(store.hget("h", "f").unwrap(), None);
    }

    #[test]
    fn test_del_clears_every_kind() {
        let store = MemoryStore::new();
        store.hset("h", "f", "v").unwrap();
        store.zadd("z", 1.0, "a").unwrap();
        store.incr("c").unwrap();
        store
            .del(&["h".to_string(), "z".to_string(), "c".to_string()])
            .unwrap();
        assert_eq!(store.hget("h", "f").unwrap(), None);
        assert_eq!(store.zcard("z").unwrap(), 0);
        assert_eq!(store.incr("c").unwrap(), 1);
    }
}
