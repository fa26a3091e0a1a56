//! Ordered matcher → value storage shared by every resolver.
//!
//! Entries live in a `Vec` in insertion order behind a `parking_lot::RwLock`
//! holding an `Arc`. Readers take a snapshot by cloning the `Arc` and drop the
//! lock before matching; writers copy-on-write through `Arc::make_mut`. A
//! reader therefore never sees a partially applied write, and caller-supplied
//! matching code never runs while the lock is held.

use parking_lot::RwLock;
use std::sync::Arc;

pub(crate) type Entries<K, V> = Arc<Vec<(K, V)>>;

#[derive(Debug)]
pub(crate) struct ConfigurationStore<K, V> {
    entries: RwLock<Entries<K, V>>,
}

impl<K, V> Default for ConfigurationStore<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Arc::new(Vec::new())),
        }
    }
}

impl<K, V> ConfigurationStore<K, V> {
    /// Consistent view of all entries in insertion order.
    pub(crate) fn snapshot(&self) -> Entries<K, V> {
        Arc::clone(&*self.entries.read())
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub(crate) fn clear(&self) {
        *self.entries.write() = Arc::new(Vec::new());
    }
}

impl<K, V> ConfigurationStore<K, V>
where
    K: Clone + PartialEq,
    V: Clone,
{
    /// Insert or replace. An equal matcher already present keeps its position
    /// but both the matcher and the value are swapped for the new ones, since
    /// equal matchers need not behave identically. Returns `true` when an
    /// entry was replaced.
    pub(crate) fn insert(&self, matcher: K, value: V) -> bool {
        let mut guard = self.entries.write();
        let entries = Arc::make_mut(&mut *guard);

        match entries.iter_mut().find(|(existing, _)| *existing == matcher) {
            Some(entry) => {
                *entry = (matcher, value);
                true
            }
            None => {
                entries.push((matcher, value));
                false
            }
        }
    }

    pub(crate) fn get(&self, matcher: &K) -> Option<V> {
        self.entries
            .read()
            .iter()
            .find(|(existing, _)| existing == matcher)
            .map(|(_, value)| value.clone())
    }
}
