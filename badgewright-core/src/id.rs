//! # IDs
//! Elements, documents and load requests need identifiers that are unique for the lifetime of the process.
//! [`LocalID<T>`] hands these out, namespaced by the marker type `T`, so an element id can never be
//! confused with a document id even if their numeric values match.
//!
//! IDs are process-local and not serializable. A design written to disk is stored without
//! ids, and receives fresh ones when it is loaded again.

use std::sync::atomic::{AtomicU64, Ordering};

// Next free id, per namespace.
static ID_SERVER: parking_lot::RwLock<Option<hashbrown::HashMap<std::any::TypeId, AtomicU64>>> =
    parking_lot::const_rwlock(None);

pub struct LocalID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    _phantom: std::marker::PhantomData<fn() -> T>,
}
impl<T: std::any::Any> LocalID<T> {
    /// Allocate a new, never before seen id.
    #[must_use]
    pub fn next() -> Self {
        let ty = std::any::TypeId::of::<T>();
        let fetched = {
            let read = ID_SERVER.read();
            read.as_ref()
                .and_then(|map| map.get(&ty))
                .map(|counter| counter.fetch_add(1, Ordering::Relaxed))
        };
        let raw = fetched.unwrap_or_else(|| {
            // First id of this namespace, or lost a race with another first.
            let mut write = ID_SERVER.write();
            write
                .get_or_insert_with(hashbrown::HashMap::new)
                .entry(ty)
                .or_insert_with(|| AtomicU64::new(1))
                .fetch_add(1, Ordering::Relaxed)
        });
        // Counters start at one and a u64 will not wrap within a process lifetime.
        let id = std::num::NonZeroU64::new(raw).unwrap_or(std::num::NonZeroU64::MIN);
        Self {
            id,
            _phantom: std::marker::PhantomData,
        }
    }
    /// Raw numeric value. IDs from differing namespaces may share the same number!
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
}
impl<T: std::any::Any> Default for LocalID<T> {
    fn default() -> Self {
        Self::next()
    }
}
impl<T: std::any::Any> Clone for LocalID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for LocalID<T> {}
impl<T: std::any::Any> PartialEq for LocalID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<T: std::any::Any> Eq for LocalID<T> {}
impl<T: std::any::Any> std::hash::Hash for LocalID<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl<T: std::any::Any> PartialOrd for LocalID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: std::any::Any> Ord for LocalID<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
impl<T: std::any::Any> std::fmt::Display for LocalID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = std::any::type_name::<T>();
        let short = name.rsplit("::").next().unwrap_or(name);
        write!(f, "{short}#{}", self.id)
    }
}
impl<T: std::any::Any> std::fmt::Debug for LocalID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::LocalID;
    // Tests share the global allocator, so each uses its own namespace.

    #[test]
    fn unique() {
        struct Namespace;
        let mut ids: Vec<_> = (0..512).map(|_| LocalID::<Namespace>::next()).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        assert_eq!(before, ids.len(), "had duplicate ids");
    }
    #[test]
    fn unique_across_threads() {
        struct Namespace;
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..256)
                        .map(|_| LocalID::<Namespace>::next().id())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 1024);
    }
    #[test]
    fn display() {
        struct Namespace;
        let id = LocalID::<Namespace>::next();
        assert_eq!(format!("{id}"), format!("Namespace#{}", id.id()));
    }
}
