//! Surface registry
//!
//! Maps platform surface ids to surfaces stored in an append-only arena.
//! A [`SurfaceHandle`] is an index into that arena; it is what crosses the
//! FFI boundary instead of a raw pointer, so a stale or forged handle is
//! caught by a bounds check instead of being dereferenced.

use crate::surface::MobileSurface;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Stable handle to a registered surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceHandle(u32);

impl SurfaceHandle {
    /// Value passed to the managed side; never zero
    pub fn to_raw(self) -> i64 {
        i64::from(self.0) + 1
    }

    /// Decode a value produced by [`to_raw`](Self::to_raw)
    pub fn from_raw(raw: i64) -> Option<Self> {
        let index = raw.checked_sub(1)?;
        u32::try_from(index).ok().map(SurfaceHandle)
    }

    /// Arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Default)]
struct RegistryInner {
    by_id: FxHashMap<i32, SurfaceHandle>,
    surfaces: Vec<Arc<MobileSurface>>,
}

/// Owner of every surface in the process
///
/// Entries are never removed; a surface lives as long as the registry.
#[derive(Default)]
pub struct SurfaceRegistry {
    inner: Mutex<RegistryInner>,
}

impl SurfaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for surface `id`, creating the surface on first use
    pub fn get_or_create(&self, id: i32) -> SurfaceHandle {
        let mut inner = self.inner.lock();
        if let Some(handle) = inner.by_id.get(&id) {
            return *handle;
        }

        let index = u32::try_from(inner.surfaces.len()).unwrap_or(u32::MAX);
        let handle = SurfaceHandle(index);
        inner.surfaces.push(Arc::new(MobileSurface::new(id)));
        inner.by_id.insert(id, handle);
        tracing::debug!("Registered surface {} as {:?}", id, handle);
        handle
    }

    /// Handle of an existing surface
    pub fn lookup(&self, id: i32) -> Option<SurfaceHandle> {
        self.inner.lock().by_id.get(&id).copied()
    }

    /// Surface behind `handle`
    pub fn get(&self, handle: SurfaceHandle) -> Option<Arc<MobileSurface>> {
        self.inner.lock().surfaces.get(handle.index()).cloned()
    }

    /// Number of registered surfaces
    pub fn len(&self) -> usize {
        self.inner.lock().surfaces.len()
    }

    /// Check if no surface has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_same_id_same_surface() {
        let registry = SurfaceRegistry::new();
        let a = registry.get_or_create(7);
        let b = registry.get_or_create(7);
        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(
            &registry.get(a).unwrap(),
            &registry.get(b).unwrap()
        ));
    }

    #[test]
    fn test_distinct_ids() {
        let registry = SurfaceRegistry::new();
        let a = registry.get_or_create(1);
        let b = registry.get_or_create(2);
        assert_ne!(a, b);
        assert_eq!(registry.get(b).unwrap().id(), 2);
        assert_eq!(registry.lookup(1), Some(a));
        assert_eq!(registry.lookup(3), None);
    }

    #[test]
    fn test_unknown_handle() {
        let registry = SurfaceRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(SurfaceHandle(4)).is_none());
    }

    #[test]
    fn test_raw_round_trip() {
        let handle = SurfaceHandle(0);
        assert_eq!(handle.to_raw(), 1);
        assert_eq!(SurfaceHandle::from_raw(1), Some(handle));
        assert_eq!(SurfaceHandle::from_raw(0), None);
        assert_eq!(SurfaceHandle::from_raw(-5), None);
        assert_eq!(SurfaceHandle::from_raw(i64::MAX), None);
    }

    #[test]
    fn test_concurrent_creation() {
        let registry = Arc::new(SurfaceRegistry::new());
        let threads: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                thread::spawn(move || registry.get_or_create(i % 4))
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(registry.len(), 4);
    }
}
