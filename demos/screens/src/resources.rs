//! GPU-side resources, as seen from the screens.
//!
//! Screens hand each model's primitives to a [`ResourceClient`] once and get a
//! [`MeshHandle`] back; every entity built from that model shares the handle.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{debug, trace};

use components::{MeshHandle, Primitive};

/// Compiles meshes and hands out shareable handles.
pub trait ResourceClient {
    /// Compile `primitives` under `name`. Compiling a name twice returns the
    /// handle from the first call.
    fn compile(&self, name: &str, primitives: &[Primitive]) -> MeshHandle;

    /// The handle previously compiled under `name`.
    fn get(&self, name: &str) -> Option<MeshHandle>;
}

/// What a compiled mesh amounts to once uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshInfo {
    /// The handle.
    pub handle: MeshHandle,
    /// Number of primitives.
    pub primitives: usize,
    /// Total vertex count over every primitive.
    pub vertices: usize,
}

#[derive(Debug, Default)]
struct CacheState {
    by_name: HashMap<String, MeshInfo>,
    next: u32,
}

/// In-memory [`ResourceClient`] that records what was compiled.
#[derive(Debug, Default)]
pub struct MeshCache {
    state: RefCell<CacheState>,
}

impl MeshCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct meshes compiled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().by_name.len()
    }

    /// Returns `true` if nothing was compiled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Details of the mesh compiled under `name`.
    #[must_use]
    pub fn info(&self, name: &str) -> Option<MeshInfo> {
        self.state.borrow().by_name.get(name).copied()
    }
}

impl ResourceClient for MeshCache {
    fn compile(&self, name: &str, primitives: &[Primitive]) -> MeshHandle {
        let mut state = self.state.borrow_mut();
        if let Some(info) = state.by_name.get(name) {
            trace!(mesh = name, handle = info.handle.0, "mesh already compiled");
            return info.handle;
        }

        let handle = MeshHandle(state.next);
        state.next += 1;
        let info = MeshInfo {
            handle,
            primitives: primitives.len(),
            vertices: primitives.iter().map(|p| p.vertices.len()).sum(),
        };
        state.by_name.insert(name.to_string(), info);
        debug!(
            mesh = name,
            handle = handle.0,
            primitives = info.primitives,
            vertices = info.vertices,
            "mesh compiled"
        );
        handle
    }

    fn get(&self, name: &str) -> Option<MeshHandle> {
        self.info(name).map(|info| info.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Primitive {
        Primitive {
            material_id: 0,
            vertices: vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_compile_once_per_name() {
        let cache = MeshCache::new();
        let a = cache.compile("bullet", &[triangle()]);
        let again = cache.compile("bullet", &[]);
        let b = cache.compile("terrain", &[triangle(), triangle()]);

        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.info("terrain").unwrap().vertices, 6);
    }

    #[test]
    fn test_get_unknown_is_none() {
        let cache = MeshCache::new();
        assert!(cache.get("ghost").is_none());
        assert!(cache.is_empty());
    }
}
