//! Mesh storage addressed by generational handles.
//!
//! A [`MeshHandle`] names a slot plus the generation it was issued for.
//! Removing a mesh bumps the slot generation, so stale handles held by the
//! UI resolve to nothing instead of to whatever mesh reuses the slot.
//!
//! The arena owns each mesh together with its GPU buffers and releases the
//! buffers through the render backend when the mesh goes away. It also
//! tracks the single transparent mesh.

use crate::error::{Result, ViewerError};
use crate::render::{MeshBuffers, RenderBackend};
use colorviz_gamut::{GamutMesh, MeshId};
use tracing::trace;

/// Stable reference to a mesh in a [`MeshArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle {
    index: u32,
    generation: u32,
}

/// Mesh plus its uploaded buffers.
#[derive(Debug)]
pub struct MeshEntry {
    /// The mesh.
    pub mesh: GamutMesh,
    /// GPU buffers, if uploaded.
    pub buffers: Option<MeshBuffers>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    entry: Option<MeshEntry>,
}

/// Owning collection of meshes.
#[derive(Debug, Default)]
pub struct MeshArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    transparent: Option<MeshHandle>,
}

impl MeshArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live meshes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no mesh is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores a mesh and returns its handle.
    pub fn insert(&mut self, mesh: GamutMesh, buffers: Option<MeshBuffers>) -> MeshHandle {
        let entry = MeshEntry { mesh, buffers };
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return MeshHandle {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        MeshHandle {
            index: (self.slots.len() - 1) as u32,
            generation: 0,
        }
    }

    fn slot(&self, handle: MeshHandle) -> Option<&Slot> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
    }

    /// True when `handle` refers to a live mesh.
    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.entry(handle).is_some()
    }

    /// Mesh and buffers for `handle`.
    pub fn entry(&self, handle: MeshHandle) -> Option<&MeshEntry> {
        self.slot(handle).and_then(|s| s.entry.as_ref())
    }

    /// Mesh for `handle`.
    pub fn get(&self, handle: MeshHandle) -> Option<&GamutMesh> {
        self.entry(handle).map(|e| &e.mesh)
    }

    /// Mutable mesh for `handle`.
    pub fn get_mut(&mut self, handle: MeshHandle) -> Option<&mut GamutMesh> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.entry.as_mut())
            .map(|e| &mut e.mesh)
    }

    /// Like [`get_mut`](Self::get_mut) but reports dead handles.
    pub fn try_get_mut(&mut self, handle: MeshHandle) -> Result<&mut GamutMesh> {
        self.get_mut(handle).ok_or(ViewerError::UnknownHandle(handle))
    }

    /// Handle of the mesh with `id`.
    pub fn find(&self, id: MeshId) -> Option<MeshHandle> {
        self.iter()
            .find(|(_, e)| e.mesh.id() == id)
            .map(|(h, _)| h)
    }

    /// Removes a mesh, releasing its buffers.
    pub fn remove<B: RenderBackend + ?Sized>(
        &mut self,
        handle: MeshHandle,
        backend: &mut B,
    ) -> Option<GamutMesh> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)?;
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;

        if let Some(buffers) = entry.buffers {
            buffers.release(backend);
        }
        if self.transparent == Some(handle) {
            self.transparent = None;
        }
        trace!(?handle, id = %entry.mesh.id(), "mesh removed");
        Some(entry.mesh)
    }

    /// Removes every mesh.
    pub fn clear<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        for handle in self.handles() {
            self.remove(handle, backend);
        }
    }

    /// Live meshes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (MeshHandle, &MeshEntry)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.entry.as_ref().map(|e| {
                (
                    MeshHandle {
                        index: i as u32,
                        generation: s.generation,
                    },
                    e,
                )
            })
        })
    }

    /// Handles of all live meshes.
    pub fn handles(&self) -> Vec<MeshHandle> {
        self.iter().map(|(h, _)| h).collect()
    }

    /// The transparent mesh, if any.
    #[inline]
    pub fn transparent(&self) -> Option<MeshHandle> {
        self.transparent
    }

    /// True when `handle` is the transparent mesh.
    pub fn is_transparent(&self, handle: MeshHandle) -> bool {
        self.transparent == Some(handle)
    }

    /// Makes `handle` the only transparent mesh, or clears the flag.
    pub fn set_transparent(&mut self, handle: Option<MeshHandle>) -> Result<()> {
        if let Some(h) = handle {
            if !self.contains(h) {
                return Err(ViewerError::UnknownHandle(h));
            }
        }
        self.transparent = handle;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingBackend;
    use colorviz_gamut::IdGenerator;
    use colorviz_math::{Illuminant, Vec3};

    fn mesh(ids: &mut IdGenerator) -> GamutMesh {
        GamutMesh::from_parts(
            ids.next_id(),
            "m",
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![[0, 1, 2]],
            Illuminant::D65,
        )
        .unwrap()
    }

    #[test]
    fn test_stale_handle() {
        let mut ids = IdGenerator::new();
        let mut backend = RecordingBackend::new();
        let mut arena = MeshArena::new();

        let a = arena.insert(mesh(&mut ids), None);
        assert!(arena.remove(a, &mut backend).is_some());
        assert!(arena.remove(a, &mut backend).is_none());

        let b = arena.insert(mesh(&mut ids), None);
        assert_ne!(a, b);
        assert!(arena.get(a).is_none());
        assert!(arena.get(b).is_some());
        assert_eq!(arena.len(), 1);
        assert!(matches!(
            arena.try_get_mut(a),
            Err(ViewerError::UnknownHandle(_))
        ));
    }

    #[test]
    fn test_remove_releases_buffers() {
        let mut ids = IdGenerator::new();
        let mut backend = RecordingBackend::new();
        let mut arena = MeshArena::new();

        let m = mesh(&mut ids);
        let buffers = MeshBuffers::upload(&mut backend, &m);
        let h = arena.insert(m, Some(buffers));
        assert_eq!(backend.live_buffers(), 3);

        arena.clear(&mut backend);
        assert_eq!(backend.live_buffers(), 0);
        assert!(arena.is_empty());
        assert!(!arena.contains(h));
    }

    #[test]
    fn test_single_transparent() {
        let mut ids = IdGenerator::new();
        let mut backend = RecordingBackend::new();
        let mut arena = MeshArena::new();
        let a = arena.insert(mesh(&mut ids), None);
        let b = arena.insert(mesh(&mut ids), None);

        arena.set_transparent(Some(a)).unwrap();
        arena.set_transparent(Some(b)).unwrap();
        assert!(!arena.is_transparent(a));
        assert!(arena.is_transparent(b));

        arena.remove(b, &mut backend);
        assert_eq!(arena.transparent(), None);
        assert!(arena.set_transparent(Some(b)).is_err());
    }

    #[test]
    fn test_find_by_id() {
        let mut ids = IdGenerator::new();
        let mut arena = MeshArena::new();
        let m = mesh(&mut ids);
        let id = m.id();
        let h = arena.insert(m, None);
        assert_eq!(arena.find(id), Some(h));
    }
}
