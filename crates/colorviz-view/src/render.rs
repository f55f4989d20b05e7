//! GPU collaborator contract.
//!
//! The viewer never talks to a graphics API. It uploads vertex and index
//! data, sets named uniforms and issues draw calls through
//! [`RenderBackend`]; a windowed frontend implements it over GL or wgpu.
//! [`RecordingBackend`] records the calls for headless runs and tests.

use colorviz_gamut::GamutMesh;
use colorviz_math::{Mat4, Vec3};
use std::collections::HashSet;

/// View matrix uniform.
pub const U_VIEW: &str = "uTView";
/// Projection matrix uniform.
pub const U_PROJ: &str = "uTProj";
/// Model matrix uniform.
pub const U_MODEL: &str = "uTModel";
/// Colorspace blend factor uniform.
pub const U_BLEND: &str = "uBlend";
/// Mesh opacity uniform.
pub const U_ALPHA: &str = "uAlpha";
/// Wireframe flag uniform (0 or 1).
pub const U_WIREFRAME: &str = "uWireframe";
/// Camera position uniform.
pub const U_CAMERA_POS: &str = "uCameraPos";

/// Backend buffer name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// Uniform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    /// 4x4 matrix
    Mat4(Mat4),
    /// Scalar
    Float(f32),
    /// 3-vector
    Vec3(Vec3),
}

/// Buffers holding one mesh on the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshBuffers {
    /// Lab positions.
    pub positions: BufferId,
    /// Per-vertex sRGB colors.
    pub colors: BufferId,
    /// Triangle indices.
    pub indices: BufferId,
    /// Number of indices.
    pub index_count: u32,
}

impl MeshBuffers {
    /// Uploads positions, colors and indices of `mesh`.
    pub fn upload<B: RenderBackend + ?Sized>(backend: &mut B, mesh: &GamutMesh) -> Self {
        let indices = mesh.triangles().as_flattened();
        Self {
            positions: backend.upload_vertices(mesh.vertices()),
            colors: backend.upload_vertices(mesh.colors()),
            indices: backend.upload_indices(indices),
            index_count: indices.len() as u32,
        }
    }

    /// Releases all three buffers.
    pub fn release<B: RenderBackend + ?Sized>(self, backend: &mut B) {
        backend.release(self.positions);
        backend.release(self.colors);
        backend.release(self.indices);
    }
}

/// Indexed triangle draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    /// Mesh buffers
    pub buffers: MeshBuffers,
    /// Draw edges only
    pub wireframe: bool,
    /// Alpha-blended pass
    pub transparent: bool,
}

/// Graphics operations the viewer needs.
pub trait RenderBackend {
    /// Uploads 3-float vertex data.
    fn upload_vertices(&mut self, data: &[Vec3]) -> BufferId;

    /// Uploads triangle indices.
    fn upload_indices(&mut self, data: &[u32]) -> BufferId;

    /// Sets a named shader uniform.
    fn set_uniform(&mut self, name: &str, value: Uniform);

    /// Draws indexed triangles.
    fn draw(&mut self, call: &DrawCall);

    /// Frees a buffer.
    fn release(&mut self, buffer: BufferId);
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// Vertex upload with element count.
    UploadVertices(BufferId, usize),
    /// Index upload with element count.
    UploadIndices(BufferId, usize),
    /// Uniform set.
    Uniform(String, Uniform),
    /// Draw call.
    Draw(DrawCall),
    /// Buffer release.
    Release(BufferId),
}

/// Backend that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    next: u64,
    live: HashSet<BufferId>,
    /// Calls in order.
    pub calls: Vec<BackendCall>,
}

impl RecordingBackend {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> BufferId {
        self.next += 1;
        let id = BufferId(self.next);
        self.live.insert(id);
        id
    }

    /// Buffers uploaded and not yet released.
    pub fn live_buffers(&self) -> usize {
        self.live.len()
    }

    /// Draw calls recorded so far.
    pub fn draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter_map(|c| match c {
            BackendCall::Draw(d) => Some(d),
            _ => None,
        })
    }

    /// Last value set for a uniform.
    pub fn uniform(&self, name: &str) -> Option<Uniform> {
        self.calls.iter().rev().find_map(|c| match c {
            BackendCall::Uniform(n, v) if n == name => Some(*v),
            _ => None,
        })
    }

    /// Forgets recorded calls, keeping buffer bookkeeping.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn upload_vertices(&mut self, data: &[Vec3]) -> BufferId {
        let id = self.alloc();
        self.calls.push(BackendCall::UploadVertices(id, data.len()));
        id
    }

    fn upload_indices(&mut self, data: &[u32]) -> BufferId {
        let id = self.alloc();
        self.calls.push(BackendCall::UploadIndices(id, data.len()));
        id
    }

    fn set_uniform(&mut self, name: &str, value: Uniform) {
        self.calls.push(BackendCall::Uniform(name.to_string(), value));
    }

    fn draw(&mut self, call: &DrawCall) {
        self.calls.push(BackendCall::Draw(*call));
    }

    fn release(&mut self, buffer: BufferId) {
        self.live.remove(&buffer);
        self.calls.push(BackendCall::Release(buffer));
    }
}
