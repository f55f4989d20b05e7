//! Frame-synchronous viewer core.
//!
//! One [`Viewer`] owns the camera, the meshes and the boolean cache. The
//! host drives it with a simple loop:
//!
//! ```text
//! for msg in input { viewer.handle(msg, &mut backend) }
//! viewer.update(dt)
//! viewer.draw(&mut backend)
//! ```
//!
//! Everything runs on the caller's thread; a boolean computation blocks the
//! frame that requested it.

use crate::arena::{MeshArena, MeshHandle};
use crate::blend::ColorspaceBlend;
use crate::config::ViewerConfig;
use crate::messages::{ViewerEvent, ViewerMsg};
use crate::render::{
    DrawCall, MeshBuffers, RenderBackend, U_ALPHA, U_BLEND, U_CAMERA_POS, U_MODEL, U_PROJ,
    U_VIEW, U_WIREFRAME, Uniform,
};
use crate::state::ViewerPersistence;
use colorviz_camera::control::TRACK2D_DRAG_SCALE;
use colorviz_camera::{Camera, CameraControl, Mode, Pose};
use colorviz_gamut::{
    BooleanError, BooleanOp, GamutMesh, IdGenerator, LoadOptions, MeshId, ParseMode, mesh_boolean,
};
use colorviz_math::{Vec2, Vec3};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default viewport size.
pub const DEFAULT_VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

/// Cache key: operand ids in order plus the operation.
pub type BooleanKey = (MeshId, MeshId, BooleanOp);

/// Cached boolean outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum BooleanOutcome {
    /// Result mesh in the arena.
    Ready(MeshHandle),
    /// Failure; the pair is not retried.
    Failed(BooleanError),
}

/// Viewer state driven by [`ViewerMsg`]s.
#[derive(Debug)]
pub struct Viewer {
    config: ViewerConfig,
    camera: Camera,
    control: CameraControl,
    arena: MeshArena,
    ids: IdGenerator,
    blend: ColorspaceBlend,
    booleans: HashMap<BooleanKey, BooleanOutcome>,
    sources: HashMap<MeshHandle, PathBuf>,
    view_size: Vec2,

    // Input accumulated between updates
    drag_from: Option<Vec2>,
    drag: Vec2,
    look: Vec2,
    key_axis: Vec2,
    key_offset: Vec2,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl Viewer {
    /// Creates an empty viewer looking at the configured target.
    pub fn new(config: ViewerConfig) -> Self {
        let target = config.target();
        let mut control = CameraControl::new(Pose {
            pos: target + Vec3::Z * config.orbit_distance,
            rot: Vec3::ZERO,
            target,
        });
        control.set_mode(config.mode);

        let camera = Camera {
            fov: config.fov,
            near: config.near,
            far: config.far,
            projection: config.projection,
            ..Default::default()
        };

        let mut viewer = Self {
            blend: ColorspaceBlend::new(config.blend_duration),
            config,
            camera,
            control,
            arena: MeshArena::new(),
            ids: IdGenerator::new(),
            booleans: HashMap::new(),
            sources: HashMap::new(),
            view_size: DEFAULT_VIEWPORT,
            drag_from: None,
            drag: Vec2::ZERO,
            look: Vec2::ZERO,
            key_axis: Vec2::ZERO,
            key_offset: Vec2::ZERO,
        };
        viewer.sync_camera();
        viewer
    }

    /// Settings in use.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Camera as of the last update.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera control state.
    pub fn control(&self) -> &CameraControl {
        &self.control
    }

    /// Loaded and computed meshes.
    pub fn arena(&self) -> &MeshArena {
        &self.arena
    }

    /// Colorspace blend state.
    pub fn blend(&self) -> &ColorspaceBlend {
        &self.blend
    }

    /// Viewport size in pixels.
    pub fn view_size(&self) -> Vec2 {
        self.view_size
    }

    /// File a mesh was loaded from.
    pub fn source(&self, handle: MeshHandle) -> Option<&Path> {
        self.sources.get(&handle).map(PathBuf::as_path)
    }

    /// Cached boolean outcome for two meshes.
    pub fn boolean_outcome(&self, a: MeshId, b: MeshId, op: BooleanOp) -> Option<&BooleanOutcome> {
        self.booleans.get(&(a, b, op))
    }

    // =========================================================================
    // Messages
    // =========================================================================

    /// Applies one input message.
    pub fn handle<B: RenderBackend + ?Sized>(
        &mut self,
        msg: ViewerMsg,
        backend: &mut B,
    ) -> Option<ViewerEvent> {
        match msg {
            ViewerMsg::LoadGamut(path) => return Some(self.load_gamut(path, backend)),
            ViewerMsg::RemoveMesh(handle) => return Some(self.remove_mesh(handle, backend)),
            ViewerMsg::SetActive { handle, active } => match self.arena.try_get_mut(handle) {
                Ok(mesh) => mesh.active = active,
                Err(e) => return Some(ViewerEvent::Error(e.to_string())),
            },
            ViewerMsg::SetWireframe { handle, wireframe } => {
                match self.arena.try_get_mut(handle) {
                    Ok(mesh) => mesh.wireframe = wireframe,
                    Err(e) => return Some(ViewerEvent::Error(e.to_string())),
                }
            }
            ViewerMsg::SetTransparent(handle) => {
                if let Err(e) = self.arena.set_transparent(handle) {
                    return Some(ViewerEvent::Error(e.to_string()));
                }
            }
            ViewerMsg::ComputeBoolean { a, b, op } => {
                return Some(self.compute_boolean(a, b, op, backend));
            }
            ViewerMsg::SwitchColorspace => self.blend.switch(),
            ViewerMsg::SetMode(mode) => {
                self.control.set_mode(mode);
                self.reset_drag();
            }
            ViewerMsg::SetProjection(projection) => self.camera.set_projection(projection),
            ViewerMsg::SetOrthoView(view) => {
                self.control.set_ortho_view(&mut self.camera, view);
                self.reset_drag();
            }
            ViewerMsg::DragStart(pos) => {
                self.reset_drag();
                self.drag_from = Some(pos);
            }
            ViewerMsg::Drag(pos) => {
                if let Some(from) = self.drag_from {
                    self.drag = self.drag_delta(pos - from);
                }
            }
            ViewerMsg::DragEnd => self.drag_from = None,
            ViewerMsg::MouseMove(delta) => self.look += delta * self.config.look_sensitivity,
            ViewerMsg::Scroll(notches) => {
                self.control.universal_zoom(-notches * self.config.zoom_step);
            }
            ViewerMsg::KeyMove(axis) => self.key_axis = axis,
            ViewerMsg::Resize(size) => {
                self.view_size = size;
                self.sync_camera();
            }
            ViewerMsg::Pick(screen) => return Some(self.pick(screen)),
        }
        None
    }

    /// Converts a pixel drag into control units for the current mode.
    fn drag_delta(&self, pixels: Vec2) -> Vec2 {
        match self.control.mode() {
            // screen Y grows down, world Y up; content follows the pointer
            Mode::Track2D => Vec2::new(-pixels.x, pixels.y) / TRACK2D_DRAG_SCALE,
            _ => pixels * self.config.drag_sensitivity,
        }
    }

    /// Restarts cumulative drag and keyboard offsets from the current pose.
    fn reset_drag(&mut self) {
        self.drag_from = None;
        self.drag = Vec2::ZERO;
        self.key_offset = Vec2::ZERO;
        self.control.drag_start();
    }

    fn load_gamut<B: RenderBackend + ?Sized>(&mut self, path: PathBuf, backend: &mut B) -> ViewerEvent {
        let options = LoadOptions {
            mode: ParseMode::Lenient,
            illuminant: self.config.illuminant,
        };
        match GamutMesh::load(&path, &options, &mut self.ids) {
            Ok(mesh) => {
                let id = mesh.id();
                let handle = self.add_mesh(mesh, backend);
                self.sources.insert(handle, path.clone());
                ViewerEvent::GamutLoaded { handle, id, path }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "gamut not loaded");
                ViewerEvent::LoadFailed {
                    path,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Uploads a mesh and stores it.
    pub fn add_mesh<B: RenderBackend + ?Sized>(&mut self, mesh: GamutMesh, backend: &mut B) -> MeshHandle {
        let buffers = MeshBuffers::upload(backend, &mesh);
        self.arena.insert(mesh, Some(buffers))
    }

    fn remove_mesh<B: RenderBackend + ?Sized>(
        &mut self,
        handle: MeshHandle,
        backend: &mut B,
    ) -> ViewerEvent {
        let Some(mesh) = self.arena.remove(handle, backend) else {
            return ViewerEvent::Error(format!("no mesh for handle {handle:?}"));
        };
        let id = mesh.id();
        self.sources.remove(&handle);
        self.booleans.retain(|(a, b, _), outcome| {
            *a != id && *b != id && *outcome != BooleanOutcome::Ready(handle)
        });
        ViewerEvent::MeshRemoved(handle)
    }

    fn compute_boolean<B: RenderBackend + ?Sized>(
        &mut self,
        a: MeshHandle,
        b: MeshHandle,
        op: BooleanOp,
        backend: &mut B,
    ) -> ViewerEvent {
        let (Some(ma), Some(mb)) = (self.arena.get(a), self.arena.get(b)) else {
            return ViewerEvent::Error(format!("boolean operands {a:?}, {b:?} not loaded"));
        };
        let key = (ma.id(), mb.id(), op);

        match self.booleans.get(&key) {
            Some(BooleanOutcome::Ready(handle)) if self.arena.contains(*handle) => {
                debug!(?key, "boolean cache hit");
                return ViewerEvent::BooleanReady {
                    handle: *handle,
                    op,
                };
            }
            Some(BooleanOutcome::Failed(error)) => {
                debug!(?key, "boolean failed before, not retrying");
                return ViewerEvent::BooleanFailed {
                    op,
                    error: error.clone(),
                };
            }
            _ => {}
        }

        match mesh_boolean(ma, mb, op, &mut self.ids) {
            Ok(mesh) => {
                let handle = self.add_mesh(mesh, backend);
                self.booleans.insert(key, BooleanOutcome::Ready(handle));
                ViewerEvent::BooleanReady { handle, op }
            }
            Err(error) => {
                self.booleans
                    .insert(key, BooleanOutcome::Failed(error.clone()));
                ViewerEvent::BooleanFailed { op, error }
            }
        }
    }

    fn pick(&mut self, screen: Vec2) -> ViewerEvent {
        self.sync_camera();
        let ray = self.camera.ray(screen);
        let hit = self
            .arena
            .iter()
            .filter(|(_, e)| e.mesh.active)
            .filter_map(|(h, e)| e.mesh.pick(&ray).map(|hit| (h, hit.hit)))
            .min_by(|(_, x), (_, y)| x.distance.total_cmp(&y.distance))
            .map(|(h, hit)| (h, hit.point));
        ViewerEvent::Picked { hit }
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Advances one frame of `dt` seconds: applies accumulated input to the
    /// camera control, pushes it into the camera and steps the blend.
    pub fn update(&mut self, dt: f32) {
        let step = self.key_axis * self.config.move_speed * dt;
        // orbit pans the target relative to the drag start, other modes step
        let movement = if self.control.mode() == Mode::Orbit {
            self.key_offset += step;
            self.key_offset
        } else {
            step
        };
        let rotate = std::mem::take(&mut self.look);
        self.control.control(rotate, self.drag, movement);
        self.sync_camera();
        self.blend.update(dt);
    }

    fn sync_camera(&mut self) {
        self.control.update(&mut self.camera, self.view_size);
    }

    /// Issues uniforms and draw calls for every visible mesh.
    ///
    /// Opaque meshes are drawn first, the transparent mesh last.
    pub fn draw<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        backend.set_uniform(U_VIEW, Uniform::Mat4(self.camera.view()));
        backend.set_uniform(U_PROJ, Uniform::Mat4(self.camera.proj()));
        backend.set_uniform(U_BLEND, Uniform::Float(self.blend.value()));
        backend.set_uniform(U_CAMERA_POS, Uniform::Vec3(self.camera.pos));

        let transparent = self.arena.transparent();
        let visible = self
            .arena
            .iter()
            .filter(|(_, e)| e.mesh.active)
            .filter_map(|(h, e)| e.buffers.map(|b| (h, &e.mesh, b)));
        let (back, front): (Vec<_>, Vec<_>) =
            visible.partition(|(h, _, _)| Some(*h) != transparent);

        for (_, mesh, buffers) in back {
            Self::draw_mesh(backend, mesh, buffers, 1.0, false);
        }
        for (_, mesh, buffers) in front {
            Self::draw_mesh(backend, mesh, buffers, self.config.transparent_alpha, true);
        }
    }

    fn draw_mesh<B: RenderBackend + ?Sized>(
        backend: &mut B,
        mesh: &GamutMesh,
        buffers: MeshBuffers,
        alpha: f32,
        transparent: bool,
    ) {
        backend.set_uniform(U_MODEL, Uniform::Mat4(mesh.model_matrix()));
        backend.set_uniform(U_ALPHA, Uniform::Float(alpha));
        backend.set_uniform(
            U_WIREFRAME,
            Uniform::Float(if mesh.wireframe { 1.0 } else { 0.0 }),
        );
        backend.draw(&DrawCall {
            buffers,
            wireframe: mesh.wireframe,
            transparent,
        });
    }

    /// Update then draw.
    pub fn frame<B: RenderBackend + ?Sized>(&mut self, dt: f32, backend: &mut B) {
        self.update(dt);
        self.draw(backend);
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Snapshot of the settings worth keeping between sessions.
    pub fn persistence(&self) -> ViewerPersistence {
        ViewerPersistence {
            last_files: self
                .arena
                .iter()
                .filter_map(|(h, _)| self.sources.get(&h).cloned())
                .collect(),
            mode: self.control.mode(),
            projection: self.camera.projection,
            orbit_target: self.control.orbit_target().to_array(),
            orbit_distance: self.control.orbit_dist(),
            orbit_theta: self.control.orbit_theta(),
            orbit_phi: self.control.orbit_phi(),
        }
    }

    /// Restores camera state and reloads the listed files.
    ///
    /// Files that fail to load are skipped; their events are returned with
    /// the rest.
    pub fn restore<B: RenderBackend + ?Sized>(
        &mut self,
        state: &ViewerPersistence,
        backend: &mut B,
    ) -> Vec<ViewerEvent> {
        self.camera.set_projection(state.projection);
        self.control.set_orbit_target(Vec3::from_array(state.orbit_target));
        self.control.set_orbit_dist(state.orbit_distance);
        self.control.set_orbit_theta(state.orbit_theta);
        self.control.set_orbit_phi(state.orbit_phi);
        self.control.set_mode(state.mode);
        self.reset_drag();
        self.sync_camera();

        state
            .last_files
            .iter()
            .filter_map(|path| self.handle(ViewerMsg::LoadGamut(path.clone()), backend))
            .collect()
    }
}
