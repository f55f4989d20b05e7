//! Viewer core driven through messages with a recording backend.

use colorviz_camera::{Mode, OrthoView, Projection};
use colorviz_gamut::{BooleanError, BooleanOp};
use colorviz_math::{Vec2, Vec3};
use colorviz_view::{
    BooleanOutcome, MeshHandle, RecordingBackend, U_ALPHA, U_BLEND, U_VIEW, Uniform, Viewer,
    ViewerConfig, ViewerEvent, ViewerMsg,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CUBE_FACES: [[u32; 3]; 12] = [
    [0, 2, 1],
    [0, 3, 2],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [3, 7, 6],
    [3, 6, 2],
    [0, 4, 7],
    [0, 7, 3],
    [1, 2, 6],
    [1, 6, 5],
];

/// Writes an axis-aligned box gamut and returns its path.
fn write_box(dir: &Path, name: &str, min: Vec3, max: Vec3) -> PathBuf {
    let corners = [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, max.y, max.z),
        Vec3::new(min.x, max.y, max.z),
    ];
    let mut text = format!("DESCRIPTOR \"{name}\"\nBEGIN_DATA\n");
    for (i, c) in corners.iter().enumerate() {
        text.push_str(&format!("{i} {} {} {}\n", c.x, c.y, c.z));
    }
    text.push_str("END_DATA\nBEGIN_DATA\n");
    for [a, b, c] in CUBE_FACES {
        text.push_str(&format!("{a} {b} {c}\n"));
    }
    text.push_str("END_DATA\n");

    let path = dir.join(format!("{name}.gam"));
    std::fs::write(&path, text).unwrap();
    path
}

struct Fixture {
    _dir: TempDir,
    viewer: Viewer,
    backend: RecordingBackend,
    a: MeshHandle,
    b: MeshHandle,
    far: MeshHandle,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let pa = write_box(dir.path(), "a", Vec3::new(25.0, -25.0, -25.0), Vec3::new(75.0, 25.0, 25.0));
    let pb = write_box(dir.path(), "b", Vec3::new(50.0, 0.0, 0.0), Vec3::new(100.0, 50.0, 50.0));
    let pf = write_box(dir.path(), "far", Vec3::splat(500.0), Vec3::splat(510.0));

    let mut viewer = Viewer::new(ViewerConfig::default());
    let mut backend = RecordingBackend::new();
    viewer.handle(ViewerMsg::Resize(Vec2::new(800.0, 600.0)), &mut backend);

    let mut load = |path: PathBuf| match viewer.handle(ViewerMsg::LoadGamut(path), &mut backend) {
        Some(ViewerEvent::GamutLoaded { handle, .. }) => handle,
        other => panic!("load failed: {other:?}"),
    };
    let (a, b, far) = (load(pa), load(pb), load(pf));

    Fixture {
        _dir: dir,
        viewer,
        backend,
        a,
        b,
        far,
    }
}

// ============================================================================
// Loading and Drawing
// ============================================================================

#[test]
fn test_load_uploads_buffers() {
    let f = fixture();
    assert_eq!(f.viewer.arena().len(), 3);
    assert_eq!(f.backend.live_buffers(), 9);
    assert!(f.viewer.source(f.a).unwrap().ends_with("a.gam"));
}

#[test]
fn test_failed_load_is_skipped() {
    let mut f = fixture();
    let event = f
        .viewer
        .handle(ViewerMsg::LoadGamut("/nonexistent/x.gam".into()), &mut f.backend);
    assert!(matches!(event, Some(ViewerEvent::LoadFailed { .. })));
    assert_eq!(f.viewer.arena().len(), 3);
}

#[test]
fn test_draw_visible_meshes() {
    let mut f = fixture();
    f.viewer.handle(
        ViewerMsg::SetActive {
            handle: f.far,
            active: false,
        },
        &mut f.backend,
    );
    f.viewer.handle(
        ViewerMsg::SetWireframe {
            handle: f.b,
            wireframe: true,
        },
        &mut f.backend,
    );
    f.backend.clear_calls();
    f.viewer.frame(0.016, &mut f.backend);

    let draws: Vec<_> = f.backend.draws().copied().collect();
    assert_eq!(draws.len(), 2);
    assert!(draws.iter().all(|d| d.buffers.index_count == 36));
    assert_eq!(draws.iter().filter(|d| d.wireframe).count(), 1);
    assert!(matches!(f.backend.uniform(U_VIEW), Some(Uniform::Mat4(_))));
}

#[test]
fn test_transparent_drawn_last() {
    let mut f = fixture();
    f.viewer
        .handle(ViewerMsg::SetTransparent(Some(f.a)), &mut f.backend);
    f.viewer
        .handle(ViewerMsg::SetTransparent(Some(f.b)), &mut f.backend);
    assert_eq!(f.viewer.arena().transparent(), Some(f.b));

    f.backend.clear_calls();
    f.viewer.draw(&mut f.backend);
    let draws: Vec<_> = f.backend.draws().copied().collect();
    assert_eq!(draws.iter().filter(|d| d.transparent).count(), 1);
    assert!(draws.last().unwrap().transparent);
    assert_eq!(
        f.backend.uniform(U_ALPHA),
        Some(Uniform::Float(f.viewer.config().transparent_alpha))
    );
}

#[test]
fn test_remove_releases_buffers() {
    let mut f = fixture();
    let event = f.viewer.handle(ViewerMsg::RemoveMesh(f.a), &mut f.backend);
    assert_eq!(event, Some(ViewerEvent::MeshRemoved(f.a)));
    assert_eq!(f.backend.live_buffers(), 6);

    let again = f.viewer.handle(ViewerMsg::RemoveMesh(f.a), &mut f.backend);
    assert!(matches!(again, Some(ViewerEvent::Error(_))));
    let stale = f.viewer.handle(
        ViewerMsg::SetActive {
            handle: f.a,
            active: true,
        },
        &mut f.backend,
    );
    assert!(matches!(stale, Some(ViewerEvent::Error(_))));
}

// ============================================================================
// Booleans
// ============================================================================

#[test]
fn test_boolean_result_is_cached() {
    let mut f = fixture();
    let msg = ViewerMsg::ComputeBoolean {
        a: f.a,
        b: f.b,
        op: BooleanOp::Intersection,
    };
    let first = match f.viewer.handle(msg.clone(), &mut f.backend) {
        Some(ViewerEvent::BooleanReady { handle, .. }) => handle,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(f.viewer.arena().len(), 4);

    let bounds = f.viewer.arena().get(first).unwrap().bounds();
    assert!((bounds.min - Vec3::new(50.0, 0.0, 0.0)).abs().max_element() < 1e-3);
    assert!((bounds.max - Vec3::new(75.0, 25.0, 25.0)).abs().max_element() < 1e-3);

    let second = f.viewer.handle(msg, &mut f.backend);
    assert_eq!(
        second,
        Some(ViewerEvent::BooleanReady {
            handle: first,
            op: BooleanOp::Intersection
        })
    );
    assert_eq!(f.viewer.arena().len(), 4);
}

#[test]
fn test_boolean_failure_not_retried() {
    let mut f = fixture();
    let msg = ViewerMsg::ComputeBoolean {
        a: f.a,
        b: f.far,
        op: BooleanOp::Intersection,
    };
    for _ in 0..2 {
        let event = f.viewer.handle(msg.clone(), &mut f.backend);
        assert_eq!(
            event,
            Some(ViewerEvent::BooleanFailed {
                op: BooleanOp::Intersection,
                error: BooleanError::EmptyResult
            })
        );
    }
    let ia = f.viewer.arena().get(f.a).unwrap().id();
    let ifar = f.viewer.arena().get(f.far).unwrap().id();
    assert_eq!(
        f.viewer.boolean_outcome(ia, ifar, BooleanOp::Intersection),
        Some(&BooleanOutcome::Failed(BooleanError::EmptyResult))
    );
    assert_eq!(f.viewer.arena().len(), 3);

    // dropping an operand forgets the pair
    f.viewer.handle(ViewerMsg::RemoveMesh(f.far), &mut f.backend);
    assert!(f.viewer.boolean_outcome(ia, ifar, BooleanOp::Intersection).is_none());
}

// ============================================================================
// Camera Input
// ============================================================================

#[test]
fn test_orbit_drag_keeps_distance() {
    let mut f = fixture();
    let target = f.viewer.control().orbit_target();
    let before = f.viewer.camera().pos;

    f.viewer
        .handle(ViewerMsg::DragStart(Vec2::new(400.0, 300.0)), &mut f.backend);
    f.viewer
        .handle(ViewerMsg::Drag(Vec2::new(450.0, 330.0)), &mut f.backend);
    f.viewer.update(0.016);
    f.viewer.handle(ViewerMsg::DragEnd, &mut f.backend);
    f.viewer.update(0.016);

    let cam = f.viewer.camera();
    assert!(cam.pos.distance(before) > 1.0);
    assert!((cam.pos.distance(target) - f.viewer.config().orbit_distance).abs() < 1e-2);
}

#[test]
fn test_scroll_zooms_in() {
    let mut f = fixture();
    let d0 = f.viewer.control().orbit_dist();
    f.viewer.handle(ViewerMsg::Scroll(2.0), &mut f.backend);
    f.viewer.update(0.016);
    assert!(f.viewer.control().orbit_dist() < d0);
    assert!(f.viewer.camera().zoom > 1.0);
}

#[test]
fn test_fly_keyboard_moves() {
    let mut f = fixture();
    f.viewer.handle(ViewerMsg::SetMode(Mode::Fly), &mut f.backend);
    let before = f.viewer.camera().pos;
    f.viewer
        .handle(ViewerMsg::KeyMove(Vec2::new(0.0, 1.0)), &mut f.backend);
    f.viewer.update(0.5);
    let moved = f.viewer.camera().pos - before;
    // looking down -Z toward the target
    assert!(moved.z < -1.0, "{moved:?}");
}

#[test]
fn test_ortho_view_switches_projection() {
    let mut f = fixture();
    f.viewer
        .handle(ViewerMsg::SetOrthoView(OrthoView::Top), &mut f.backend);
    f.viewer.update(0.016);
    let cam = f.viewer.camera();
    assert_eq!(cam.projection, Projection::Orthographic);
    let up = (cam.pos - cam.target).normalize();
    assert!(up.y > 0.99, "{up:?}");
}

#[test]
fn test_pick_front_face() {
    let mut f = fixture();
    f.viewer.handle(
        ViewerMsg::SetActive {
            handle: f.b,
            active: false,
        },
        &mut f.backend,
    );
    let event = f
        .viewer
        .handle(ViewerMsg::Pick(Vec2::new(400.0, 300.0)), &mut f.backend);
    match event {
        Some(ViewerEvent::Picked {
            hit: Some((handle, point)),
        }) => {
            assert_eq!(handle, f.a);
            assert!((point - Vec3::new(50.0, 0.0, 25.0)).abs().max_element() < 1e-2, "{point:?}");
        }
        other => panic!("unexpected {other:?}"),
    }
}

// ============================================================================
// Blend and Persistence
// ============================================================================

#[test]
fn test_colorspace_blend_uniform() {
    let mut f = fixture();
    f.viewer.handle(ViewerMsg::SwitchColorspace, &mut f.backend);
    f.viewer.frame(0.5, &mut f.backend);
    match f.backend.uniform(U_BLEND) {
        Some(Uniform::Float(v)) => assert!((v - 0.5).abs() < 1e-5),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_persistence_restores_session() {
    let mut f = fixture();
    f.viewer.handle(ViewerMsg::Scroll(1.0), &mut f.backend);
    f.viewer.update(0.016);
    let saved = f.viewer.persistence();
    assert_eq!(saved.last_files.len(), 3);
    assert_eq!(saved.mode, Mode::Orbit);

    let mut backend = RecordingBackend::new();
    let mut restored = Viewer::new(ViewerConfig::default());
    let events = restored.restore(&saved, &mut backend);
    assert_eq!(events.len(), 3);
    assert_eq!(restored.arena().len(), 3);
    assert!((restored.control().orbit_dist() - saved.orbit_distance).abs() < 1e-3);
}
