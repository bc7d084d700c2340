//! Viewport & Registry Tests
//!
//! Tests for:
//! - Registry initialization: insertion order, missing surfaces skipped
//! - Resize: hidden surfaces, zero sizes, aspect ratio
//! - Mesh attachment: centering, scale, default material, independence
//! - Render loop: one draw per viewport per tick, degraded viewports keep rendering

mod common;

use std::sync::Arc;

use glam::Vec3;
use vitrine::assets::{AssetCache, MeshHandle, TextureHandle, TexturePalette};
use vitrine::render_loop::RenderLoop;
use vitrine::resources::{Color, Texture};
use vitrine::viewport::{ControlConfig, ResizeOutcome};
use vitrine::{AssetError, Error, PointerButton, ViewportRegistry, ViewportRole, ViewportSpec};

use common::{InMemorySurfaces, ScriptedLoader, off_center_rug};

fn gallery_spec(id: &str, texture: Option<usize>) -> ViewportSpec {
    ViewportSpec {
        initial_texture: texture,
        controls: ControlConfig {
            min_distance: 1.5,
            max_distance: 6.0,
            ..ControlConfig::default()
        },
        ..ViewportSpec::new(id)
    }
}

fn palette() -> TexturePalette {
    TexturePalette::new(
        ["a.png", "b.png"]
            .into_iter()
            .map(|uri| TextureHandle::ready(uri, Texture::from_rgba8(uri, 1, 1, vec![0; 4])))
            .collect(),
    )
}

fn ready_mesh() -> MeshHandle {
    MeshHandle::ready("rug.json", off_center_rug())
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn missing_surfaces_are_skipped_not_fatal() {
    common::init_logger();
    let mut surfaces = InMemorySurfaces::new();
    surfaces.add("one", 100, 100);
    surfaces.add("three", 100, 100);

    let specs = [gallery_spec("one", None), gallery_spec("two", None), gallery_spec("three", None)];
    let mut registry = ViewportRegistry::new();
    let report = registry.initialize(&specs, &mut surfaces);

    assert_eq!(report.created.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert!(matches!(
        &report.skipped[0],
        Error::MissingSurface { surface_id } if surface_id == "two"
    ));

    let names: Vec<&str> = registry.iter().map(|v| v.name()).collect();
    assert_eq!(names, vec!["one", "three"]);
    assert!(registry.by_name("two").is_none());
}

#[test]
fn for_each_visits_in_insertion_order() {
    let mut surfaces = InMemorySurfaces::new();
    let ids = ["d", "b", "c", "a"];
    for id in ids {
        surfaces.add(id, 10, 10);
    }
    let specs: Vec<_> = ids.iter().map(|id| gallery_spec(id, None)).collect();

    let mut registry = ViewportRegistry::new();
    registry.initialize(&specs, &mut surfaces);

    let mut visited = Vec::new();
    registry.for_each(|v| visited.push(v.name().to_owned()));
    assert_eq!(visited, ids);
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn visible_surface_is_sized_at_creation() {
    let mut surfaces = InMemorySurfaces::new();
    let log = surfaces.add("wide", 800, 400);

    let mut registry = ViewportRegistry::new();
    registry.initialize(&[gallery_spec("wide", None)], &mut surfaces);

    let viewport = registry.by_name("wide").unwrap();
    assert_eq!(viewport.size(), (800, 400));
    assert!((viewport.camera.aspect - 2.0).abs() < 1e-6);
    assert_eq!(log.borrow().set_sizes, vec![(800, 400)]);
}

#[test]
fn zero_size_resize_leaves_state_intact() {
    let mut surfaces = InMemorySurfaces::new();
    surfaces.add("tile", 300, 200);

    let mut registry = ViewportRegistry::new();
    registry.initialize(&[gallery_spec("tile", None)], &mut surfaces);
    let viewport = registry.by_name_mut("tile").unwrap();
    let projection = viewport.camera.projection_matrix();

    for (w, h) in [(0, 0), (0, 200), (300, 0)] {
        let err = viewport.resize(w, h).unwrap_err();
        assert!(matches!(err, Error::ZeroSizeSurface { width, height, .. } if width == w && height == h));
    }

    assert_eq!(viewport.size(), (300, 200));
    assert_eq!(viewport.camera.projection_matrix(), projection);
    assert!(viewport.camera.aspect.is_finite());
    assert_eq!(viewport.resize(300, 200).unwrap(), ResizeOutcome::Unchanged);
}

#[test]
fn hidden_surface_picks_up_size_once_shown() {
    let mut surfaces = InMemorySurfaces::new();
    let log = surfaces.add("hidden", 0, 0);

    let mut registry = ViewportRegistry::new();
    registry.initialize(&[gallery_spec("hidden", None)], &mut surfaces);

    let viewport = registry.by_name("hidden").unwrap();
    assert_eq!(viewport.size(), (0, 0));
    assert!(viewport.camera.aspect.is_finite() && viewport.camera.aspect > 0.0);
    assert!(log.borrow().set_sizes.is_empty());

    let report = registry.resize_all();
    assert!(report.resized.is_empty());
    assert_eq!(report.skipped.len(), 1);

    log.borrow_mut().client_size = (400, 300);
    let report = registry.resize_all();
    assert_eq!(report.resized.len(), 1);
    assert!(report.skipped.is_empty());

    let viewport = registry.by_name("hidden").unwrap();
    assert!((viewport.camera.aspect - 4.0 / 3.0).abs() < 1e-6);
    assert_eq!(log.borrow().set_sizes, vec![(400, 300)]);
}

// ============================================================================
// Attachment
// ============================================================================

#[test]
fn attached_mesh_is_centered_before_scaling() {
    let mut surfaces = InMemorySurfaces::new();
    surfaces.add("big", 100, 100);
    surfaces.add("small", 100, 100);

    let specs = [
        ViewportSpec {
            scale: 3.0,
            role: ViewportRole::Primary,
            ..ViewportSpec::new("big")
        },
        ViewportSpec::new("small"),
    ];
    let mut registry = ViewportRegistry::new();
    registry.initialize(&specs, &mut surfaces);
    assert_eq!(registry.attach_resolved(&ready_mesh(), &palette()), 2);

    let big = registry.by_name("big").unwrap().mesh().unwrap().bounding_box().unwrap();
    let small = registry.by_name("small").unwrap().mesh().unwrap().bounding_box().unwrap();

    assert!(big.center().abs_diff_eq(Vec3::ZERO, 1e-4));
    assert!(small.center().abs_diff_eq(Vec3::ZERO, 1e-4));
    assert!(big.size().abs_diff_eq(small.size() * 3.0, 1e-4));
}

#[test]
fn attach_waits_for_the_mesh_and_happens_once() {
    let (loader, release) = ScriptedLoader::new().gated_mesh("rug.json");
    let mut cache = AssetCache::new(loader);
    let mesh = cache.load_mesh("rug.json");

    let mut surfaces = InMemorySurfaces::new();
    surfaces.add("tile", 100, 100);
    let mut registry = ViewportRegistry::new();
    registry.initialize(&[gallery_spec("tile", Some(2))], &mut surfaces);

    cache.pump();
    assert_eq!(registry.attach_resolved(&mesh, &palette()), 0);
    assert!(!registry.by_name("tile").unwrap().has_mesh());

    release.send(Ok(off_center_rug())).unwrap();
    cache.pump();
    assert_eq!(registry.attach_resolved(&mesh, &palette()), 1);
    assert_eq!(registry.attach_resolved(&mesh, &palette()), 0);

    let instance = registry.by_name("tile").unwrap().mesh().unwrap();
    for surface in instance.surfaces() {
        assert_eq!(surface.material.map().unwrap().uri(), "b.png");
        assert_eq!(surface.material.color(), Color::WHITE);
    }
}

#[test]
fn viewports_without_initial_texture_get_plain_material() {
    let mut surfaces = InMemorySurfaces::new();
    surfaces.add("plain", 100, 100);
    let mut registry = ViewportRegistry::new();
    registry.initialize(&[gallery_spec("plain", None)], &mut surfaces);
    registry.attach_resolved(&ready_mesh(), &palette());

    let instance = registry.by_name("plain").unwrap().mesh().unwrap();
    assert!(instance.surfaces().iter().all(|s| !s.material.has_active_map()));
}

#[test]
fn viewports_do_not_share_mutable_state() {
    let mut surfaces = InMemorySurfaces::new();
    let names = ["home", "g1", "g2", "g3", "g4"];
    for name in names {
        surfaces.add(name, 200, 200);
    }
    let mut specs: Vec<_> = names[1..].iter().map(|n| gallery_spec(n, Some(1))).collect();
    specs.insert(
        0,
        ViewportSpec {
            role: ViewportRole::Primary,
            scale: 3.0,
            initial_texture: Some(1),
            ..ViewportSpec::new("home")
        },
    );

    let mut registry = ViewportRegistry::new();
    registry.initialize(&specs, &mut surfaces);
    registry.attach_resolved(&ready_mesh(), &palette());

    let target = registry.by_name_mut("g2").unwrap();
    target.mesh_mut().unwrap().paint(|m| m.set_flat_color(Color::from_hex(0xff0000)));
    target.mesh_mut().unwrap().transform.position = Vec3::new(5.0, 0.0, 0.0);
    target.camera.transform.position = Vec3::new(0.0, 9.0, 0.0);

    for name in names.iter().filter(|n| **n != "g2") {
        let viewport = registry.by_name(name).unwrap();
        let instance = viewport.mesh().unwrap();
        assert_eq!(instance.transform.position, Vec3::ZERO, "{name}");
        assert!(instance.surfaces().iter().all(|s| s.material.has_active_map()), "{name}");
        assert!(viewport.camera.transform.position.y < 9.0, "{name}");
    }

    // Geometry itself is shared.
    let home = registry.by_name("home").unwrap().mesh().unwrap().asset().clone();
    let g1 = registry.by_name("g1").unwrap().mesh().unwrap().asset().clone();
    assert!(Arc::ptr_eq(&home, &g1));
}

// ============================================================================
// Frame Loop
// ============================================================================

#[test]
fn render_once_issues_exactly_one_draw() {
    let mut surfaces = InMemorySurfaces::new();
    let log = surfaces.add("tile", 100, 100);
    let mut registry = ViewportRegistry::new();
    registry.initialize(&[gallery_spec("tile", None)], &mut surfaces);

    let viewport = registry.by_name_mut("tile").unwrap();
    viewport.render_once();
    assert_eq!(log.borrow().draw_count(), 1);
    assert_eq!(viewport.draw_count(), 1);
    viewport.render_once();
    assert_eq!(log.borrow().draw_count(), 2);
}

#[test]
fn failed_mesh_leaves_viewports_empty_but_rendering() {
    common::init_logger();
    let mut cache = AssetCache::new(ScriptedLoader::new().failing_mesh("rug.json"));
    let mesh = cache.load_mesh("rug.json");
    let palette = palette();

    let mut surfaces = InMemorySurfaces::new();
    let log = surfaces.add("tile", 100, 100);
    let mut spec = gallery_spec("tile", Some(1));
    spec.controls.enable_damping = false;
    let mut registry = ViewportRegistry::new();
    registry.initialize([&spec], &mut surfaces);

    let mut render_loop = RenderLoop::new();
    for _ in 0..5 {
        render_loop.tick(&mut registry, &mut cache, &mesh, &palette);
    }

    assert!(matches!(mesh.error(), Some(AssetError::Http { status: 404, .. })));
    assert!(registry.mesh_failed());
    assert_eq!(render_loop.frame_count(), 5);
    assert_eq!(log.borrow().draw_count(), 5);
    assert!(log.borrow().frames.iter().all(|f| !f.has_mesh));

    // Camera orbiting still works.
    let viewport = registry.by_name_mut("tile").unwrap();
    let before = viewport.camera.transform.position;
    let input = viewport.input_mut();
    input.handle_button(PointerButton::Primary, true);
    input.handle_cursor_move(50.0, 50.0);
    input.handle_cursor_move(80.0, 50.0);
    render_loop.tick(&mut registry, &mut cache, &mesh, &palette);
    let after = registry.by_name("tile").unwrap().camera.transform.position;
    assert!(!after.abs_diff_eq(before, 1e-6));
}

#[test]
fn dom_pointer_events_orbit_and_zoom_one_viewport() {
    let mut cache = AssetCache::new(ScriptedLoader::new());
    let mesh = ready_mesh();
    let palette = palette();

    let mut surfaces = InMemorySurfaces::new();
    surfaces.add("dragged", 100, 100);
    surfaces.add("idle", 100, 100);
    let mut dragged = gallery_spec("dragged", None);
    dragged.controls.enable_damping = false;
    let mut registry = ViewportRegistry::new();
    registry.initialize([&dragged, &gallery_spec("idle", None)], &mut surfaces);

    let mut render_loop = RenderLoop::new();
    render_loop.tick(&mut registry, &mut cache, &mesh, &palette);
    let idle_before = registry.by_name("idle").unwrap().camera.transform.position;
    let dragged_before = registry.by_name("dragged").unwrap().camera.transform.position;

    let input = registry.by_name_mut("dragged").unwrap().input_mut();
    input.handle_dom_button(0, true);
    input.handle_cursor_move(50.0, 50.0);
    input.handle_cursor_move(70.0, 50.0);
    render_loop.tick(&mut registry, &mut cache, &mesh, &palette);
    let dragged_after = registry.by_name("dragged").unwrap().camera.transform.position;
    assert!(!dragged_after.abs_diff_eq(dragged_before, 1e-6));
    assert!((dragged_after.length() - dragged_before.length()).abs() < 1e-3);

    let input = registry.by_name_mut("dragged").unwrap().input_mut();
    input.handle_dom_button(0, false);
    input.handle_dom_wheel(0.0, 100.0, 0);
    render_loop.tick(&mut registry, &mut cache, &mesh, &palette);
    let zoomed = registry.by_name("dragged").unwrap().camera.transform.position;
    assert!(zoomed.length() > dragged_after.length(), "wheel down zooms out");

    let idle_after = registry.by_name("idle").unwrap().camera.transform.position;
    assert!(idle_after.abs_diff_eq(idle_before, 1e-6));
}

#[test]
fn unvalidated_nan_bounds_keep_the_loop_running() {
    let mut cache = AssetCache::new(ScriptedLoader::new());
    let mesh = ready_mesh();
    let palette = palette();

    let mut surfaces = InMemorySurfaces::new();
    let broken_log = surfaces.add("broken", 100, 100);
    let healthy_log = surfaces.add("healthy", 100, 100);
    let mut broken = gallery_spec("broken", None);
    broken.controls.min_distance = f32::NAN;
    broken.controls.max_distance = f32::NAN;
    let mut registry = ViewportRegistry::new();
    registry.initialize([&broken, &gallery_spec("healthy", None)], &mut surfaces);

    let mut render_loop = RenderLoop::new();
    for _ in 0..3 {
        render_loop.tick(&mut registry, &mut cache, &mesh, &palette);
    }

    assert_eq!(broken_log.borrow().draw_count(), 3);
    assert_eq!(healthy_log.borrow().draw_count(), 3);
    let position = registry.by_name("broken").unwrap().camera.transform.position;
    assert!(position.is_finite());
}

#[test]
fn only_flagged_viewports_rotate() {
    let mut surfaces = InMemorySurfaces::new();
    surfaces.add("spin", 100, 100);
    surfaces.add("still", 100, 100);
    let specs = [
        ViewportSpec {
            rotate_continuously: true,
            rotation_speed: 1.0,
            ..ViewportSpec::new("spin")
        },
        ViewportSpec::new("still"),
    ];
    let mut registry = ViewportRegistry::new();
    registry.initialize(&specs, &mut surfaces);
    registry.attach_resolved(&ready_mesh(), &palette());

    registry.for_each_mut(|v| v.advance_rotation(0.5));

    let spin = registry.by_name("spin").unwrap();
    let still = registry.by_name("still").unwrap();
    assert!((spin.rotation_angle() - 0.5).abs() < 1e-6);
    assert_eq!(still.rotation_angle(), 0.0);

    // Spinning keeps the mesh centered.
    let center = spin.mesh().unwrap().bounding_box().unwrap().center();
    assert!(center.abs_diff_eq(Vec3::ZERO, 1e-4));
}
