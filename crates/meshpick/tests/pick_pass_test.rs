//! End-to-end pick pass tests on the recording device.

mod common;

use std::rc::Rc;

use common::{quad, renderer};
use meshpick::*;

#[test]
fn test_identical_configurations_share_a_program() {
    let mut renderer = renderer();
    let scene = Scene::new(SurfaceId(1));
    let material = Rc::new(MaterialState::new());
    let meshes: Vec<Mesh> = (0..3)
        .map(|i| {
            let geometry = quad(renderer.device_mut());
            Mesh::new(geometry, Rc::clone(&material)).with_pick_id(i)
        })
        .collect();

    let handles: Vec<_> = meshes
        .iter()
        .map(|mesh| renderer.acquire(&scene, mesh).unwrap())
        .collect();

    assert!(handles.iter().all(|h| h.same_entry(&handles[0])));
    assert_eq!(handles[0].use_count(), 3);
    assert_eq!(renderer.pool().len(), 1);
    assert_eq!(renderer.device().compile_count(), 1);

    for handle in handles {
        renderer.release(handle).unwrap();
    }
    assert!(renderer.pool().is_empty());
}

#[test]
fn test_release_all_destroys_once_then_recompiles() {
    let mut renderer = renderer();
    let scene = Scene::new(SurfaceId(1));
    let geometry = quad(renderer.device_mut());
    let mesh = Mesh::new(geometry, Rc::new(MaterialState::new()));

    let a = renderer.acquire(&scene, &mesh).unwrap();
    let b = renderer.acquire(&scene, &mesh).unwrap();
    let program = a.program_id().unwrap();

    assert!(!renderer.release(a).unwrap());
    assert!(renderer.release(b).unwrap());
    assert_eq!(renderer.device().destroyed_programs(), [program]);
    assert!(!renderer.device().is_live(program));

    let fresh = renderer.acquire(&scene, &mesh).unwrap();
    assert_ne!(fresh.program_id(), Some(program));
    assert_eq!(fresh.use_count(), 1);
    assert_eq!(renderer.device().compile_count(), 2);
    assert_eq!(renderer.device().destroyed_programs().len(), 1);
}

#[test]
fn test_pick_color_channels_carry_id_bytes() {
    let mut renderer = renderer();
    let scene = Scene::new(SurfaceId(1));
    let geometry = quad(renderer.device_mut());
    let mesh = Mesh::new(geometry, Rc::new(MaterialState::new())).with_pick_id(0x1A2B_3C4D);
    let handle = renderer.acquire(&scene, &mesh).unwrap();

    renderer
        .draw_pass(&scene, PickFrame::new(), &[(&handle, &mesh)])
        .unwrap();

    let expected = Vec4::new(
        f32::from(0x4Du8) / 255.0,
        f32::from(0x3Cu8) / 255.0,
        f32::from(0x2Bu8) / 255.0,
        f32::from(0x1Au8) / 255.0,
    );
    let Some(UniformValue::Vec4(color)) = renderer.device().last_uniform("pickColor") else {
        panic!("pickColor was not uploaded");
    };
    assert!(color.abs_diff_eq(expected, 1e-6));
    assert_eq!(pick_id_from_color(color), 0x1A2B_3C4D);
}

#[test]
fn test_consecutive_draws_send_only_per_draw_state() {
    let mut renderer = renderer();
    let scene = Scene::new(SurfaceId(1));
    let geometry = quad(renderer.device_mut());
    let material = Rc::new(MaterialState::new());
    let first = Mesh::new(Rc::clone(&geometry), Rc::clone(&material)).with_pick_id(1);
    let second = Mesh::new(geometry, material)
        .with_pick_id(2)
        .with_world_matrix(Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)));
    let a = renderer.acquire(&scene, &first).unwrap();
    let b = renderer.acquire(&scene, &second).unwrap();

    let counters = renderer
        .draw_pass(&scene, PickFrame::new(), &[(&a, &first), (&b, &second)])
        .unwrap();

    let commands = renderer.device_mut().take_commands();
    let first_draw = commands.iter().position(DeviceCommand::is_draw).unwrap();
    let tail = &commands[first_draw + 1..];
    assert_eq!(tail.len(), 3);
    assert_eq!(
        renderer.device().uniform_uploads(tail),
        ["modelMatrix", "pickColor"]
    );
    assert!(tail[2].is_draw());
    assert_eq!(
        counters,
        FrameCounters {
            use_program: 1,
            bind_array: 2,
            draw_elements: 2,
            draw_arrays: 0,
        }
    );
    assert!(renderer.device().misuse().is_empty());
}

#[test]
fn test_interleaved_configurations_switch_programs() {
    let mut renderer = renderer();
    let scene = Scene::new(SurfaceId(1));
    let geometry = quad(renderer.device_mut());
    let material = Rc::new(MaterialState::new());
    let plain = Mesh::new(geometry, material).with_pick_id(1);
    let mut stationary = plain.clone().with_pick_id(2);
    stationary.stationary = true;
    let a = renderer.acquire(&scene, &plain).unwrap();
    let b = renderer.acquire(&scene, &stationary).unwrap();
    assert!(!a.same_entry(&b));

    let counters = renderer
        .draw_pass(
            &scene,
            PickFrame::new(),
            &[(&a, &plain), (&b, &stationary), (&a, &plain)],
        )
        .unwrap();

    assert_eq!(counters.use_program, 3);
    // Every switch forgets the geometry binding.
    assert_eq!(counters.bind_array, 6);
    assert_eq!(counters.draw_elements, 3);
    assert!(renderer.device().misuse().is_empty());
}

#[test]
fn test_clip_planes_reach_the_program() {
    let mut renderer = renderer();
    let mut scene = Scene::new(SurfaceId(1));
    scene.clips.add(ClipPlane::new(Vec3::ZERO, Vec3::X));
    let mut inactive = ClipPlane::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
    inactive.set_active(false);
    scene.clips.add(inactive);

    let geometry = quad(renderer.device_mut());
    let mut mesh = Mesh::new(geometry, Rc::new(MaterialState::new()));
    mesh.clippable = false;
    let handle = renderer.acquire(&scene, &mesh).unwrap();
    renderer
        .draw_pass(&scene, PickFrame::new(), &[(&handle, &mesh)])
        .unwrap();

    let device = renderer.device();
    assert_eq!(device.last_uniform("clipActive0"), Some(UniformValue::Int(1)));
    assert_eq!(device.last_uniform("clipActive1"), Some(UniformValue::Int(0)));
    assert_eq!(device.last_uniform("clipDir0"), Some(UniformValue::Vec3(Vec3::X)));
    assert_eq!(
        device.last_uniform("clipPos1"),
        Some(UniformValue::Vec3(Vec3::new(0.0, 1.0, 0.0)))
    );
    assert_eq!(device.last_uniform("clippable"), Some(UniformValue::Int(0)));
}

#[test]
fn test_clip_count_change_selects_a_new_program() {
    let mut renderer = renderer();
    let mut scene = Scene::new(SurfaceId(1));
    let geometry = quad(renderer.device_mut());
    let mesh = Mesh::new(geometry, Rc::new(MaterialState::new()));

    let unclipped = renderer.acquire(&scene, &mesh).unwrap();
    scene.clips.add(ClipPlane::default());
    let clipped = renderer.acquire(&scene, &mesh).unwrap();

    assert!(!unclipped.same_entry(&clipped));
    assert_eq!(renderer.pool().len(), 2);
    assert_ne!(unclipped.signature(), clipped.signature());
}

#[test]
fn test_device_loss_recompiles_on_next_draw() {
    let mut renderer = renderer();
    let scene = Scene::new(SurfaceId(1));
    let geometry = quad(renderer.device_mut());
    let mesh = Mesh::new(geometry, Rc::new(MaterialState::new())).with_pick_id(9);
    let handle = renderer.acquire(&scene, &mesh).unwrap();
    let before = handle.program_id().unwrap();

    renderer.device_mut().lose_context();
    renderer.device_lost();
    assert!(!handle.is_allocated());
    assert_eq!(handle.use_count(), 1);

    renderer.device_mut().take_commands();
    renderer
        .draw_pass(&scene, PickFrame::new(), &[(&handle, &mesh)])
        .unwrap();

    let after = handle.program_id().unwrap();
    assert_ne!(before, after);
    assert!(renderer.device().is_live(after));
    assert_eq!(renderer.device().compile_count(), 2);
    assert!(renderer.device().destroyed_programs().is_empty());
    assert_eq!(
        renderer.device().last_uniform("pickColor"),
        Some(UniformValue::Vec4(pick_color(9)))
    );
    assert!(renderer.device().misuse().is_empty());
}

#[test]
fn test_invalid_shader_registers_nothing() {
    let mut renderer = renderer();
    let scene = Scene::new(SurfaceId(1));
    let geometry = quad(renderer.device_mut());
    let material = Rc::new(MaterialState::new());
    let mut broken = Mesh::new(Rc::clone(&geometry), Rc::clone(&material));
    broken.billboard = Billboard::Cylindrical;

    let err = renderer.acquire(&scene, &broken).unwrap_err();
    assert!(matches!(err, MeshPickError::ShaderCompileFailed { .. }));
    let diagnostics = err.diagnostics().unwrap();
    assert!(!diagnostics.is_empty());
    assert!(diagnostics.iter().any(|line| line.contains("unsupported billboard mode")));
    assert!(renderer.pool().is_empty());
    assert_eq!(renderer.device().live_programs(), 0);

    let valid = Mesh::new(geometry, material);
    let handle = renderer.acquire(&scene, &valid).unwrap();
    assert_eq!(handle.use_count(), 1);
    assert_eq!(renderer.pool().len(), 1);
}

#[test]
fn test_renamed_uniforms_from_options() {
    let options = PickOptions::from_json(
        r#"{ "uniform_names": { "pick_color": "u_pickId" }, "log_compile_failures": false }"#,
    )
    .unwrap();
    let shader = |_: &Scene, _: &Mesh| {
        ShaderBuilder::new()
            .vertex("attribute vec3 position;")
            .vertex("uniform mat4 modelMatrix;")
            .vertex("void main() {}")
            .fragment("uniform vec4 u_pickId;")
            .fragment("void main() {}")
            .build()
    };
    let mut renderer = PickRenderer::with_options(RecordingDevice::new(), shader, options);
    let scene = Scene::new(SurfaceId(1));
    let geometry = quad(renderer.device_mut());
    let mesh = Mesh::new(geometry, Rc::new(MaterialState::new())).with_pick_id(5);
    let handle = renderer.acquire(&scene, &mesh).unwrap();

    renderer
        .draw_pass(&scene, PickFrame::new(), &[(&handle, &mesh)])
        .unwrap();

    assert_eq!(
        renderer.device().last_uniform("u_pickId"),
        Some(UniformValue::Vec4(pick_color(5)))
    );
    assert_eq!(renderer.device().last_uniform("pickColor"), None);
}

#[test]
fn test_shutdown_releases_outstanding_programs() {
    let mut renderer = renderer();
    let scene = Scene::new(SurfaceId(1));
    let geometry = quad(renderer.device_mut());
    let mesh = Mesh::new(geometry, Rc::new(MaterialState::new()));
    let handle = renderer.acquire(&scene, &mesh).unwrap();
    let program = handle.program_id().unwrap();

    let device = renderer.shutdown();

    assert_eq!(device.destroyed_programs(), [program]);
    assert!(!handle.is_allocated());
}
