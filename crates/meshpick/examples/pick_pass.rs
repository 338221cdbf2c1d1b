//! Runs a pick pass on the recording device and prints what it sends.
//!
//! Run with `RUST_LOG=debug cargo run --example pick_pass` to see the pool
//! compile, share and evict programs.

use std::rc::Rc;

use meshpick::*;

fn pick_shader(scene: &Scene, mesh: &Mesh) -> ShaderSource {
    let mut builder = ShaderBuilder::new()
        .with_label("pick")
        .vertex("attribute vec3 position;")
        .vertex_if(mesh.geometry().is_quantized(), "uniform mat4 positionsDecodeMatrix;")
        .vertex("uniform mat4 modelMatrix;")
        .vertex("uniform mat4 viewMatrix;")
        .vertex("uniform mat4 projMatrix;")
        .vertex("void main() { gl_Position = projMatrix * viewMatrix * modelMatrix * vec4(position, 1.0); }")
        .fragment_if(!scene.clips.is_empty(), "uniform bool clippable;");
    for slot in 0..scene.clips.len() {
        builder = builder
            .fragment(format!("uniform bool clipActive{slot};"))
            .fragment(format!("uniform vec3 clipPos{slot};"))
            .fragment(format!("uniform vec3 clipDir{slot};"));
    }
    builder
        .fragment("uniform vec4 pickColor;")
        .fragment("void main() { gl_FragColor = pickColor; }")
        .build()
}

fn main() -> Result<()> {
    env_logger::init();

    let mut renderer = PickRenderer::new(RecordingDevice::new(), pick_shader);

    let mut scene = Scene::new(SurfaceId(1));
    scene.camera = Camera::look_at(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO, Vec3::Y, 0.8, 16.0 / 9.0);
    scene.clips.add(ClipPlane::new(Vec3::ZERO, Vec3::NEG_X));

    let device = renderer.device_mut();
    let cube = Rc::new(
        GeometryState::new(PrimitiveTopology::Triangles)
            .with_positions(device.create_buffer(), 8)
            .with_indices(device.create_buffer(), 36, IndexType::U16),
    );
    let quantized = Rc::new(
        GeometryState::new(PrimitiveTopology::Triangles)
            .with_positions(device.create_buffer(), 4)
            .with_indices(device.create_buffer(), 6, IndexType::U8)
            .with_decode_matrix(Mat4::from_scale(Vec3::splat(1.0 / 65535.0))),
    );
    let material = Rc::new(MaterialState::new());

    let meshes: Vec<Mesh> = (0..4u8)
        .map(|i| {
            let geometry = if i < 3 { &cube } else { &quantized };
            Mesh::new(Rc::clone(geometry), Rc::clone(&material))
                .with_pick_id(u32::from(i) + 1)
                .with_world_matrix(Mat4::from_translation(Vec3::new(f32::from(i) * 2.0, 0.0, 0.0)))
        })
        .collect();

    let handles = meshes
        .iter()
        .map(|mesh| renderer.acquire(&scene, mesh))
        .collect::<Result<Vec<_>>>()?;
    println!("{} meshes share {} programs", meshes.len(), renderer.pool().len());
    for signature in renderer.pool().signatures() {
        println!("  {signature}: {} users", renderer.pool().use_count(signature));
    }

    let draws: Vec<_> = handles.iter().zip(&meshes).collect();
    let counters = renderer.draw_pass(&scene, PickFrame::new(), &draws)?;
    println!("{counters:?}");
    println!("{} device commands issued", renderer.device().commands().len());

    // A pixel read back from the pick target under the third cube.
    let pixel = pick_rgba8(3);
    println!("pixel {pixel:?} picks mesh {}", pick_id_from_rgba8(pixel));

    for handle in handles {
        renderer.release(handle)?;
    }
    let device = renderer.shutdown();
    println!(
        "{} programs compiled, {} destroyed",
        device.compile_count(),
        device.destroyed_programs().len()
    );
    Ok(())
}
