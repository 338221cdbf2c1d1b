//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use meshpick::*;

/// Pick shader generator that declares only what each mesh configuration
/// needs. Cylindrical billboards produce an `#error` directive.
pub fn pick_shader(scene: &Scene, mesh: &Mesh) -> ShaderSource {
    let geometry = mesh.geometry();
    let mut builder = ShaderBuilder::new()
        .with_label("pick")
        .vertex("attribute vec3 position;")
        .vertex_if(geometry.is_quantized(), "uniform mat4 positionsDecodeMatrix;")
        .vertex("uniform mat4 modelMatrix;")
        .vertex("uniform mat4 viewMatrix;")
        .vertex("uniform mat4 projMatrix;")
        .vertex_if(
            mesh.billboard == Billboard::Cylindrical,
            "#error unsupported billboard mode",
        )
        .vertex("void main() {}")
        .fragment_if(!scene.clips.is_empty(), "uniform bool clippable;");
    for slot in 0..scene.clips.len() {
        builder = builder
            .fragment(format!("uniform bool clipActive{slot};"))
            .fragment(format!("uniform vec3 clipPos{slot};"))
            .fragment(format!("uniform vec3 clipDir{slot};"));
    }
    builder
        .fragment("uniform vec4 pickColor;")
        .fragment("void main() {}")
        .build()
}

pub fn renderer() -> PickRenderer<RecordingDevice> {
    PickRenderer::with_options(
        RecordingDevice::new(),
        pick_shader,
        PickOptions {
            log_compile_failures: false,
            ..PickOptions::default()
        },
    )
}

/// An indexed triangle geometry with fresh buffers.
pub fn quad(device: &mut RecordingDevice) -> Rc<GeometryState> {
    let positions = device.create_buffer();
    let indices = device.create_buffer();
    Rc::new(
        GeometryState::new(PrimitiveTopology::Triangles)
            .with_positions(positions, 4)
            .with_indices(indices, 6, IndexType::U16),
    )
}
