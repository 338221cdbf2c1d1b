//! Shader fixtures for unit tests.

use meshpick_core::{Billboard, Mesh, PrimitiveTopology, Scene};

use crate::shader::{ShaderBuilder, ShaderSource};

/// Pick shader declaring exactly the uniforms each feature needs.
///
/// Cylindrical billboards emit an `#error` so tests can provoke compile
/// failures through an ordinary mesh setting.
pub(crate) fn pick_shader(scene: &Scene, mesh: &Mesh) -> ShaderSource {
    let geometry = mesh.geometry();
    let clipping = !scene.clips.is_empty();

    let mut builder = ShaderBuilder::new()
        .with_label("pick")
        .vertex("attribute vec3 position;")
        .vertex_if(geometry.is_quantized(), "uniform mat4 positionsDecodeMatrix;")
        .vertex("uniform mat4 modelMatrix;")
        .vertex("uniform mat4 viewMatrix;")
        .vertex("uniform mat4 projMatrix;")
        .vertex_if(
            geometry.primitive == PrimitiveTopology::Points,
            "uniform float pointSize;",
        )
        .vertex_if(
            mesh.billboard == Billboard::Cylindrical,
            "#error cylindrical billboards are not supported",
        )
        .vertex("void main() { gl_Position = projMatrix * viewMatrix * modelMatrix * vec4(position, 1.0); }")
        .fragment_if(clipping, "uniform bool clippable;");

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
