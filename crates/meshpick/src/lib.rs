//! meshpick: shared pick-pass shader programs for 3D scenes.
//!
//! Meshes are drawn into an offscreen pick buffer with their pick identifier
//! encoded as a color. Meshes with the same compile-time configuration share
//! one compiled program, and consecutive draws only send the device state that
//! changed.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::rc::Rc;
//! use meshpick::*;
//!
//! fn shader(_scene: &Scene, _mesh: &Mesh) -> ShaderSource {
//!     ShaderBuilder::new()
//!         .vertex("attribute vec3 position;")
//!         .vertex("void main() {}")
//!         .fragment("uniform vec4 pickColor;")
//!         .fragment("void main() {}")
//!         .build()
//! }
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!     let mut renderer = PickRenderer::new(RecordingDevice::new(), shader);
//!     let buffer = renderer.device_mut().create_buffer();
//!     let geometry = Rc::new(
//!         GeometryState::new(PrimitiveTopology::Triangles).with_positions(buffer, 3),
//!     );
//!     let mesh = Mesh::new(geometry, Rc::new(MaterialState::new())).with_pick_id(42);
//!     let scene = Scene::new(SurfaceId(1));
//!
//!     let handle = renderer.acquire(&scene, &mesh)?;
//!     renderer.draw_pass(&scene, PickFrame::new(), &[(&handle, &mesh)])?;
//!     renderer.release(handle)?;
//!     renderer.shutdown();
//!     Ok(())
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod renderer;

pub use renderer::PickRenderer;

// Re-export core types
pub use meshpick_core::{
    pick_color, pick_id_from_color, pick_id_from_rgba8, pick_rgba8, stats, Billboard, BufferId,
    Camera, ClipPlane, ClipState, FrontFace, GeometryState, IndexBuffer, IndexType,
    MaterialState, Mat4, Mesh, MeshPickError, PickOptions, PrimitiveTopology, Result, Scene,
    StateId, SurfaceId, UniformNames, Vec3, Vec4, VertexBuffer,
};

// Re-export render types
pub use meshpick_render::{
    AttributeLocation, DeviceCommand, FrameCounters, GraphicsDevice, PickFrame,
    PickProgramHandle, PickShaderSource, ProgramId, ProgramPool, ProgramSignature,
    RecordingDevice, ShaderBuilder, ShaderSource, UniformLocation, UniformValue,
    VertexElementType,
};

/// Initializes `env_logger` from `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
