//! The graphics device seam.
//!
//! The pick pass drives the device through a small GL-style command set:
//! program compile/destroy, location lookup by name, uniform uploads, fixed
//! function toggles, buffer binds and draw calls. Every call is synchronous.

use glam::{Mat4, Vec3, Vec4};

pub use meshpick_core::state::{BufferId, FrontFace, IndexType, PrimitiveTopology};

use crate::shader::ShaderSource;

/// Handle to a linked program owned by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

/// Handle to a uniform inside a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Handle to a vertex attribute inside a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeLocation(pub u32);

/// Component type of a bound vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexElementType {
    /// 32-bit floats.
    F32,
    /// Quantized 16-bit unsigned integers.
    U16,
}

/// A value uploaded to a uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        Self::Int(i32::from(value))
    }
}

/// Low-level graphics device used by the pick pass.
///
/// Implementations wrap a concrete API context. All calls must happen on the
/// thread that owns that context.
pub trait GraphicsDevice {
    /// Compiles and links a program.
    ///
    /// On failure returns the compiler/linker diagnostics, one message per
    /// entry.
    fn compile_program(&mut self, source: &ShaderSource) -> Result<ProgramId, Vec<String>>;

    /// Destroys a program.
    fn destroy_program(&mut self, program: ProgramId);

    /// Looks up a uniform by name. `None` if the program doesn't declare it.
    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    /// Looks up a vertex attribute by name.
    fn attribute_location(&self, program: ProgramId, name: &str) -> Option<AttributeLocation>;

    /// Makes a program current.
    fn use_program(&mut self, program: ProgramId);

    /// Uploads a uniform of the current program.
    fn set_uniform(&mut self, location: UniformLocation, value: UniformValue);

    /// Enables or disables back-face culling.
    fn set_cull_face(&mut self, enabled: bool);

    /// Sets the front-face winding order.
    fn set_front_face(&mut self, front_face: FrontFace);

    /// Sets the rasterized line width.
    fn set_line_width(&mut self, width: f32);

    /// Binds a vertex buffer to an attribute.
    fn bind_vertex_buffer(
        &mut self,
        attribute: AttributeLocation,
        buffer: BufferId,
        element_type: VertexElementType,
    );

    /// Binds an index buffer.
    fn bind_index_buffer(&mut self, buffer: BufferId);

    /// Draws `count` indices from the bound index buffer.
    fn draw_elements(&mut self, primitive: PrimitiveTopology, count: u32, index_type: IndexType);

    /// Draws `count` vertices starting at `first` without indices.
    fn draw_arrays(&mut self, primitive: PrimitiveTopology, first: u32, count: u32);
}
