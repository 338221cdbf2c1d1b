//! Shader sources for pick programs.

use meshpick_core::{Mesh, Scene};

/// Vertex and fragment source of one program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    /// Vertex stage source.
    pub vertex: String,
    /// Fragment stage source.
    pub fragment: String,
    /// Optional debug label.
    pub label: Option<String>,
}

/// Produces pick shader source for a mesh.
///
/// The output may depend only on the features that make up the program
/// signature: surface, clip slot count, geometry layout and mesh render
/// state. The pool calls this once per program (re)allocation.
pub trait PickShaderSource {
    /// Generates the source for `mesh` drawn in `scene`.
    fn generate(&self, scene: &Scene, mesh: &Mesh) -> ShaderSource;
}

impl<F> PickShaderSource for F
where
    F: Fn(&Scene, &Mesh) -> ShaderSource,
{
    fn generate(&self, scene: &Scene, mesh: &Mesh) -> ShaderSource {
        self(scene, mesh)
    }
}

/// Builder for assembling shader sources line by line.
pub struct ShaderBuilder {
    vertex: Vec<String>,
    fragment: Vec<String>,
    label: Option<String>,
}

impl ShaderBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertex: Vec::new(),
            fragment: Vec::new(),
            label: None,
        }
    }

    /// Appends a line to the vertex stage.
    #[must_use]
    pub fn vertex(mut self, line: impl Into<String>) -> Self {
        self.vertex.push(line.into());
        self
    }

    /// Appends a line to the fragment stage.
    #[must_use]
    pub fn fragment(mut self, line: impl Into<String>) -> Self {
        self.fragment.push(line.into());
        self
    }

    /// Appends a line to the vertex stage when `condition` holds.
    #[must_use]
    pub fn vertex_if(self, condition: bool, line: impl Into<String>) -> Self {
        if condition {
            self.vertex(line)
        } else {
            self
        }
    }

    /// Appends a line to the fragment stage when `condition` holds.
    #[must_use]
    pub fn fragment_if(self, condition: bool, line: impl Into<String>) -> Self {
        if condition {
            self.fragment(line)
        } else {
            self
        }
    }

    /// Sets the debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Joins the collected lines into a [`ShaderSource`].
    #[must_use]
    pub fn build(self) -> ShaderSource {
        ShaderSource {
            vertex: self.vertex.join("\n"),
            fragment: self.fragment.join("\n"),
            label: self.label,
        }
    }
}

impl Default for ShaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
