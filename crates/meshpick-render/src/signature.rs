//! Program signatures.

use std::fmt;

use meshpick_core::{Mesh, Scene, SurfaceId};

/// Cache key of a pick program variant.
///
/// Two meshes get equal signatures exactly when their pick programs would
/// compile identically. World transform, color and pick identifier are
/// per-draw uniforms and never part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramSignature {
    /// Target surface.
    pub surface: SurfaceId,
    /// Clip configuration hash.
    pub clips: u64,
    /// Geometry state hash.
    pub geometry: u64,
    /// Mesh render-state hash.
    pub mesh: u64,
}

impl ProgramSignature {
    /// Computes the signature of `mesh` drawn in `scene`.
    pub fn of(scene: &Scene, mesh: &Mesh) -> Self {
        Self {
            surface: scene.surface(),
            clips: scene.clips.hash(),
            geometry: mesh.geometry().hash(),
            mesh: mesh.state_hash(),
        }
    }
}

impl fmt::Display for ProgramSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{:x};{:x}",
            self.surface.0, self.clips, self.geometry, self.mesh
        )
    }
}
