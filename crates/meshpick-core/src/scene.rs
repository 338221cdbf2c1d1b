//! Scenes and meshes as seen by the pick pass.

use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::clip::ClipState;
use crate::state::{hash_of, GeometryState, MaterialState};

/// Stable identity of the rendering surface/context a scene draws into.
///
/// Programs compiled for one surface are never handed to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

/// Billboarding mode of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Billboard {
    /// Regular mesh.
    #[default]
    None,
    /// Always faces the camera.
    Spherical,
    /// Rotates about its up axis to face the camera.
    Cylindrical,
}

/// A drawable mesh.
///
/// The world matrix, color and pick identifier are per-draw values; only the
/// billboard mode and stationary flag affect the compiled pick shader.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Model-to-world transform.
    pub world_matrix: Mat4,
    /// Display color (unused by the pick pass).
    pub color: Vec3,
    /// Identifier encoded into the pick buffer.
    pub pick_id: u32,
    /// Whether scene clip planes apply to this mesh.
    pub clippable: bool,
    /// Billboarding mode.
    pub billboard: Billboard,
    /// Whether the mesh ignores camera translation (skyboxes and the like).
    pub stationary: bool,
    material: Rc<MaterialState>,
    geometry: Rc<GeometryState>,
}

impl Mesh {
    /// Creates a mesh with an identity transform and pick id 0.
    pub fn new(geometry: Rc<GeometryState>, material: Rc<MaterialState>) -> Self {
        Self {
            world_matrix: Mat4::IDENTITY,
            color: Vec3::ONE,
            pick_id: 0,
            clippable: true,
            billboard: Billboard::None,
            stationary: false,
            material,
            geometry,
        }
    }

    /// Sets the pick identifier.
    #[must_use]
    pub fn with_pick_id(mut self, pick_id: u32) -> Self {
        self.pick_id = pick_id;
        self
    }

    /// Sets the world matrix.
    #[must_use]
    pub fn with_world_matrix(mut self, world_matrix: Mat4) -> Self {
        self.world_matrix = world_matrix;
        self
    }

    /// Returns the material state.
    pub fn material(&self) -> &MaterialState {
        &self.material
    }

    /// Returns the geometry state.
    pub fn geometry(&self) -> &GeometryState {
        &self.geometry
    }

    /// Replaces the material.
    pub fn set_material(&mut self, material: Rc<MaterialState>) {
        self.material = material;
    }

    /// Replaces the geometry.
    pub fn set_geometry(&mut self, geometry: Rc<GeometryState>) {
        self.geometry = geometry;
    }

    /// Returns the compile-time hash of this mesh's render state.
    pub fn state_hash(&self) -> u64 {
        hash_of(&(self.billboard, self.stationary))
    }
}

/// A scene: its target surface, camera and clip planes.
#[derive(Debug, Clone)]
pub struct Scene {
    surface: SurfaceId,
    /// The scene camera.
    pub camera: Camera,
    /// The scene clip planes.
    pub clips: ClipState,
}

impl Scene {
    /// Creates a scene drawing into the given surface.
    pub fn new(surface: SurfaceId) -> Self {
        Self {
            surface,
            camera: Camera::default(),
            clips: ClipState::new(),
        }
    }

    /// Returns the surface this scene draws into.
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PrimitiveTopology;

    fn mesh() -> Mesh {
        Mesh::new(
            Rc::new(GeometryState::new(PrimitiveTopology::Triangles)),
            Rc::new(MaterialState::new()),
        )
    }

    #[test]
    fn test_state_hash_ignores_per_draw_values() {
        let a = mesh();
        let mut b = a.clone().with_pick_id(42).with_world_matrix(Mat4::from_translation(Vec3::X));
        b.color = Vec3::ZERO;
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn test_state_hash_tracks_shader_features() {
        let a = mesh();
        let mut billboarded = a.clone();
        billboarded.billboard = Billboard::Spherical;
        let mut stationary = a.clone();
        stationary.stationary = true;
        assert_ne!(a.state_hash(), billboarded.state_hash());
        assert_ne!(a.state_hash(), stationary.state_hash());
        assert_ne!(billboarded.state_hash(), stationary.state_hash());
    }
}
