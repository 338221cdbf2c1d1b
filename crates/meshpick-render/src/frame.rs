//! Per-pass draw state.

use glam::Mat4;
use meshpick_core::{FrontFace, StateId};

/// Counters accumulated over one pick pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounters {
    /// Program switches.
    pub use_program: u32,
    /// Vertex and index buffer binds.
    pub bind_array: u32,
    /// Indexed draws.
    pub draw_elements: u32,
    /// Non-indexed draws.
    pub draw_arrays: u32,
}

/// Mutable state threaded through every draw of one pick pass.
///
/// Tracks what is currently bound on the device so consecutive draws only
/// issue the state changes that actually differ. Create a fresh frame at the
/// start of each pass and drop it at the end. A frame belongs to exactly one
/// pass at a time.
#[derive(Debug, Clone, Default)]
pub struct PickFrame {
    pub(crate) last_program: Option<StateId>,
    pub(crate) last_material: Option<StateId>,
    pub(crate) last_geometry: Option<StateId>,
    pub(crate) backfaces: Option<bool>,
    pub(crate) front_face: Option<FrontFace>,
    pub(crate) line_width: Option<f32>,
    pub(crate) point_size: Option<f32>,
    /// View matrix overriding the scene camera for this pass.
    pub pick_view_matrix: Option<Mat4>,
    /// Projection matrix overriding the scene camera for this pass.
    pub pick_proj_matrix: Option<Mat4>,
    /// Counters for this pass.
    pub counters: FrameCounters,
}

impl PickFrame {
    /// Creates a frame that uses the scene camera.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frame with pass-specific view and projection matrices, e.g.
    /// a narrow frustum around the pick ray.
    pub fn with_pick_matrices(view: Mat4, projection: Mat4) -> Self {
        Self {
            pick_view_matrix: Some(view),
            pick_proj_matrix: Some(projection),
            ..Self::default()
        }
    }

    /// Forgets the material and geometry bindings and the uniform values
    /// cached for the previous program.
    ///
    /// Locations are only valid for the program they came from, so this runs
    /// on every program switch. Device toggles survive.
    pub(crate) fn reset_bindings(&mut self) {
        self.last_material = None;
        self.last_geometry = None;
        self.point_size = None;
    }
}
