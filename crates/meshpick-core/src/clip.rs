//! Clip planes shared by every mesh in a scene.
//!
//! The pick shader declares one set of uniforms per configured clip slot, so
//! the number of slots is a compile-time feature while each plane's pose and
//! active flag are uploaded at bind time.

use glam::Vec3;

/// A clip plane that discards geometry on one side.
///
/// The plane is defined by a point (position) and a direction. Geometry on the
/// side the direction points to is discarded while the plane is active.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPlane {
    /// A point on the plane.
    pos: Vec3,
    /// Direction pointing toward discarded geometry.
    dir: Vec3,
    /// Whether the plane currently clips.
    active: bool,
}

impl ClipPlane {
    /// Creates an active clip plane. The direction is normalized.
    pub fn new(pos: Vec3, dir: Vec3) -> Self {
        Self {
            pos,
            dir: dir.normalize_or_zero(),
            active: true,
        }
    }

    /// Returns the point on the plane.
    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    /// Sets the point on the plane.
    pub fn set_pos(&mut self, pos: Vec3) {
        self.pos = pos;
    }

    /// Returns the clipping direction.
    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    /// Sets the clipping direction.
    pub fn set_dir(&mut self, dir: Vec3) {
        self.dir = dir.normalize_or_zero();
    }

    /// Returns whether the plane is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activates or deactivates the plane.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Default for ClipPlane {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}

/// The clip configuration of a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipState {
    clips: Vec<ClipPlane>,
}

impl ClipState {
    /// Creates an empty clip state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clip state from a list of planes.
    pub fn from_planes(clips: Vec<ClipPlane>) -> Self {
        Self { clips }
    }

    /// Appends a clip slot and returns its index.
    pub fn add(&mut self, plane: ClipPlane) -> usize {
        self.clips.push(plane);
        self.clips.len() - 1
    }

    /// Removes a clip slot.
    pub fn remove(&mut self, index: usize) -> Option<ClipPlane> {
        (index < self.clips.len()).then(|| self.clips.remove(index))
    }

    /// Returns the configured clip slots in order.
    pub fn clips(&self) -> &[ClipPlane] {
        &self.clips
    }

    /// Returns a mutable clip slot.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ClipPlane> {
        self.clips.get_mut(index)
    }

    /// Returns the number of configured clip slots.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Returns true if no clip slots are configured.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Returns the compile-time hash of this configuration.
    ///
    /// Only the slot count changes the generated shader; poses and active
    /// flags are uniforms.
    pub fn hash(&self) -> u64 {
        self.clips.len() as u64
    }
}
