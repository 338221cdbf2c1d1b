//! Core inputs for meshpick.
//!
//! This crate provides the read-only scene state the pick pass consumes:
//! - [`Scene`], [`Mesh`], [`Camera`] and [`ClipState`]
//! - [`MaterialState`] and [`GeometryState`] with identities and compile-time hashes
//! - The pick identifier color encoding
//! - Options, errors and process-wide program statistics

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod camera;
pub mod clip;
pub mod error;
pub mod options;
pub mod pick;
pub mod scene;
pub mod state;
pub mod stats;

pub use camera::Camera;
pub use clip::{ClipPlane, ClipState};
pub use error::{MeshPickError, Result};
pub use options::{PickOptions, UniformNames};
pub use pick::{pick_color, pick_id_from_color, pick_id_from_rgba8, pick_rgba8};
pub use scene::{Billboard, Mesh, Scene, SurfaceId};
pub use state::{
    BufferId, FrontFace, GeometryState, IndexBuffer, IndexType, MaterialState, PrimitiveTopology,
    StateId, VertexBuffer,
};

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3, Vec4};
