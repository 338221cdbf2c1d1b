//! Pick pass backend for meshpick.
//!
//! This crate provides:
//! - The [`GraphicsDevice`] seam and a headless [`RecordingDevice`]
//! - [`ProgramSignature`], the cache key of a pick program
//! - [`ProgramPool`], which shares one compiled program per signature
//! - [`PickProgramHandle::draw_mesh`], the state-diffing draw of one mesh

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod device;
mod draw;
pub mod frame;
pub mod pool;
mod program;
pub mod recording;
pub mod shader;
pub mod signature;

#[cfg(test)]
mod testing;

pub use device::{
    AttributeLocation, GraphicsDevice, ProgramId, UniformLocation, UniformValue,
    VertexElementType,
};
pub use frame::{FrameCounters, PickFrame};
pub use pool::ProgramPool;
pub use program::PickProgramHandle;
pub use recording::{DeviceCommand, RecordingDevice};
pub use shader::{PickShaderSource, ShaderBuilder, ShaderSource};
pub use signature::ProgramSignature;
