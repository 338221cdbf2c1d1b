//! Error types for meshpick.

use thiserror::Error;

/// The main error type for meshpick operations.
#[derive(Error, Debug)]
pub enum MeshPickError {
    /// The pick shader for a program signature failed to compile or link.
    ///
    /// Only picking for meshes with this signature is affected. No pool entry
    /// is created for it.
    #[error("pick program '{signature}' failed to compile:\n{}", .diagnostics.join("\n"))]
    ShaderCompileFailed {
        /// Display form of the program signature.
        signature: String,
        /// Compiler/linker messages, one per line.
        diagnostics: Vec<String>,
    },

    /// A program pool was used in a way its reference counting forbids.
    #[error("program pool contract violated: {0}")]
    ContractViolation(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl MeshPickError {
    /// Returns the compiler diagnostics if this is a compile failure.
    #[must_use]
    pub fn diagnostics(&self) -> Option<&[String]> {
        match self {
            Self::ShaderCompileFailed { diagnostics, .. } => Some(diagnostics.as_slice()),
            _ => None,
        }
    }
}

/// A specialized Result type for meshpick operations.
pub type Result<T> = std::result::Result<T, MeshPickError>;
