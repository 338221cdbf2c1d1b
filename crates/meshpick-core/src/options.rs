//! Configuration options for meshpick.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Names of the uniforms and attributes declared by pick shaders.
///
/// These must match what the shader source generator emits. Clip uniforms are
/// declared per slot as `<prefix><index>`, e.g. `clipActive0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformNames {
    /// Dequantization matrix for quantized positions.
    pub positions_decode_matrix: String,
    /// Model matrix.
    pub model_matrix: String,
    /// View matrix.
    pub view_matrix: String,
    /// Projection matrix.
    pub proj_matrix: String,
    /// Prefix of the per-slot clip active flag.
    pub clip_active_prefix: String,
    /// Prefix of the per-slot clip plane position.
    pub clip_pos_prefix: String,
    /// Prefix of the per-slot clip plane direction.
    pub clip_dir_prefix: String,
    /// Position vertex attribute.
    pub position: String,
    /// Per-mesh clippable flag.
    pub clippable: String,
    /// Encoded pick color.
    pub pick_color: String,
    /// Point size for point primitives.
    pub point_size: String,
}

impl UniformNames {
    /// Name of the clip active flag for a slot.
    pub fn clip_active(&self, slot: usize) -> String {
        format!("{}{slot}", self.clip_active_prefix)
    }

    /// Name of the clip position for a slot.
    pub fn clip_pos(&self, slot: usize) -> String {
        format!("{}{slot}", self.clip_pos_prefix)
    }

    /// Name of the clip direction for a slot.
    pub fn clip_dir(&self, slot: usize) -> String {
        format!("{}{slot}", self.clip_dir_prefix)
    }
}

impl Default for UniformNames {
    fn default() -> Self {
        Self {
            positions_decode_matrix: "positionsDecodeMatrix".into(),
            model_matrix: "modelMatrix".into(),
            view_matrix: "viewMatrix".into(),
            proj_matrix: "projMatrix".into(),
            clip_active_prefix: "clipActive".into(),
            clip_pos_prefix: "clipPos".into(),
            clip_dir_prefix: "clipDir".into(),
            position: "position".into(),
            clippable: "clippable".into(),
            pick_color: "pickColor".into(),
            point_size: "pointSize".into(),
        }
    }
}

/// Configuration of the pick program pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickOptions {
    /// Uniform naming convention shared with the shader generator.
    pub uniform_names: UniformNames,
    /// Whether compile failures are logged in addition to being returned.
    pub log_compile_failures: bool,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            uniform_names: UniformNames::default(),
            log_compile_failures: true,
        }
    }
}

impl PickOptions {
    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let options = Self::from_json(&text)?;
        log::debug!("loaded pick options from {}", path.display());
        Ok(options)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
