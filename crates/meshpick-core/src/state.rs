//! Material and geometry state objects.
//!
//! Each state object carries two keys. Its [`StateId`] is a process-unique
//! identity used to skip redundant rebinds between consecutive draws. Its
//! `hash()` covers only the fields that change the compiled pick shader and
//! feeds the program signature.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Mat4;

static NEXT_STATE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a state object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u64);

impl StateId {
    /// Allocates a fresh identity.
    pub fn next() -> Self {
        Self(NEXT_STATE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Handle to a GPU buffer owned by the graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// Front-face winding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrontFace {
    /// Counter-clockwise triangles face the viewer.
    #[default]
    Ccw,
    /// Clockwise triangles face the viewer.
    Cw,
}

/// Primitive topology of a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Element type of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexType {
    U8,
    U16,
    #[default]
    U32,
}

/// Render state of a material, as far as the pick pass is concerned.
#[derive(Debug)]
pub struct MaterialState {
    id: StateId,
    /// When true, back faces are drawn (face culling disabled).
    pub backfaces: bool,
    /// Winding order of front faces.
    pub front_face: FrontFace,
    /// Line width for line primitives.
    pub line_width: f32,
    /// Point size for point primitives.
    pub point_size: f32,
}

impl MaterialState {
    /// Creates a material state with default render settings.
    pub fn new() -> Self {
        Self {
            id: StateId::next(),
            backfaces: false,
            front_face: FrontFace::Ccw,
            line_width: 1.0,
            point_size: 1.0,
        }
    }

    /// Returns the identity of this material state.
    pub fn id(&self) -> StateId {
        self.id
    }
}

impl Default for MaterialState {
    fn default() -> Self {
        Self::new()
    }
}

/// Vertex positions uploaded to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBuffer {
    /// Device buffer holding the positions.
    pub buffer: BufferId,
    /// Number of vertices.
    pub vertex_count: u32,
}

/// Indices uploaded to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBuffer {
    /// Device buffer holding the indices.
    pub buffer: BufferId,
    /// Number of indices.
    pub count: u32,
    /// Element type of each index.
    pub index_type: IndexType,
}

/// Buffers and layout of a geometry.
#[derive(Debug)]
pub struct GeometryState {
    id: StateId,
    /// Primitive topology used for indexed draws.
    pub primitive: PrimitiveTopology,
    /// Position buffer, if uploaded.
    pub positions: Option<VertexBuffer>,
    /// Index buffer, if the geometry is indexed.
    pub indices: Option<IndexBuffer>,
    /// Dequantization matrix. Present exactly when positions are stored as
    /// quantized 16-bit integers.
    pub positions_decode_matrix: Option<Mat4>,
}

impl GeometryState {
    /// Creates an empty geometry state with the given topology.
    pub fn new(primitive: PrimitiveTopology) -> Self {
        Self {
            id: StateId::next(),
            primitive,
            positions: None,
            indices: None,
            positions_decode_matrix: None,
        }
    }

    /// Sets the position buffer.
    #[must_use]
    pub fn with_positions(mut self, buffer: BufferId, vertex_count: u32) -> Self {
        self.positions = Some(VertexBuffer {
            buffer,
            vertex_count,
        });
        self
    }

    /// Sets the index buffer.
    #[must_use]
    pub fn with_indices(mut self, buffer: BufferId, count: u32, index_type: IndexType) -> Self {
        self.indices = Some(IndexBuffer {
            buffer,
            count,
            index_type,
        });
        self
    }

    /// Marks positions as quantized, decoded by the given matrix.
    #[must_use]
    pub fn with_decode_matrix(mut self, matrix: Mat4) -> Self {
        self.positions_decode_matrix = Some(matrix);
        self
    }

    /// Returns the identity of this geometry state.
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Returns whether positions are quantized.
    pub fn is_quantized(&self) -> bool {
        self.positions_decode_matrix.is_some()
    }

    /// Returns the compile-time hash of this geometry.
    pub fn hash(&self) -> u64 {
        hash_of(&(self.primitive, self.is_quantized()))
    }
}

pub(crate) fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
