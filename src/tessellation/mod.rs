mod build_triangle_mesh;
mod rectangle_quad;

pub use build_triangle_mesh::{
    build_triangle_mesh, BuildTriangleMesh, DegeneratePolicy, TriangleClass,
    FLAT_ASPECT_THRESHOLD,
};
pub use rectangle_quad::RectangleQuad;

use tracing::warn;

use crate::error::{MeshError, Result};
use crate::math::{Point2, Vector2};

/// Vertex count at which even 32-bit indices run out.
const WIDE_INDEX_LIMIT: u64 = 1 << 32;

/// Reports what the rendering environment can do.
pub trait CapabilityQuery {
    /// Whether 32-bit index buffers can be drawn.
    fn supports_wide_indices(&self) -> bool;
}

/// A fixed set of capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub wide_indices: bool,
}

impl Capabilities {
    /// An environment limited to 8- and 16-bit indices.
    pub const NARROW: Self = Self {
        wide_indices: false,
    };

    /// An environment with 32-bit index support.
    pub const WIDE: Self = Self { wide_indices: true };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::WIDE
    }
}

impl CapabilityQuery for Capabilities {
    fn supports_wide_indices(&self) -> bool {
        self.wide_indices
    }
}

/// One vertex of an evaluator triangle.
///
/// The attribute values are affine in the vertex position, so linear
/// interpolation across a triangle reproduces them exactly at every interior
/// point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluatorVertex {
    /// World position before extrusion.
    pub position: Point2,
    /// World-space extrusion direction for a unit border distance.
    pub border: Vector2,
    /// `border` expressed in the triangle's local frame.
    pub local_border: Vector2,
    /// Local x of the canonical `a`, `c`, `b` minus the local x of `position`.
    pub horizontal: [f64; 3],
    /// Local y of the canonical `a`, `c` minus the local y of `position`.
    pub vertical: [f64; 2],
}

impl EvaluatorVertex {
    /// Returns the vertex moved outward by `distance`, with its attributes
    /// shifted to match.
    #[must_use]
    pub fn extruded(&self, distance: f64) -> Self {
        let local = self.local_border * distance;
        Self {
            position: self.position + self.border * distance,
            horizontal: self.horizontal.map(|h| h - local.x),
            vertical: self.vertical.map(|v| v - local.y),
            ..*self
        }
    }
}

/// Triangle indices stored at the narrowest width that addresses every
/// vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indices {
    U8(Vec<[u8; 3]>),
    U16(Vec<[u16; 3]>),
    U32(Vec<[u32; 3]>),
}

impl Indices {
    /// Packs `triples` for a mesh of `vertex_count` vertices.
    ///
    /// The width is the narrowest whose range exceeds `vertex_count`: fewer
    /// than 2^8 vertices use 8 bits, fewer than 2^16 use 16 bits, anything
    /// else needs 32-bit support.
    ///
    /// # Errors
    ///
    /// Returns `MeshError::WideIndicesUnsupported` if 32-bit indices are
    /// needed but `capabilities` lacks them, `MeshError::CapacityExceeded`
    /// for 2^32 or more vertices, or `MeshError::IndexOutOfRange` if a triple
    /// holds an index the chosen width cannot store.
    pub fn pack(
        triples: &[[usize; 3]],
        vertex_count: usize,
        capabilities: &impl CapabilityQuery,
    ) -> Result<Self> {
        let count = u64::try_from(vertex_count).unwrap_or(u64::MAX);
        if count < 1 << 8 {
            return Ok(Self::U8(narrow(triples, 8)?));
        }
        if count < 1 << 16 {
            return Ok(Self::U16(narrow(triples, 16)?));
        }
        if count >= WIDE_INDEX_LIMIT {
            return Err(MeshError::CapacityExceeded {
                vertices: vertex_count,
                limit: WIDE_INDEX_LIMIT,
            }
            .into());
        }
        if !capabilities.supports_wide_indices() {
            warn!(
                vertices = vertex_count,
                "mesh needs 32-bit indices but they are unsupported"
            );
            return Err(MeshError::WideIndicesUnsupported {
                vertices: vertex_count,
            }
            .into());
        }
        Ok(Self::U32(narrow(triples, 32)?))
    }

    /// Index width in bits.
    #[must_use]
    pub fn width_bits(&self) -> u32 {
        match self {
            Self::U8(_) => 8,
            Self::U16(_) => 16,
            Self::U32(_) => 32,
        }
    }

    /// Number of triangles.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vertex indices of triangle `i`, widened.
    #[must_use]
    pub fn triangle(&self, i: usize) -> [usize; 3] {
        match self {
            Self::U8(v) => v[i].map(usize::from),
            Self::U16(v) => v[i].map(usize::from),
            Self::U32(v) => v[i].map(|x| x as usize),
        }
    }
}

/// Converts triples to `T`, failing on the first index that does not fit.
fn narrow<T: TryFrom<usize>>(triples: &[[usize; 3]], width: u32) -> Result<Vec<[T; 3]>> {
    triples
        .iter()
        .map(|&[a, b, c]| -> Result<[T; 3]> {
            let cast = |index: usize| {
                T::try_from(index).map_err(|_| MeshError::IndexOutOfRange { index, width })
            };
            Ok([cast(a)?, cast(b)?, cast(c)?])
        })
        .collect()
}

/// Evaluator triangles ready for a rendering backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Per-vertex attributes.
    pub vertices: Vec<EvaluatorVertex>,
    /// Evaluator triangles.
    pub indices: Indices,
    /// For every evaluator triangle, the index of the input triangle it
    /// belongs to.
    pub sources: Vec<usize>,
}

impl Mesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// The three vertices of evaluator triangle `i`.
    #[must_use]
    pub fn triangle(&self, i: usize) -> [&EvaluatorVertex; 3] {
        self.indices.triangle(i).map(|v| &self.vertices[v])
    }
}
