use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::{FramedTriangle, Triangle};
use crate::math::polygon_2d::{miter_offset, right_normal, segment_direction};
use crate::math::{Point2, Vector2};

use super::{CapabilityQuery, EvaluatorVertex, Indices, Mesh};

/// Above this squared-length-to-squared-height ratio a triangle is emitted as
/// its local bounding box instead of a mitered triangle.
///
/// Below it every base angle is at least about 22°, which bounds the miter
/// scale at the vertices.
pub const FLAT_ASPECT_THRESHOLD: f64 = 6.144;

/// What to do with zero-area input triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneratePolicy {
    /// Emit no geometry for them.
    #[default]
    Skip,
    /// Fail the whole build.
    Reject,
}

/// How an input triangle is covered by evaluator triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleClass {
    /// The triangle itself, with mitered corners. 3 vertices, 1 triangle.
    Compact,
    /// Its box in the local frame, with diagonal corners. 4 vertices,
    /// 2 triangles.
    Flat,
}

impl TriangleClass {
    /// Classifies a framed triangle by its aspect.
    #[must_use]
    pub fn of(triangle: &FramedTriangle) -> Self {
        if triangle.aspect() < FLAT_ASPECT_THRESHOLD {
            Self::Compact
        } else {
            Self::Flat
        }
    }
}

/// Builds the evaluator mesh for a set of non-overlapping triangles.
///
/// Every input triangle is canonicalized, framed and covered by one or two
/// evaluator triangles whose vertices carry the attributes the triangle
/// opacity formula needs, plus an extrusion direction for the blur border.
#[derive(Debug)]
pub struct BuildTriangleMesh {
    triangles: Vec<Triangle>,
    policy: DegeneratePolicy,
}

impl BuildTriangleMesh {
    /// Creates a new mesh build operation.
    #[must_use]
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles,
            policy: DegeneratePolicy::default(),
        }
    }

    /// Sets how zero-area triangles are handled.
    #[must_use]
    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Executes the build.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for a zero-area triangle under
    /// [`DegeneratePolicy::Reject`], or a `MeshError` if the vertex count
    /// cannot be indexed with the available index widths. No partial mesh is
    /// returned.
    pub fn execute(&self, capabilities: &impl CapabilityQuery) -> Result<Mesh> {
        let mut vertices = Vec::with_capacity(self.triangles.len() * 4);
        let mut triples = Vec::with_capacity(self.triangles.len() * 2);
        let mut sources = Vec::with_capacity(self.triangles.len() * 2);

        for (index, triangle) in self.triangles.iter().enumerate() {
            let framed = match FramedTriangle::new(triangle) {
                Ok(framed) => framed,
                Err(err) if self.policy == DegeneratePolicy::Skip => {
                    debug!(index, %err, "skipping degenerate triangle");
                    continue;
                }
                Err(err) => return Err(err),
            };

            let class = TriangleClass::of(&framed);
            trace!(index, ?class, aspect = framed.aspect(), "classified triangle");

            let base = vertices.len();
            match class {
                TriangleClass::Compact => {
                    vertices.extend(compact_vertices(&framed)?);
                    triples.push([base, base + 1, base + 2]);
                    sources.push(index);
                }
                TriangleClass::Flat => {
                    vertices.extend(flat_vertices(&framed));
                    triples.push([base, base + 1, base + 2]);
                    triples.push([base, base + 2, base + 3]);
                    sources.extend([index, index]);
                }
            }
        }

        let indices = Indices::pack(&triples, vertices.len(), capabilities)?;
        debug!(
            input = self.triangles.len(),
            vertices = vertices.len(),
            triangles = triples.len(),
            index_bits = indices.width_bits(),
            "built triangle mesh"
        );

        Ok(Mesh {
            vertices,
            indices,
            sources,
        })
    }
}

/// Builds the evaluator mesh for `triangles`, skipping degenerate ones.
///
/// # Errors
///
/// Returns a `MeshError` if the mesh cannot be indexed.
pub fn build_triangle_mesh(
    triangles: &[Triangle],
    capabilities: &impl CapabilityQuery,
) -> Result<Mesh> {
    BuildTriangleMesh::new(triangles.to_vec()).execute(capabilities)
}

/// The canonical triangle with a miter direction at each corner.
fn compact_vertices(framed: &FramedTriangle) -> Result<[EvaluatorVertex; 3]> {
    let Triangle { a, b, c } = *framed.world();
    let n_ab = right_normal(segment_direction(&a, &b)?);
    let n_bc = right_normal(segment_direction(&b, &c)?);
    let n_ca = right_normal(segment_direction(&c, &a)?);

    Ok([
        evaluator_vertex(framed, a, miter_offset(n_ca, n_ab)),
        evaluator_vertex(framed, b, miter_offset(n_ab, n_bc)),
        evaluator_vertex(framed, c, miter_offset(n_bc, n_ca)),
    ])
}

/// The local bounding box, counter-clockwise from `a`, with diagonal
/// directions at the corners.
fn flat_vertices(framed: &FramedTriangle) -> [EvaluatorVertex; 4] {
    let frame = framed.frame();
    let (ta, tb, tc) = (framed.local_a(), framed.local_b(), framed.local_c());
    let corners = [
        (ta, Vector2::new(-1.0, -1.0)),
        (tb, Vector2::new(1.0, -1.0)),
        (Point2::new(tb.x, tc.y), Vector2::new(1.0, 1.0)),
        (Point2::new(ta.x, tc.y), Vector2::new(-1.0, 1.0)),
    ];
    corners.map(|(local, diagonal)| {
        evaluator_vertex(
            framed,
            frame.to_world(&local),
            frame.to_world_vector(&diagonal),
        )
    })
}

fn evaluator_vertex(framed: &FramedTriangle, position: Point2, border: Vector2) -> EvaluatorVertex {
    let frame = framed.frame();
    let p = frame.to_local(&position);
    let (ta, tb, tc) = (framed.local_a(), framed.local_b(), framed.local_c());
    EvaluatorVertex {
        position,
        border,
        local_border: frame.to_local_vector(&border),
        horizontal: [ta.x - p.x, tc.x - p.x, tb.x - p.x],
        vertical: [ta.y - p.y, tc.y - p.y],
    }
}
