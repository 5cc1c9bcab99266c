//! The work a rendering backend does with a [`Mesh`], in software.
//!
//! A GPU backend runs [`vertex_stage`] per vertex and the body of
//! [`Mesh::opacity_at`] per fragment. Keeping a CPU rendition here pins down
//! the attribute contract and makes it testable.

mod software;

pub use software::{ResourceId, ShadowBackend, SoftwareBackend};

use crate::math::{Point2, Point3};
use crate::opacity::TriangleScalars;
use crate::params::ShadowParams;
use crate::tessellation::{EvaluatorVertex, Mesh};

/// Tolerance on barycentric weights for points on a triangle's edge.
const EDGE_TOLERANCE: f64 = 1e-12;

/// A vertex after extrusion and placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedVertex {
    /// Position after the placement transform.
    pub placed: Point3,
    /// The extruded vertex, still in pre-transform units.
    pub vertex: EvaluatorVertex,
}

/// Extrudes every vertex by the border of `params` and applies the placement
/// transform.
#[must_use]
pub fn vertex_stage(mesh: &Mesh, params: &ShadowParams) -> Vec<ShadedVertex> {
    let border = params.border();
    mesh.vertices
        .iter()
        .map(|v| {
            let vertex = v.extruded(border);
            ShadedVertex {
                placed: params.transform_point(&vertex.position),
                vertex,
            }
        })
        .collect()
}

/// Barycentric weights of `point` in triangle `(a, b, c)`, or `None` if it
/// lies outside.
#[must_use]
pub fn barycentric(point: &Point2, a: &Point2, b: &Point2, c: &Point2) -> Option<[f64; 3]> {
    let area = (b - a).perp(&(c - a));
    if area.abs() < f64::EPSILON {
        return None;
    }
    let wa = (b - point).perp(&(c - point)) / area;
    let wb = (c - point).perp(&(a - point)) / area;
    let wc = 1.0 - wa - wb;
    let inside = [wa, wb, wc].iter().all(|&w| w >= -EDGE_TOLERANCE);
    inside.then_some([wa, wb, wc])
}

/// Fragment stage: interpolates attributes and evaluates the opacity.
#[must_use]
pub fn fragment_opacity(vertices: [&EvaluatorVertex; 3], weights: [f64; 3], sigma: f64) -> f64 {
    let mut horizontal = [0.0; 3];
    let mut vertical = [0.0; 2];
    for (v, w) in vertices.iter().zip(weights) {
        for (h, x) in horizontal.iter_mut().zip(v.horizontal) {
            *h += w * x;
        }
        for (t, y) in vertical.iter_mut().zip(v.vertical) {
            *t += w * y;
        }
    }
    TriangleScalars::from_attributes(horizontal, vertical, sigma).opacity()
}

impl Mesh {
    /// Opacity a backend would produce at `point` (pre-transform units).
    ///
    /// Each input triangle contributes at most once; contributions of
    /// different input triangles add. Points outside the extruded geometry
    /// get nothing.
    #[must_use]
    pub fn opacity_at(&self, point: &Point2, params: &ShadowParams) -> f64 {
        let border = params.border();
        let mut total = 0.0;
        let mut last_source = None;

        for (i, &source) in self.sources.iter().enumerate() {
            if last_source == Some(source) {
                continue;
            }
            let extruded = self.triangle(i).map(|v| v.extruded(border));
            let [a, b, c] = extruded.map(|v| v.position);
            if let Some(weights) = barycentric(point, &a, &b, &c) {
                let [u, v, w] = &extruded;
                total += fragment_opacity([u, v, w], weights, params.sigma());
                last_source = Some(source);
            }
        }
        total.clamp(0.0, 1.0)
    }
}
