use slotmap::SlotMap;
use tracing::debug;

use crate::error::{BackendError, Result};
use crate::math::{Point2, Point3};
use crate::params::{Rgba, ShadowParams};
use crate::tessellation::{Mesh, RectangleQuad};

use super::{barycentric, fragment_opacity, vertex_stage};

slotmap::new_key_type! {
    /// Handle to geometry uploaded to a backend.
    pub struct ResourceId;
}

/// A rendering backend that owns uploaded shadow geometry.
///
/// Uploads create resources, [`ShadowBackend::release`] destroys them. A
/// released handle is invalid for every later call.
pub trait ShadowBackend {
    /// Uploads a triangle mesh.
    fn upload_mesh(&mut self, mesh: &Mesh) -> ResourceId;

    /// Uploads a rectangle. The quad is rebuilt per draw from the draw's
    /// border.
    fn upload_rect(&mut self, quad: &RectangleQuad) -> ResourceId;

    /// Draws a resource with the given parameters.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::UnknownHandle` for released or foreign handles.
    fn draw(&mut self, id: ResourceId, params: &ShadowParams) -> Result<()>;

    /// Destroys a resource.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::UnknownHandle` for released or foreign handles.
    fn release(&mut self, id: ResourceId) -> Result<()>;
}

#[derive(Debug)]
enum Resource {
    Mesh(Mesh),
    Rect(RectangleQuad),
}

/// A CPU backend rasterizing into an RGBA pixel grid.
///
/// Placed coordinates map to pixels one to one; pixel `(x, y)` is sampled at
/// its center. Within a draw, fragments add their opacity; every covered
/// pixel is then replaced by the draw's color blend at the summed opacity.
#[derive(Debug)]
pub struct SoftwareBackend {
    resources: SlotMap<ResourceId, Resource>,
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

/// Per-draw coverage of one pixel.
#[derive(Debug, Clone, Copy, Default)]
struct Coverage {
    opacity: f64,
    covered: bool,
    /// Input triangle that last wrote here, so split tiles count once.
    source: Option<usize>,
}

impl SoftwareBackend {
    /// Creates a backend with a `width` x `height` target cleared to `clear`.
    #[must_use]
    pub fn new(width: usize, height: usize, clear: Rgba) -> Self {
        Self {
            resources: SlotMap::with_key(),
            width,
            height,
            pixels: vec![clear; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Color of pixel `(x, y)`, if inside the target.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Number of live resources.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    fn draw_mesh(&self, mesh: &Mesh, params: &ShadowParams, coverage: &mut [Coverage]) {
        let shaded = vertex_stage(mesh, params);
        for (i, &source) in mesh.sources.iter().enumerate() {
            let [ia, ib, ic] = mesh.indices.triangle(i);
            let (a, b, c) = (&shaded[ia], &shaded[ib], &shaded[ic]);
            self.rasterize([a.placed, b.placed, c.placed], |pixel, weights| {
                let cell = &mut coverage[pixel];
                if cell.source == Some(source) {
                    return;
                }
                cell.source = Some(source);
                cell.covered = true;
                cell.opacity +=
                    fragment_opacity([&a.vertex, &b.vertex, &c.vertex], weights, params.sigma());
            });
        }
    }

    fn draw_rect(
        &self,
        quad: &RectangleQuad,
        params: &ShadowParams,
        coverage: &mut [Coverage],
    ) -> Result<()> {
        let quad = RectangleQuad::for_params(*quad.shape(), params);
        let corners = quad.corners();
        let placed = corners.map(|c| params.transform_point(&c));
        let mut result = Ok(());
        for [i, j, k] in RectangleQuad::TRIANGLES {
            let (i, j, k) = (usize::from(i), usize::from(j), usize::from(k));
            self.rasterize([placed[i], placed[j], placed[k]], |pixel, w| {
                let cell = &mut coverage[pixel];
                if cell.covered {
                    return;
                }
                // Pre-transform position, interpolated like any attribute.
                let local = Point2::from(
                    corners[i].coords * w[0] + corners[j].coords * w[1] + corners[k].coords * w[2],
                );
                match quad.opacity_at(&local, params) {
                    Ok(opacity) => {
                        cell.covered = true;
                        cell.opacity += opacity;
                    }
                    Err(err) => result = Err(err),
                }
            });
        }
        result
    }

    /// Calls `shade` with the pixel index and barycentric weights of every
    /// pixel center inside the placed triangle.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn rasterize(&self, placed: [Point3; 3], mut shade: impl FnMut(usize, [f64; 3])) {
        let [a, b, c] = placed.map(|p| Point2::new(p.x, p.y));
        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as usize;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as usize;
        let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as usize).min(self.width);
        let max_y = (a.y.max(b.y).max(c.y).ceil().max(0.0) as usize).min(self.height);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = Point2::new(x as f64 + 0.5, y as f64 + 0.5);
                if let Some(weights) = barycentric(&center, &a, &b, &c) {
                    shade(y * self.width + x, weights);
                }
            }
        }
    }
}

impl ShadowBackend for SoftwareBackend {
    fn upload_mesh(&mut self, mesh: &Mesh) -> ResourceId {
        self.resources.insert(Resource::Mesh(mesh.clone()))
    }

    fn upload_rect(&mut self, quad: &RectangleQuad) -> ResourceId {
        self.resources.insert(Resource::Rect(*quad))
    }

    fn draw(&mut self, id: ResourceId, params: &ShadowParams) -> Result<()> {
        let resource = self.resources.get(id).ok_or(BackendError::UnknownHandle)?;
        let mut coverage = vec![Coverage::default(); self.pixels.len()];
        match resource {
            Resource::Mesh(mesh) => self.draw_mesh(mesh, params, &mut coverage),
            Resource::Rect(quad) => self.draw_rect(quad, params, &mut coverage)?,
        }

        let mut written = 0_usize;
        for (pixel, cell) in self.pixels.iter_mut().zip(&coverage) {
            if cell.covered {
                *pixel = params.shade(cell.opacity.clamp(0.0, 1.0));
                written += 1;
            }
        }
        debug!(written, "software draw finished");
        Ok(())
    }

    fn release(&mut self, id: ResourceId) -> Result<()> {
        self.resources
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| BackendError::UnknownHandle.into())
    }
}
