use crate::error::{ParameterError, Result};
use crate::math::{Matrix4, Point2, Point3, TOLERANCE};
use crate::opacity::compute_border;

/// Default minimum visible opacity.
pub const DEFAULT_CUTOFF: f64 = 1.0 / 512.0;

/// An RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const OPAQUE_BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Returns `self + t * (other - self)` per channel.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(
            self.r + t * (other.r - self.r),
            self.g + t * (other.g - self.g),
            self.b + t * (other.b - self.b),
            self.a + t * (other.a - self.a),
        )
    }

    fn validate(&self, parameter: &'static str) -> Result<()> {
        for value in [self.r, self.g, self.b, self.a] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ParameterError::out_of_range(parameter, value, 0.0, 1.0).into());
            }
        }
        Ok(())
    }
}

/// Validates a blur standard deviation.
///
/// # Errors
///
/// Returns `ParameterError::OutOfRange` unless `sigma` is finite and positive.
pub fn validate_sigma(sigma: f64) -> Result<()> {
    if sigma > 0.0 && sigma.is_finite() {
        Ok(())
    } else {
        Err(ParameterError::out_of_range("sigma", sigma, 0.0, f64::INFINITY).into())
    }
}

/// Validates an opacity cutoff.
///
/// # Errors
///
/// Returns `ParameterError::OutOfRange` unless `0 < cutoff < 1`.
pub fn validate_cutoff(cutoff: f64) -> Result<()> {
    if cutoff > 0.0 && cutoff < 1.0 {
        Ok(())
    } else {
        Err(ParameterError::out_of_range("cutoff", cutoff, 0.0, 1.0).into())
    }
}

/// Values a draw call needs: blur, colors, cutoff and placement.
///
/// All blur math runs in pre-transform units; `transform` only moves the
/// extruded geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    sigma: f64,
    fill: Rgba,
    background: Rgba,
    cutoff: f64,
    transform: Matrix4,
}

impl ShadowParams {
    /// Creates parameters with opaque black fill, transparent background,
    /// the default cutoff and an identity transform.
    ///
    /// # Errors
    ///
    /// Returns an error if `sigma` is not positive.
    pub fn new(sigma: f64) -> Result<Self> {
        validate_sigma(sigma)?;
        Ok(Self {
            sigma,
            fill: Rgba::OPAQUE_BLACK,
            background: Rgba::TRANSPARENT,
            cutoff: DEFAULT_CUTOFF,
            transform: Matrix4::identity(),
        })
    }

    /// Sets the fill color.
    ///
    /// # Errors
    ///
    /// Returns an error if a channel is outside `[0, 1]`.
    pub fn with_fill(mut self, fill: Rgba) -> Result<Self> {
        fill.validate("fill")?;
        self.fill = fill;
        Ok(self)
    }

    /// Sets the background color.
    ///
    /// # Errors
    ///
    /// Returns an error if a channel is outside `[0, 1]`.
    pub fn with_background(mut self, background: Rgba) -> Result<Self> {
        background.validate("background")?;
        self.background = background;
        Ok(self)
    }

    /// Sets the cutoff.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < cutoff < 1`.
    pub fn with_cutoff(mut self, cutoff: f64) -> Result<Self> {
        validate_cutoff(cutoff)?;
        self.cutoff = cutoff;
        Ok(self)
    }

    /// Sets the placement transform.
    ///
    /// # Errors
    ///
    /// Returns `ParameterError::NonAffineTransform` if the bottom row is not
    /// `(0, 0, 0, 1)`.
    pub fn with_transform(mut self, transform: Matrix4) -> Result<Self> {
        let row = transform.row(3);
        let affine = row[0].abs() < TOLERANCE
            && row[1].abs() < TOLERANCE
            && row[2].abs() < TOLERANCE
            && (row[3] - 1.0).abs() < TOLERANCE;
        if !affine {
            return Err(ParameterError::NonAffineTransform.into());
        }
        self.transform = transform;
        Ok(self)
    }

    #[must_use]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    #[must_use]
    pub fn fill(&self) -> Rgba {
        self.fill
    }

    #[must_use]
    pub fn background(&self) -> Rgba {
        self.background
    }

    #[must_use]
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[must_use]
    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    /// Extrusion distance for these parameters.
    #[must_use]
    pub fn border(&self) -> f64 {
        // Both inputs were validated on construction.
        compute_border(self.sigma, self.cutoff).unwrap_or(0.0)
    }

    /// Applies the placement transform to a pre-transform point.
    #[must_use]
    pub fn transform_point(&self, point: &Point2) -> Point3 {
        self.transform
            .transform_point(&Point3::new(point.x, point.y, 0.0))
    }

    /// Blends background towards fill by `opacity`.
    #[must_use]
    pub fn shade(&self, opacity: f64) -> Rgba {
        self.background.lerp(&self.fill, opacity)
    }
}
