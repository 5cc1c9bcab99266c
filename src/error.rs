use thiserror::Error;

/// Top-level error type for the blur shadow crate.
#[derive(Debug, Error)]
pub enum BlurError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors caused by blur or draw parameters outside their valid domain.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("parameter {parameter} = {value} is out of range ({min}, {max})")]
    OutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("transform is not affine")]
    NonAffineTransform,
}

/// Errors related to input shapes.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised while building a mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh needs {vertices} vertices, more than the limit of {limit}")]
    CapacityExceeded { vertices: usize, limit: u64 },

    #[error("mesh needs 32-bit indices for {vertices} vertices but wide indices are unsupported")]
    WideIndicesUnsupported { vertices: usize },

    #[error("index {index} does not fit in {width}-bit indices")]
    IndexOutOfRange { index: usize, width: u32 },
}

/// Errors related to backend resource handles.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unknown or released resource handle")]
    UnknownHandle,
}

/// Convenience type alias for results using [`BlurError`].
pub type Result<T> = std::result::Result<T, BlurError>;

impl ParameterError {
    /// Builds a [`ParameterError::OutOfRange`] for an open interval check.
    #[must_use]
    pub fn out_of_range(parameter: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            parameter,
            value,
            min,
            max,
        }
    }
}
