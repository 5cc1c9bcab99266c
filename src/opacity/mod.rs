//! Closed-form opacity of Gaussian-blurred shapes.

mod border;
mod rectangle;
mod triangle;

pub use border::compute_border;
pub use rectangle::{evaluate_rectangle_opacity, interval_opacity};
pub use triangle::{
    evaluate_triangle_opacity, right_triangle_integral, TriangleScalars, WedgeRegion,
};
