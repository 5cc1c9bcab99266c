pub mod error;
pub mod geometry;
pub mod math;
pub mod opacity;
pub mod params;
pub mod render;
pub mod tessellation;

pub use error::{BlurError, Result};
pub use geometry::{Rect, Triangle};
pub use opacity::{compute_border, evaluate_rectangle_opacity, evaluate_triangle_opacity};
pub use params::{Rgba, ShadowParams};
pub use tessellation::{
    build_triangle_mesh, BuildTriangleMesh, Capabilities, CapabilityQuery, Mesh,
};
