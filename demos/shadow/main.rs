//! Blurshade demo: renders a rectangle shadow and a triangle-mesh shadow with
//! the software backend and prints the coverage as ASCII.
//!
//! Usage:
//! ```text
//! cargo run --example shadow                 # sigma = 1.5
//! cargo run --example shadow -- 3.0          # wider blur
//! RUST_LOG=blurshade=trace cargo run --example shadow
//! ```

use blurshade::geometry::{Rect, Triangle};
use blurshade::math::Point2;
use blurshade::render::{ShadowBackend, SoftwareBackend};
use blurshade::tessellation::RectangleQuad;
use blurshade::{build_triangle_mesh, BlurError, Capabilities, Rgba, ShadowParams};

const WIDTH: usize = 72;
const HEIGHT: usize = 28;

/// Darkest last.
const RAMP: &[u8] = b" .:-=+*#%@";

fn main() -> Result<(), BlurError> {
    // Default: WARN for everything, INFO for blurshade.
    // Override with RUST_LOG env var (e.g. RUST_LOG=blurshade=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("shadow=info".parse().unwrap_or_default())
        .add_directive("blurshade=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let sigma = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1.5);
    let params = ShadowParams::new(sigma)?;
    tracing::info!(sigma, border = params.border(), "rendering");

    let mut backend = SoftwareBackend::new(WIDTH, HEIGHT, Rgba::TRANSPARENT);

    let rect = backend.upload_rect(&RectangleQuad::for_params(
        Rect::new(6.0, 6.0, 26.0, 20.0),
        &params,
    ));

    let triangles = [
        Triangle::new(p(36.0, 4.0), p(54.0, 8.0), p(40.0, 22.0)),
        Triangle::new(p(54.0, 8.0), p(66.0, 9.0), p(40.0, 22.0)),
    ];
    let mesh = build_triangle_mesh(&triangles, &Capabilities::default())?;
    let shape = backend.upload_mesh(&mesh);

    backend.draw(rect, &params)?;
    backend.draw(shape, &params)?;

    for y in (0..HEIGHT).rev() {
        let row: String = (0..WIDTH)
            .map(|x| backend.pixel(x, y).map_or(' ', |c| glyph(c.a)))
            .collect();
        println!("{row}");
    }

    backend.release(rect)?;
    backend.release(shape)?;
    Ok(())
}

fn p(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn glyph(opacity: f64) -> char {
    let last = RAMP.len() - 1;
    let i = (opacity.clamp(0.0, 1.0) * last as f64).round() as usize;
    char::from(RAMP[i.min(last)])
}
