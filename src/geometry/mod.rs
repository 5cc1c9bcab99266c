pub mod frame;
pub mod rect;
pub mod triangle;

pub use frame::{FramedTriangle, LocalFrame};
pub use rect::Rect;
pub use triangle::Triangle;
