//! Shape payloads and their `DrawList` push helpers.

pub mod ellipse;
pub mod line;
pub mod rect;
pub mod triangle;

pub use ellipse::EllipseCmd;
pub use line::LineCmd;
pub use rect::RectCmd;
pub use triangle::TriangleCmd;
