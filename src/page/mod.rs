pub mod document;
pub mod location;
pub mod render;

pub use document::Document;
pub use location::Location;
pub use render::render_videos;
