mod component;
mod font;
mod placement;
mod render;
mod state;

pub use component::WordCloudCanvas;
pub use font::{FontError, FontHandle, load_font};
pub use placement::{CloudLabel, build_labels};
