mod component;
mod model;

pub use component::ChatPanel;
