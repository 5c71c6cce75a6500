mod panel;
mod query;

pub use panel::{EntityGraphPanel, ask_about};
pub use query::GraphView;
