pub mod animation;
pub mod chat;
pub mod entity_graph;
pub mod force_graph;
pub mod word_cloud;
