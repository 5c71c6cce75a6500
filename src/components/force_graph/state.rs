use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::types::{GraphData, color_hint, node_key};
use crate::config::PhysicsConfig;

pub const NODE_RADIUS: f64 = 9.0;
pub const HIT_RADIUS: f64 = 14.0;
pub const DEFAULT_EDGE_COLOR: &str = "#aaaaaa";
pub const FRAME_DT: f32 = 0.016;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum NodeShape {
	#[default]
	Dot,
	Ellipse,
	Box,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupStyle {
	pub background: &'static str,
	pub border: &'static str,
	pub shape: NodeShape,
}

const MOVIE: GroupStyle = GroupStyle {
	background: "#e91e63",
	border: "#c2185b",
	shape: NodeShape::Ellipse,
};
const PERSON: GroupStyle = GroupStyle {
	background: "#4caf50",
	border: "#388e3c",
	shape: NodeShape::Dot,
};
const COMPANY: GroupStyle = GroupStyle {
	background: "#2196f3",
	border: "#1976d2",
	shape: NodeShape::Box,
};
const OTHER: GroupStyle = GroupStyle {
	background: "#97c2fc",
	border: "#2b7ce9",
	shape: NodeShape::Dot,
};

pub fn group_style(group: Option<&str>) -> GroupStyle {
	match group {
		Some("movie") => MOVIE,
		Some("person") => PERSON,
		Some("company") => COMPANY,
		_ => OTHER,
	}
}

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub label: Option<String>,
	pub color: String,
	pub border: String,
	pub shape: NodeShape,
	pub tooltip: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: Option<String>,
	pub color: String,
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	/// Last pointer position in screen space, anchors the tooltip.
	pub pointer: (f64, f64),
	delay_t: f64,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

fn simulation_parameters(physics: &PhysicsConfig) -> SimulationParameters {
	SimulationParameters {
		force_charge: (physics.repulsion_strength * 0.15) as f32,
		force_spring: (7.0 / physics.node_distance.max(1.0)) as f32,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

fn tooltip_lines(title: Option<&str>) -> Vec<String> {
	title
		.map(|t| {
			t.split("<br>")
				.map(str::trim)
				.filter(|l| !l.is_empty())
				.map(str::to_string)
				.collect()
		})
		.unwrap_or_default()
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64, physics: &PhysicsConfig) -> Self {
		let mut graph = ForceGraph::new(simulation_parameters(physics));
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();
		let ring = physics.node_distance;

		for (i, node) in data.nodes.iter().enumerate() {
			let style = group_style(node.group_text().as_deref());
			let color = color_hint(node.color.as_ref()).unwrap_or_else(|| style.background.into());
			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let (x, y) = ((ring * angle.cos()) as f32, (ring * angle.sin()) as f32);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					label: node.label_text(),
					color,
					border: style.border.into(),
					shape: style.shape,
					tooltip: tooltip_lines(node.title_text().as_deref()),
				},
			});
			id_to_idx.insert(node_key(&node.id), idx);
		}

		for edge in &data.edges {
			if let (Some(&src), Some(&tgt)) = (
				id_to_idx.get(&node_key(&edge.from)),
				id_to_idx.get(&node_key(&edge.to)),
			) {
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push(EdgeInfo {
					source: src,
					target: tgt,
					label: edge.label_text(),
					color: color_hint(edge.color.as_ref())
						.unwrap_or_else(|| DEFAULT_EDGE_COLOR.into()),
				});
			}
		}

		for _ in 0..physics.stabilization_iterations {
			graph.update(FRAME_DT);
		}

		Self {
			graph,
			edges,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
		}
	}

	pub fn node_count(&self) -> usize {
		let mut count = 0;
		self.graph.visit_nodes(|_| count += 1);
		count
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::new();
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Tooltip lines of the node under the pointer, if it has any.
	pub fn tooltip(&self) -> Option<Vec<String>> {
		let idx = self.hover.node?;
		let mut lines = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx && !node.data.user_data.tooltip.is_empty() {
				lines = Some(node.data.user_data.tooltip.clone());
			}
		});
		lines
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn sample() -> GraphData {
		serde_json::from_value(json!({
			"nodes": [
				{"id": 0, "label": "Alien", "group": "movie", "title": "Movie<br>Year: 1979"},
				{"id": 1, "label": "Ridley Scott", "group": "person"},
				{"id": "2", "label": "Fox", "group": "company", "color": {"background": "#123456"}}
			],
			"edges": [
				{"from": 1, "to": 0, "label": "DIRECTED"},
				{"from": 2, "to": 0, "color": {"color": "#ff0000"}},
				{"from": 0, "to": 99}
			]
		}))
		.unwrap()
	}

	#[test]
	fn builds_nodes_and_skips_dangling_edges() {
		let state = ForceGraphState::new(&sample(), 800.0, 600.0, &PhysicsConfig::default());

		assert_eq!(state.node_count(), 3);
		assert_eq!(state.edges.len(), 2);
		assert_eq!(state.edges[0].label.as_deref(), Some("DIRECTED"));
		assert_eq!(state.edges[0].color, DEFAULT_EDGE_COLOR);
		assert_eq!(state.edges[1].color, "#ff0000");
	}

	#[test]
	fn styles_follow_group_with_color_override() {
		let state = ForceGraphState::new(&sample(), 800.0, 600.0, &PhysicsConfig::default());
		let mut seen = Vec::new();
		state.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			seen.push((info.label.clone().unwrap_or_default(), info.color.clone(), info.shape));
		});
		seen.sort();

		assert_eq!(
			seen,
			vec![
				("Alien".into(), "#e91e63".into(), NodeShape::Ellipse),
				("Fox".into(), "#123456".into(), NodeShape::Box),
				("Ridley Scott".into(), "#4caf50".into(), NodeShape::Dot),
			]
		);
		assert_eq!(group_style(Some("genre")), OTHER);
	}

	#[test]
	fn stabilization_keeps_positions_finite() {
		let state = ForceGraphState::new(&sample(), 800.0, 600.0, &PhysicsConfig::default());
		for (x, y) in state.positions().values() {
			assert!(x.is_finite() && y.is_finite());
		}
	}

	#[test]
	fn hover_collects_neighbors_and_tooltip() {
		let mut state = ForceGraphState::new(&sample(), 800.0, 600.0, &PhysicsConfig::default());
		let alien = state.edges[0].target;
		state.set_hover(Some(alien));

		assert_eq!(state.hover.neighbors.len(), 2);
		assert!(state.is_highlighted(state.edges[0].source));
		assert_eq!(
			state.tooltip(),
			Some(vec!["Movie".to_string(), "Year: 1979".to_string()])
		);

		state.set_hover(None);
		assert!(state.has_active_highlight());
		assert_eq!(state.tooltip(), None);
	}

	#[test]
	fn empty_graph_is_valid() {
		let state = ForceGraphState::new(&GraphData::default(), 10.0, 10.0, &PhysicsConfig::default());
		assert_eq!(state.node_count(), 0);
		assert!(state.edges.is_empty());
	}
}
