use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node as the backend sends it. Nothing is required; a node without an
/// `id` can still be drawn but no edge can reach it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	#[serde(default)]
	pub id: Value,
	#[serde(default)]
	pub label: Option<Value>,
	#[serde(default)]
	pub group: Option<Value>,
	/// Tooltip, lines separated by `<br>`.
	#[serde(default)]
	pub title: Option<Value>,
	#[serde(default)]
	pub color: Option<Value>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl GraphNode {
	pub fn label_text(&self) -> Option<String> {
		display_text(self.label.as_ref())
	}

	pub fn group_text(&self) -> Option<String> {
		display_text(self.group.as_ref())
	}

	pub fn title_text(&self) -> Option<String> {
		display_text(self.title.as_ref())
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	#[serde(default)]
	pub from: Value,
	#[serde(default)]
	pub to: Value,
	#[serde(default)]
	pub label: Option<Value>,
	#[serde(default)]
	pub color: Option<Value>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl GraphEdge {
	pub fn label_text(&self) -> Option<String> {
		display_text(self.label.as_ref())
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Text for a loosely typed display field: strings as they are, numbers and
/// booleans printed, `null` as nothing.
pub fn display_text(value: Option<&Value>) -> Option<String> {
	match value? {
		Value::Null => None,
		Value::String(s) => Some(s.clone()),
		other => Some(other.to_string()),
	}
}

/// Identity used to match edge endpoints to nodes; `1` and `"1"` are the same node.
pub fn node_key(id: &Value) -> String {
	match id {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// Pick a CSS color out of a vis-style hint: either a string or an object with
/// `background` / `color`.
pub fn color_hint(hint: Option<&Value>) -> Option<String> {
	match hint? {
		Value::String(s) => Some(s.clone()),
		Value::Object(map) => ["background", "color"]
			.iter()
			.find_map(|k| map.get(*k).and_then(Value::as_str))
			.map(str::to_string),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn numeric_and_string_ids_share_keys() {
		assert_eq!(node_key(&json!(3)), "3");
		assert_eq!(node_key(&json!("3")), "3");
		assert_eq!(node_key(&json!("Alien")), "Alien");
	}

	#[test]
	fn color_hint_accepts_string_or_object() {
		assert_eq!(color_hint(Some(&json!("#abc"))).as_deref(), Some("#abc"));
		assert_eq!(
			color_hint(Some(&json!({"color": "#aaaaaa"}))).as_deref(),
			Some("#aaaaaa")
		);
		assert_eq!(
			color_hint(Some(&json!({"background": "#e91e63", "color": "#000"}))).as_deref(),
			Some("#e91e63")
		);
		assert_eq!(color_hint(Some(&json!(5))), None);
		assert_eq!(color_hint(None), None);
	}

	#[test]
	fn unknown_fields_are_kept() {
		let node: GraphNode =
			serde_json::from_value(json!({"id": 1, "label": "x", "shape": "box"})).unwrap();
		assert_eq!(node.extra.get("shape"), Some(&json!("box")));
		assert_eq!(node.group, None);
	}

	#[test]
	fn display_fields_accept_any_json_type() {
		let node: GraphNode = serde_json::from_value(json!({
			"id": 1,
			"label": 1979,
			"group": null,
			"title": "Year<br>1979"
		}))
		.unwrap();
		assert_eq!(node.label_text().as_deref(), Some("1979"));
		assert_eq!(node.group_text(), None);
		assert_eq!(node.title_text().as_deref(), Some("Year<br>1979"));

		let edge: GraphEdge = serde_json::from_value(json!({"from": 1, "to": 2, "label": true})).unwrap();
		assert_eq!(edge.label_text().as_deref(), Some("true"));
		assert_eq!(display_text(Some(&json!(["a"]))).as_deref(), Some(r#"["a"]"#));
	}

	#[test]
	fn graph_without_nodes_is_empty() {
		let empty: GraphData = serde_json::from_value(json!({})).unwrap();
		assert!(empty.is_empty());
		let one: GraphData = serde_json::from_value(json!({"nodes": [{"id": 1}]})).unwrap();
		assert!(!one.is_empty());
	}
}
