//! What the graph panel shows for the selected entity.
//!
//! Queries are numbered. Only the most recently issued one may land, so a
//! slow answer for an earlier click cannot replace a newer one.

use log::debug;

use crate::api::{ApiError, AskResponse};
use crate::components::force_graph::GraphData;

pub const NO_VALID_ANSWER: &str = "No valid answer received.";

#[derive(Clone, Debug, Default, PartialEq)]
pub enum GraphQuery {
	#[default]
	Idle,
	Loading {
		entity: String,
	},
	Loaded {
		entity: String,
		answer: String,
		graph: Option<GraphData>,
	},
	Failed {
		entity: String,
		message: String,
	},
}

impl GraphQuery {
	/// Text for the answer panel.
	pub fn message(&self) -> Option<String> {
		match self {
			GraphQuery::Idle => None,
			GraphQuery::Loading { entity } => Some(format!("Looking up {entity}...")),
			GraphQuery::Loaded { answer, .. } => Some(answer.clone()),
			GraphQuery::Failed { message, .. } => Some(message.clone()),
		}
	}

	/// Graph to draw. `None` keeps the graph area hidden.
	pub fn graph(&self) -> Option<&GraphData> {
		match self {
			GraphQuery::Loaded { graph, .. } => graph.as_ref(),
			_ => None,
		}
	}

	pub fn is_failed(&self) -> bool {
		matches!(self, GraphQuery::Failed { .. })
	}
}

/// Handle for one issued query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryTicket {
	generation: u64,
	entity: String,
}

impl QueryTicket {
	pub fn entity(&self) -> &str {
		&self.entity
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphView {
	state: GraphQuery,
	generation: u64,
}

impl GraphView {
	pub fn state(&self) -> &GraphQuery {
		&self.state
	}

	/// Drop whatever is shown and start looking up `entity`.
	pub fn begin(&mut self, entity: &str) -> QueryTicket {
		self.generation += 1;
		self.state = GraphQuery::Loading {
			entity: entity.to_string(),
		};
		QueryTicket {
			generation: self.generation,
			entity: entity.to_string(),
		}
	}

	/// Apply the outcome of `ticket`. Returns `false` when a newer query has
	/// been issued since, in which case nothing changes.
	pub fn resolve(&mut self, ticket: QueryTicket, result: Result<AskResponse, ApiError>) -> bool {
		if ticket.generation != self.generation {
			debug!(
				"discarding stale graph result for {} (query {} superseded by {})",
				ticket.entity, ticket.generation, self.generation
			);
			return false;
		}
		let entity = ticket.entity;
		self.state = match result {
			Ok(response) => GraphQuery::Loaded {
				answer: response.answer_text().unwrap_or(NO_VALID_ANSWER).to_string(),
				// `{}` or a node-less graph leaves the graph area hidden.
				graph: response.graph.filter(|g| !g.is_empty()),
				entity,
			},
			Err(err) => GraphQuery::Failed {
				message: format!("Request failed: {err}"),
				entity,
			},
		};
		true
	}
}
