//! Client for the knowledge-graph service (entity list and question answering).
//!
//! The chat assistant speaks the same `/ask` protocol, minus the graph.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::{ApiClient, RequestOptions};
use super::error::ApiError;
use super::transport::{FetchTransport, HttpTransport};
use crate::components::force_graph::GraphData;

/// Body of `POST /ask`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
	/// Human-readable answer; may be missing or empty.
	#[serde(default)]
	pub answer: Option<String>,
	/// Subgraph around the asked entity, when the backend found one.
	#[serde(default)]
	pub graph: Option<GraphData>,
}

impl AskResponse {
	/// The answer when it has any content.
	pub fn answer_text(&self) -> Option<&str> {
		self.answer.as_deref().filter(|a| !a.trim().is_empty())
	}
}

#[derive(Serialize)]
struct AskBody<'a> {
	question: &'a str,
}

#[derive(Deserialize)]
struct EntitiesBody {
	#[serde(default)]
	success: Option<bool>,
	#[serde(default)]
	count: Option<u64>,
	#[serde(default)]
	names: Option<Value>,
}

/// `/ask` and `/api/entities` against one backend.
#[derive(Clone, Debug)]
pub struct KnowledgeApi<T = FetchTransport> {
	client: ApiClient<T>,
}

impl KnowledgeApi<FetchTransport> {
	/// Backend at `base_url` over the platform fetch. An empty base means same origin.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			client: ApiClient::new(base_url),
		}
	}
}

impl<T: HttpTransport> KnowledgeApi<T> {
	/// Backend over an explicit transport.
	pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
		Self {
			client: ApiClient::with_transport(base_url, transport),
		}
	}

	/// `POST /ask` with `{ "question": question }`.
	///
	/// The backend reports failed lookups as an error status whose body still
	/// carries an `answer`; that answer is returned as a normal response. An
	/// error status without one fails with [`ApiError::Status`].
	pub async fn ask(&self, question: &str) -> Result<AskResponse, ApiError> {
		let options = RequestOptions::post_json(&AskBody { question })?;
		let response = self.client.send("/ask", options).await?;
		if response.is_success() {
			return serde_json::from_str(&response.body).map_err(|err| {
				let err = ApiError::from(err);
				error!("API request failed: /ask: {err}");
				err
			});
		}

		match serde_json::from_str::<AskResponse>(&response.body) {
			Ok(body) if body.answer_text().is_some() => {
				warn!("/ask answered with HTTP {}: {:?}", response.status, body.answer);
				Ok(body)
			}
			_ => {
				let err = ApiError::Status {
					status: response.status,
					status_text: response.status_text,
				};
				error!("API request failed: /ask: {err}");
				Err(err)
			}
		}
	}

	/// `GET /api/entities`.
	///
	/// Never fails: any error or unexpected shape yields an empty list, so an
	/// empty result can mean either "no entities" or "could not load them".
	pub async fn load_entities(&self) -> Vec<String> {
		let body: EntitiesBody = match self
			.client
			.request_as("/api/entities", RequestOptions::get())
			.await
		{
			Ok(body) => body,
			Err(err) => {
				warn!("failed to load entities: {err}");
				return Vec::new();
			}
		};

		match (body.success, body.names) {
			(Some(true), Some(Value::Array(names))) => {
				let names: Vec<String> = names
					.into_iter()
					.filter_map(|n| match n {
						Value::String(s) => Some(s),
						_ => None,
					})
					.collect();
				info!(
					"loaded {} entities (backend count {})",
					names.len(),
					body.count.map_or_else(|| "?".to_string(), |c| c.to_string())
				);
				names
			}
			(success, names) => {
				warn!("unexpected entity payload: success={success:?} names={names:?}");
				Vec::new()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::transport::Method;
	use crate::api::transport::mock::MockTransport;

	#[tokio::test]
	async fn loads_names_on_success() {
		let mock = MockTransport::default().respond(
			200,
			"OK",
			r#"{"success":true,"count":3,"names":["Alien","Ridley Scott",7,"Fox"]}"#,
		);
		let api = KnowledgeApi::with_transport("", mock.clone());

		let names = api.load_entities().await;

		assert_eq!(names, vec!["Alien", "Ridley Scott", "Fox"]);
		assert_eq!(mock.sent()[0].url, "/api/entities");
		assert_eq!(mock.sent()[0].method, Method::Get);
	}

	#[tokio::test]
	async fn missing_names_yields_empty() {
		let mock = MockTransport::default().respond(200, "OK", r#"{"success":true,"count":0}"#);
		let api = KnowledgeApi::with_transport("", mock);

		assert!(api.load_entities().await.is_empty());
	}

	#[tokio::test]
	async fn unsuccessful_or_malformed_payload_yields_empty() {
		let mock = MockTransport::default()
			.respond(200, "OK", r#"{"success":false,"names":["a"]}"#)
			.respond(200, "OK", r#"{"success":true,"names":"a,b"}"#)
			.respond(200, "OK", r#"["a","b"]"#);
		let api = KnowledgeApi::with_transport("", mock);

		assert!(api.load_entities().await.is_empty());
		assert!(api.load_entities().await.is_empty());
		assert!(api.load_entities().await.is_empty());
	}

	#[tokio::test]
	async fn rejected_fetch_or_error_status_yields_empty() {
		let mock = MockTransport::default()
			.fail("offline")
			.respond(500, "Internal Server Error", r#"{"error":"db","names":[]}"#);
		let api = KnowledgeApi::with_transport("", mock);

		assert!(api.load_entities().await.is_empty());
		assert!(api.load_entities().await.is_empty());
	}

	#[tokio::test]
	async fn ask_posts_question_and_decodes_graph() {
		let mock = MockTransport::default().respond(
			200,
			"OK",
			r#"{
				"answer": "found 2 entities",
				"graph": {
					"nodes": [
						{"id": 0, "label": "Alien", "group": "movie", "title": "Movie<br>Year: 1979"},
						{"id": 1, "label": "Ridley Scott", "group": "person"}
					],
					"edges": [{"from": 1, "to": 0, "label": "DIRECTED"}]
				}
			}"#,
		);
		let api = KnowledgeApi::with_transport("http://kg", mock.clone());

		let response = api.ask("Alien").await.unwrap();

		let sent = &mock.sent()[0];
		assert_eq!(sent.url, "http://kg/ask");
		assert_eq!(sent.body.as_deref(), Some(r#"{"question":"Alien"}"#));
		assert_eq!(response.answer_text(), Some("found 2 entities"));
		let graph = response.graph.unwrap();
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.edges[0].label_text().as_deref(), Some("DIRECTED"));
	}

	#[tokio::test]
	async fn ask_tolerates_null_graph_and_blank_answer() {
		let mock = MockTransport::default().respond(200, "OK", r#"{"answer":"  ","graph":null}"#);
		let api = KnowledgeApi::with_transport("", mock);

		let response = api.ask("x").await.unwrap();

		assert_eq!(response.answer_text(), None);
		assert!(response.graph.is_none());
	}

	#[tokio::test]
	async fn error_status_with_answer_body_keeps_the_answer() {
		let mock = MockTransport::default().respond(
			500,
			"INTERNAL SERVER ERROR",
			r#"{"answer":"query failed: neo4j unavailable","graph":null}"#,
		);
		let api = KnowledgeApi::with_transport("", mock);

		let response = api.ask("Alien").await.unwrap();

		assert_eq!(response.answer_text(), Some("query failed: neo4j unavailable"));
		assert!(response.graph.is_none());
	}

	#[tokio::test]
	async fn error_status_without_answer_fails_with_status() {
		let mock = MockTransport::default()
			.respond(502, "Bad Gateway", "<html>upstream down</html>")
			.respond(500, "INTERNAL SERVER ERROR", r#"{"detail":"boom"}"#);
		let api = KnowledgeApi::with_transport("", mock);

		let first = api.ask("a").await.unwrap_err();
		let second = api.ask("b").await.unwrap_err();

		assert_eq!(
			first,
			ApiError::Status {
				status: 502,
				status_text: "Bad Gateway".into()
			}
		);
		assert!(second.to_string().contains("500"));
	}

	#[tokio::test]
	async fn numeric_labels_do_not_lose_the_answer() {
		let mock = MockTransport::default().respond(
			200,
			"OK",
			r#"{"answer":"a film","graph":{"nodes":[{"id":1,"label":1979,"group":null}],"edges":[{"from":1,"to":1,"label":2}]}}"#,
		);
		let api = KnowledgeApi::with_transport("", mock);

		let response = api.ask("Alien").await.unwrap();

		assert_eq!(response.answer_text(), Some("a film"));
		let graph = response.graph.unwrap();
		assert_eq!(graph.nodes[0].label_text().as_deref(), Some("1979"));
		assert_eq!(graph.nodes[0].group_text(), None);
		assert_eq!(graph.edges[0].label_text().as_deref(), Some("2"));
	}
}
