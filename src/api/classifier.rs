//! Client for the text-classification service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::client::{ApiClient, RequestOptions};
use super::error::ApiError;
use super::transport::{FetchTransport, HttpTransport};

/// Where the classifier listens when nothing else is configured.
pub const DEFAULT_CLASSIFIER_URL: &str = "http://localhost:8000";

/// Body of `GET /health`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Health {
	/// Whether the service reports a usable model. Absent means no.
	#[serde(default)]
	pub model_loaded: bool,
	/// Free-form status word, e.g. `"healthy"`.
	#[serde(default)]
	pub status: Option<String>,
	/// Per-model load flags, when the service reports them.
	#[serde(default)]
	pub models: BTreeMap<String, bool>,
	/// Everything else the service sent.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

#[derive(Serialize)]
struct PredictBody<'a> {
	text: &'a str,
}

#[derive(Serialize)]
struct PredictBatchBody<'a, S: AsRef<str>> {
	texts: &'a [S],
}

/// Typed calls against the classifier endpoints.
#[derive(Clone, Debug)]
pub struct TextClassifierApi<T = FetchTransport> {
	client: ApiClient<T>,
}

impl TextClassifierApi<FetchTransport> {
	/// Classifier at `base_url` over the platform fetch.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			client: ApiClient::new(base_url),
		}
	}
}

impl Default for TextClassifierApi<FetchTransport> {
	fn default() -> Self {
		Self::new(DEFAULT_CLASSIFIER_URL)
	}
}

impl<T: HttpTransport> TextClassifierApi<T> {
	/// Classifier over an explicit transport.
	pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
		Self {
			client: ApiClient::with_transport(base_url, transport),
		}
	}

	/// `GET /health`.
	pub async fn health(&self) -> Result<Health, ApiError> {
		self.client.request_as("/health", RequestOptions::get()).await
	}

	/// `GET /categories`.
	pub async fn categories(&self) -> Result<Value, ApiError> {
		self.client.request("/categories", RequestOptions::get()).await
	}

	/// `POST /predict` with `{ "text": text }`; the body comes back as decoded.
	pub async fn predict(&self, text: &str) -> Result<Value, ApiError> {
		let options = RequestOptions::post_json(&PredictBody { text })?;
		self.client.request("/predict", options).await
	}

	/// `POST /predict/batch` with `{ "texts": [...] }`.
	pub async fn predict_batch<S>(&self, texts: &[S]) -> Result<Value, ApiError>
	where
		S: AsRef<str> + Serialize,
	{
		let options = RequestOptions::post_json(&PredictBatchBody { texts })?;
		self.client.request("/predict/batch", options).await
	}
}
