use log::error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::transport::{FetchTransport, HttpRequest, HttpResponse, HttpTransport, Method};

const DEFAULT_HEADERS: &[(&str, &str)] = &[("Content-Type", "application/json")];

/// Caller-side knobs for a single request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Verb, `GET` unless set.
	pub method: Method,
	/// Extra headers; these override the JSON defaults by name.
	pub headers: Vec<(String, String)>,
	/// Pre-encoded body.
	pub body: Option<String>,
}

impl RequestOptions {
	/// Plain `GET`.
	pub fn get() -> Self {
		Self::default()
	}

	/// `POST` with `body` encoded as JSON.
	pub fn post_json<B: Serialize + ?Sized>(body: &B) -> Result<Self, ApiError> {
		Ok(Self {
			method: Method::Post,
			headers: Vec::new(),
			body: Some(serde_json::to_string(body)?),
		})
	}

	/// Add or replace a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}
}

/// JSON-over-HTTP client bound to one base URL.
#[derive(Clone, Debug)]
pub struct ApiClient<T = FetchTransport> {
	base_url: String,
	transport: T,
}

impl ApiClient<FetchTransport> {
	/// Client using the platform fetch.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self::with_transport(base_url, FetchTransport::default())
	}
}

impl<T: HttpTransport> ApiClient<T> {
	/// Client with an explicit transport.
	pub fn with_transport(base_url: impl Into<String>, transport: T) -> Self {
		Self {
			base_url: base_url.into(),
			transport,
		}
	}

	/// Base URL every endpoint is appended to.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Send a request to `endpoint` and decode the JSON body.
	///
	/// Errors are logged, then returned unchanged.
	pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
		self.request_as(endpoint, options).await
	}

	/// Like [`ApiClient::request`], decoding straight into `R`.
	pub async fn request_as<R: DeserializeOwned>(
		&self,
		endpoint: &str,
		options: RequestOptions,
	) -> Result<R, ApiError> {
		let result = self.exchange(endpoint, options).await;
		if let Err(err) = &result {
			error!("API request failed: {endpoint}: {err}");
		}
		result
	}

	/// Send a request to `endpoint` and return the raw response, whatever its
	/// status. Only transport failures are errors.
	pub async fn send(&self, endpoint: &str, options: RequestOptions) -> Result<HttpResponse, ApiError> {
		let result = self.transport.send(self.build_request(endpoint, options)).await;
		if let Err(err) = &result {
			error!("API request failed: {endpoint}: {err}");
		}
		result
	}

	fn build_request(&self, endpoint: &str, options: RequestOptions) -> HttpRequest {
		HttpRequest {
			method: options.method,
			url: format!("{}{}", self.base_url, endpoint),
			headers: merge_headers(options.headers),
			body: options.body,
		}
	}

	async fn exchange<R: DeserializeOwned>(
		&self,
		endpoint: &str,
		options: RequestOptions,
	) -> Result<R, ApiError> {
		let response = self.transport.send(self.build_request(endpoint, options)).await?;
		if !response.is_success() {
			return Err(ApiError::Status {
				status: response.status,
				status_text: response.status_text,
			});
		}
		Ok(serde_json::from_str(&response.body)?)
	}
}

fn merge_headers(overrides: Vec<(String, String)>) -> Vec<(String, String)> {
	let mut merged: Vec<(String, String)> = DEFAULT_HEADERS
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect();
	for (name, value) in overrides {
		match merged.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
			Some(slot) => *slot = (name, value),
			None => merged.push((name, value)),
		}
	}
	merged
}
