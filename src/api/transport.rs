//! HTTP plumbing behind the API clients.
//!
//! Uses web-sys fetch for WASM, reqwest for native.

use async_trait::async_trait;

use super::error::ApiError;

/// HTTP verbs the backends use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
	/// `GET`
	#[default]
	Get,
	/// `POST`
	Post,
}

impl Method {
	/// Upper-case wire name.
	pub fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}

/// A fully resolved request, ready for the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
	/// Verb.
	pub method: Method,
	/// Absolute or same-origin URL.
	pub url: String,
	/// Header pairs in send order.
	pub headers: Vec<(String, String)>,
	/// Encoded body, if any.
	pub body: Option<String>,
}

/// Raw response; status interpretation is left to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// Numeric status code.
	pub status: u16,
	/// Reason phrase.
	pub status_text: String,
	/// Body as text.
	pub body: String,
}

impl HttpResponse {
	/// Same rule as `Response.ok` in the browser.
	pub fn is_success(&self) -> bool {
		(200..=299).contains(&self.status)
	}
}

/// Something that can perform one HTTP exchange.
///
/// Futures are not `Send`: everything runs on the browser's UI thread.
#[async_trait(?Send)]
pub trait HttpTransport {
	/// Perform the exchange. Only transport failures are errors here; any
	/// status code is returned as a response.
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// The real transport: `window.fetch` in the browser, reqwest elsewhere.
#[derive(Clone, Debug, Default)]
pub struct FetchTransport {
	#[cfg(not(target_arch = "wasm32"))]
	client: reqwest::Client,
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
		use wasm_bindgen::{JsCast, JsValue};
		use wasm_bindgen_futures::JsFuture;
		use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

		let headers =
			Headers::new().map_err(|e| ApiError::Transport(format!("headers error: {:?}", e)))?;
		for (name, value) in &request.headers {
			headers
				.set(name, value)
				.map_err(|e| ApiError::Transport(format!("header {name}: {:?}", e)))?;
		}

		let opts = RequestInit::new();
		opts.set_method(request.method.as_str());
		opts.set_mode(RequestMode::Cors);
		opts.set_headers(&headers);
		if let Some(body) = &request.body {
			opts.set_body(&JsValue::from_str(body));
		}

		let req = Request::new_with_str_and_init(&request.url, &opts)
			.map_err(|e| ApiError::Transport(format!("request error: {:?}", e)))?;

		let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".into()))?;
		let resp_value = JsFuture::from(window.fetch_with_request(&req))
			.await
			.map_err(|e| ApiError::Transport(format!("fetch error: {:?}", e)))?;
		let resp: Response = resp_value
			.dyn_into()
			.map_err(|_| ApiError::Transport("response is not a Response".into()))?;

		let text_promise = resp
			.text()
			.map_err(|e| ApiError::Transport(format!("body promise error: {:?}", e)))?;
		let body = JsFuture::from(text_promise)
			.await
			.map_err(|e| ApiError::Transport(format!("body error: {:?}", e)))?
			.as_string()
			.unwrap_or_default();

		Ok(HttpResponse {
			status: resp.status(),
			status_text: resp.status_text(),
			body,
		})
	}
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
	async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
		let method = match request.method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
		};
		let mut builder = self.client.request(method, &request.url);
		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if let Some(body) = request.body {
			builder = builder.body(body);
		}

		let response = builder
			.send()
			.await
			.map_err(|e| ApiError::Transport(e.to_string()))?;
		let status = response.status();
		let body = response
			.text()
			.await
			.map_err(|e| ApiError::Transport(e.to_string()))?;

		Ok(HttpResponse {
			status: status.as_u16(),
			status_text: status.canonical_reason().unwrap_or_default().to_string(),
			body,
		})
	}
}

#[cfg(test)]
pub(crate) mod mock {
	use std::cell::RefCell;
	use std::collections::VecDeque;
	use std::rc::Rc;

	use super::*;

	/// Replays canned responses in order and records what was sent.
	#[derive(Clone, Default)]
	pub struct MockTransport {
		responses: Rc<RefCell<VecDeque<Result<HttpResponse, ApiError>>>>,
		sent: Rc<RefCell<Vec<HttpRequest>>>,
	}

	impl MockTransport {
		pub fn respond(self, status: u16, status_text: &str, body: &str) -> Self {
			self.responses.borrow_mut().push_back(Ok(HttpResponse {
				status,
				status_text: status_text.into(),
				body: body.into(),
			}));
			self
		}

		pub fn fail(self, message: &str) -> Self {
			self.responses
				.borrow_mut()
				.push_back(Err(ApiError::Transport(message.into())));
			self
		}

		pub fn sent(&self) -> Vec<HttpRequest> {
			self.sent.borrow().clone()
		}
	}

	#[async_trait(?Send)]
	impl HttpTransport for MockTransport {
		async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
			self.sent.borrow_mut().push(request);
			self.responses
				.borrow_mut()
				.pop_front()
				.unwrap_or_else(|| Err(ApiError::Transport("no canned response".into())))
		}
	}
}
