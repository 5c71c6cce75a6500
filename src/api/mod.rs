//! REST clients for the classifier, knowledge-graph and chat backends.

mod classifier;
mod client;
mod error;
mod knowledge;
mod transport;

pub use classifier::{DEFAULT_CLASSIFIER_URL, Health, TextClassifierApi};
pub use client::{ApiClient, RequestOptions};
pub use error::ApiError;
pub use knowledge::{AskResponse, KnowledgeApi};
pub use transport::{FetchTransport, HttpRequest, HttpResponse, HttpTransport, Method};

#[cfg(test)]
pub(crate) use transport::mock;
