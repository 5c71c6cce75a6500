use thiserror::Error;

/// Failure of a backend call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApiError {
	/// The request never produced a response (network down, CORS, DNS...).
	#[error("network error: {0}")]
	Transport(String),

	/// The server answered with a status outside `200..=299`.
	#[error("HTTP {status}: {status_text}")]
	Status {
		/// Numeric HTTP status.
		status: u16,
		/// Reason phrase reported by the server, possibly empty.
		status_text: String,
	},

	/// The body could not be encoded or decoded as the expected JSON.
	#[error("malformed response: {0}")]
	Decode(String),
}

impl From<serde_json::Error> for ApiError {
	fn from(err: serde_json::Error) -> Self {
		ApiError::Decode(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_message_carries_code_and_text() {
		let err = ApiError::Status {
			status: 500,
			status_text: "Internal Server Error".into(),
		};
		assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
	}

	#[test]
	fn serde_errors_become_decode_errors() {
		let err: ApiError = serde_json::from_str::<serde_json::Value>("{")
			.unwrap_err()
			.into();
		assert!(matches!(err, ApiError::Decode(_)));
	}
}
