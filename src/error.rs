use bytes::Bytes;
use http::{HeaderMap, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    MissingArgument(#[from] schemas::MissingArgument),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Tls(#[from] rustls::Error),
    #[error("failed to encode request body: {0}")]
    EncodeBody(#[from] serde_json::Error),
    #[error("failed to encode query: {0}")]
    EncodeQuery(#[from] serde_urlencoded::ser::Error),
    #[error(transparent)]
    Uri(#[from] http::uri::InvalidUri),
    #[error(transparent)]
    Http(#[from] http::Error),
    #[error(transparent)]
    Api(Box<ApiError>),
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("transport error: {0}")]
    Transport(#[source] tower::BoxError),
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        Self::Api(Box::new(e))
    }
}

/// A non-success response, passed through as received.
#[derive(Clone, Debug, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        let message = serde_json::from_slice::<serde_json::Value>(&body)
            .ok()
            .and_then(|body| error_message(&body))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown Error")
                    .to_owned()
            });
        Self {
            status,
            headers,
            body,
            message,
        }
    }
}

fn error_message(body: &serde_json::Value) -> Option<String> {
    if let Some(message) = body
        .get("errors")
        .and_then(|errors| errors.get(0))
        .and_then(|error| error.get("message"))
        .and_then(serde_json::Value::as_str)
    {
        return Some(message.to_owned());
    }
    ["error", "message", "errorMessage"]
        .into_iter()
        .find_map(|key| body.get(key)?.as_str())
        .map(str::to_owned)
}
