use bytes::Bytes;
use http::header::{CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request};
use http_body_util::Full;
use serde::Serialize;
use std::env;

const SERVICE_VERSION: &str = "V1";

pub(crate) const SDK_ANALYTICS: HeaderName = HeaderName::from_static("x-ibmcloud-sdk-analytics");

/// Everything needed to issue one operation, before it is bound to a service
/// URL and authenticated.
#[derive(Debug)]
pub(crate) struct RequestBuilder {
    operation_id: &'static str,
    method: Method,
    path: String,
    query: String,
    body: Option<Bytes>,
    headers: HeaderMap,
}

impl RequestBuilder {
    pub(crate) fn new(operation_id: &'static str, method: Method, path: String) -> Self {
        Self {
            operation_id,
            method,
            path,
            query: String::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub(crate) fn operation_id(&self) -> &'static str {
        self.operation_id
    }

    pub(crate) fn query<Q>(mut self, query: &Q) -> Result<Self, crate::Error>
    where
        Q: Serialize,
    {
        self.query = serde_urlencoded::to_string(query)?;
        Ok(self)
    }

    pub(crate) fn json<B>(mut self, body: &B) -> Result<Self, crate::Error>
    where
        B: Serialize,
    {
        self.body = Some(serde_json::to_vec(body)?.into());
        Ok(self)
    }

    /// Caller-supplied headers. They win over every generated header.
    pub(crate) fn headers(mut self, headers: &HeaderMap) -> Self {
        self.headers = headers.clone();
        self
    }

    pub(crate) fn build(
        self,
        service_url: &str,
        default_headers: &HeaderMap,
    ) -> Result<Request<Full<Bytes>>, crate::Error> {
        let mut uri = format!("{}{}", service_url.trim_end_matches('/'), self.path);
        if !self.query.is_empty() {
            uri.push('?');
            uri.push_str(&self.query);
        }

        let mut headers = default_headers.clone();
        headers.extend(sdk_headers(self.operation_id)?);
        if self.body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        headers.extend(self.headers);

        let mut request = Request::builder()
            .method(self.method)
            .uri(uri.parse::<http::Uri>()?)
            .body(Full::new(self.body.unwrap_or_default()))?;
        *request.headers_mut() = headers;
        Ok(request)
    }
}

pub(crate) fn sdk_headers(operation_id: &str) -> Result<HeaderMap, crate::Error> {
    let analytics = format!(
        "service_name={};service_version={SERVICE_VERSION};operation_id={operation_id}",
        crate::GlobalTaggingV1::DEFAULT_SERVICE_NAME,
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        SDK_ANALYTICS,
        HeaderValue::from_str(&analytics).map_err(http::Error::from)?,
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&user_agent()).map_err(http::Error::from)?,
    );
    Ok(headers)
}

fn user_agent() -> String {
    format!(
        "{}-rust/{} ({}; {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env::consts::OS,
        env::consts::ARCH,
    )
}

pub(crate) fn path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
