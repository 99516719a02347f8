use crate::options::{DeleteTagAllOptions, DeleteTagOptions, ListTagsOptions, TagRequest};
use crate::request::RequestBuilder;
use crate::{ApiError, Authenticator, Config, DetailedResponse, Error, Transport};
use futures::TryFutureExt;
use http::{HeaderMap, Method};
use schemas::{DeleteTagResults, DeleteTagsResult, TagList, TagResults};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tower::ServiceExt;

/// Client for the Global Tagging API.
///
/// Cloning is cheap and every call is independent: one request, no retries,
/// no cached state.
#[derive(Clone)]
pub struct GlobalTaggingV1 {
    transport: Transport,
    authenticator: Arc<dyn Authenticator>,
    service_url: String,
    default_headers: HeaderMap,
}

impl fmt::Debug for GlobalTaggingV1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalTaggingV1")
            .field("service_url", &self.service_url)
            .finish_non_exhaustive()
    }
}

impl GlobalTaggingV1 {
    pub const DEFAULT_SERVICE_URL: &'static str = "https://tags.global-search-tagging.cloud.ibm.com/";
    pub const DEFAULT_SERVICE_NAME: &'static str = "global_tagging";

    pub fn new<A>(authenticator: A) -> Result<Self, Error>
    where
        A: Authenticator + 'static,
    {
        let transport = crate::misc::hyper::transport(crate::misc::hyper::tls_config()?, None);
        Ok(Self::with_transport(transport, authenticator))
    }

    /// Builds a client from `<SERVICE_NAME>_*` environment variables.
    pub fn new_instance(service_name: &str) -> Result<Self, Error> {
        Self::from_config(Config::from_env(service_name)?)
    }

    pub fn from_config(config: Config) -> Result<Self, Error> {
        let transport =
            crate::misc::hyper::transport(crate::misc::hyper::tls_config()?, config.timeout);
        let mut service = Self {
            transport,
            authenticator: config.auth.authenticator()?,
            service_url: Self::DEFAULT_SERVICE_URL.to_owned(),
            default_headers: HeaderMap::new(),
        };
        if let Some(url) = config.url {
            service.set_service_url(url)?;
        }
        Ok(service)
    }

    pub fn with_transport<A>(transport: Transport, authenticator: A) -> Self
    where
        A: Authenticator + 'static,
    {
        Self {
            transport,
            authenticator: Arc::new(authenticator),
            service_url: Self::DEFAULT_SERVICE_URL.to_owned(),
            default_headers: HeaderMap::new(),
        }
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    pub fn set_service_url<S>(&mut self, service_url: S) -> Result<(), Error>
    where
        S: Into<String>,
    {
        let service_url = service_url.into();
        let uri = service_url.parse::<http::Uri>()?;
        if uri.scheme().is_none() || uri.host().is_none() {
            return Err(Error::Config(format!(
                "service URL must be absolute: {service_url}"
            )));
        }
        self.service_url = service_url;
        Ok(())
    }

    /// Headers sent with every request, overridden by generated and
    /// per-call headers.
    pub fn set_default_headers(&mut self, headers: HeaderMap) {
        self.default_headers = headers;
    }

    /// Lists tags in the billing account, or those attached to
    /// `options.attached_to`.
    #[tracing::instrument(err, skip_all)]
    pub async fn list_tags(
        &self,
        options: &ListTagsOptions,
    ) -> Result<DetailedResponse<TagList>, Error> {
        let request = RequestBuilder::new("list_tags", Method::GET, "/v3/tags".to_owned())
            .query(options)?
            .headers(&options.headers);
        self.send(request).await
    }

    /// Deletes every tag that is not attached to a resource. Irreversible.
    #[tracing::instrument(err, skip_all)]
    pub async fn delete_tag_all(
        &self,
        options: &DeleteTagAllOptions,
    ) -> Result<DetailedResponse<DeleteTagsResult>, Error> {
        let request = RequestBuilder::new("delete_tag_all", Method::DELETE, "/v3/tags".to_owned())
            .query(options)?
            .headers(&options.headers);
        self.send(request).await
    }

    /// Deletes one tag. The server refuses while it is still attached.
    #[tracing::instrument(err, skip(self, options))]
    pub async fn delete_tag(
        &self,
        tag_name: &str,
        options: &DeleteTagOptions,
    ) -> Result<DetailedResponse<DeleteTagResults>, Error> {
        if tag_name.is_empty() {
            return Err(schemas::MissingArgument("tag_name").into());
        }
        let path = format!("/v3/tags/{}", crate::request::path_segment(tag_name));
        let request = RequestBuilder::new("delete_tag", Method::DELETE, path)
            .query(options)?
            .headers(&options.headers);
        self.send(request).await
    }

    #[tracing::instrument(err, skip_all, fields(resources = request.resources.len()))]
    pub async fn attach_tag(
        &self,
        request: &TagRequest,
    ) -> Result<DetailedResponse<TagResults>, Error> {
        self.send(Self::tag_request("attach_tag", "/v3/tags/attach", request)?)
            .await
    }

    #[tracing::instrument(err, skip_all, fields(resources = request.resources.len()))]
    pub async fn detach_tag(
        &self,
        request: &TagRequest,
    ) -> Result<DetailedResponse<TagResults>, Error> {
        self.send(Self::tag_request("detach_tag", "/v3/tags/detach", request)?)
            .await
    }

    fn tag_request(
        operation_id: &'static str,
        path: &str,
        request: &TagRequest,
    ) -> Result<RequestBuilder, Error> {
        Ok(
            RequestBuilder::new(operation_id, Method::POST, path.to_owned())
                .json(request)?
                .headers(&request.headers),
        )
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<DetailedResponse<T>, Error>
    where
        T: DeserializeOwned,
    {
        let operation_id = request.operation_id();
        let mut request = request.build(&self.service_url, &self.default_headers)?;
        self.authenticator.authenticate(request.headers_mut())?;
        tracing::debug!(operation_id, method = %request.method(), uri = %request.uri());

        let (parts, body) = self
            .transport
            .clone()
            .oneshot(request)
            .map_err(Error::Transport)
            .await?
            .into_parts();
        tracing::debug!(operation_id, status = %parts.status);

        if !parts.status.is_success() {
            return Err(ApiError::new(parts.status, parts.headers, body).into());
        }
        // Every response model is an object of optional fields, so an empty
        // body (such as a 204) reads as `{}`.
        let body = if body.iter().all(u8::is_ascii_whitespace) {
            &b"{}"[..]
        } else {
            &body[..]
        };
        let result = serde_json::from_slice(body).map_err(Error::Decode)?;
        Ok(DetailedResponse {
            status: parts.status,
            headers: parts.headers,
            result,
        })
    }
}
